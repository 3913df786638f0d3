use clap::{Parser, Subcommand};
use nexus_ai::{AiService, DemoAiService, DemoConfig, Feature, FeatureGroup, FeatureSuite};
use nexus_core::{constants::STALE_POLICY_ENV, stale_policy_from_env_value, HookConfig};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Run Nexus dashboard AI hooks against the demo backend")]
struct Cli {
    /// Simulated backend latency in milliseconds (overrides NEXUS_AI_LATENCY_MS)
    #[arg(long, global = true)]
    latency_ms: Option<u64>,
    /// Treat the backend as unreachable
    #[arg(long, global = true)]
    offline: bool,
    /// Disable the backend response cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List AI features
    Features {
        /// Only list features of this group (for example `clinical`)
        #[arg(long)]
        group: Option<String>,
    },
    /// Execute one feature hook and print its state
    Run {
        /// Feature slug (for example `triage`)
        feature: String,
        /// JSON object passed as the feature input
        input: String,
        /// Execute the hook this many times in sequence
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },
    /// Execute every hook of a group concurrently with the same input
    Suite {
        /// Group slug (for example `operational`)
        group: String,
        /// JSON object passed as the input of every feature
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nexus_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut demo_cfg = DemoConfig::from_env()?;
    if let Some(latency_ms) = cli.latency_ms {
        demo_cfg.latency = Duration::from_millis(latency_ms);
    }
    if cli.offline {
        demo_cfg.offline = true;
    }
    if cli.no_cache {
        demo_cfg.cache_responses = false;
    }

    let stale_policy = stale_policy_from_env_value(std::env::var(STALE_POLICY_ENV).ok())?;
    let hook_cfg = HookConfig::default().with_stale_responses(stale_policy);
    let service: Arc<dyn AiService> = Arc::new(DemoAiService::new(demo_cfg));

    match cli.command {
        Some(Commands::Features { group }) => {
            let group = group.map(|g| g.parse::<FeatureGroup>()).transpose()?;
            for feature in Feature::ALL {
                if group.is_some_and(|g| g != feature.group()) {
                    continue;
                }
                println!(
                    "{:<26} {:<22} {}",
                    feature.slug(),
                    feature.group().slug(),
                    feature.title()
                );
            }
        }
        Some(Commands::Run {
            feature,
            input,
            repeat,
        }) => {
            let feature = feature.parse::<Feature>()?;
            let input: Value = serde_json::from_str(&input)?;
            let suite = FeatureSuite::for_group(service, feature.group(), &hook_cfg)?;
            let hook = suite
                .hook(feature)
                .ok_or_else(|| anyhow::anyhow!("no hook for feature {feature}"))?;

            for attempt in 1..=repeat.max(1) {
                let envelope = hook.execute(input.clone()).await;
                tracing::info!(
                    "{} attempt {}: success={} cached={}",
                    feature,
                    attempt,
                    envelope.is_success(),
                    envelope.is_cached()
                );
                println!("{}", envelope.render_json()?);
            }
            println!("{}", serde_json::to_string_pretty(&hook.state())?);
        }
        Some(Commands::Suite { group, input }) => {
            let group = group.parse::<FeatureGroup>()?;
            let input: Value = serde_json::from_str(&input)?;
            let suite = FeatureSuite::for_group(service, group, &hook_cfg)?;

            let mut running = JoinSet::new();
            for (feature, hook) in suite.hooks() {
                let pending = hook.execute(input.clone());
                running.spawn(async move { (feature, pending.await) });
            }
            while let Some(joined) = running.join_next().await {
                let (feature, envelope) = joined?;
                tracing::debug!(success = envelope.is_success(), "{} settled", feature);
            }

            for (feature, hook) in suite.hooks() {
                let state = hook.state();
                println!(
                    "{:<26} {:<10} cached={:<5} {}",
                    feature.slug(),
                    format!("{:?}", state.status()).to_lowercase(),
                    state.cached,
                    state.error.unwrap_or_default()
                );
            }

            suite.reset_all();
            println!("Reset {} hooks in {}", suite.len(), group);
        }
        None => {
            println!("Use 'nexus --help' for commands");
        }
    }

    Ok(())
}
