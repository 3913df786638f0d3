use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nexus_ai::{AiService, DemoAiService, DemoConfig, Feature, FeatureGroup, FeatureHook, FeatureSuite};
use nexus_core::{HookConfig, constants::STALE_POLICY_ENV, stale_policy_from_env_value};

/// Log every state transition of `hook` until the task is aborted.
fn watch_hook(feature: Feature, hook: &FeatureHook) -> JoinHandle<()> {
    let mut rx = hook.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            tracing::info!(
                feature = %feature,
                status = ?state.status(),
                cached = state.cached,
                error = state.error.as_deref().unwrap_or(""),
                "state changed"
            );
        }
    })
}

/// Main entry point for the Nexus dashboard session runner
///
/// Drives a short dashboard session against the demo AI backend:
/// a fresh triage request, a cached repeat, a rejected refresh that keeps the
/// previous result, and one advanced feature, then resets every hook.
///
/// # Environment Variables
/// - `NEXUS_STALE_POLICY`: `last-settled-wins` (default) or `discard-stale`
/// - `NEXUS_AI_LATENCY_MS`: simulated backend latency (default: 500)
/// - `NEXUS_AI_CACHE`: enable the backend response cache (default: true)
/// - `NEXUS_AI_OFFLINE`: treat the backend as unreachable (default: false)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("nexus_run=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve configuration once at startup
    let demo_cfg = DemoConfig::from_env()?;
    let stale_policy = stale_policy_from_env_value(std::env::var(STALE_POLICY_ENV).ok())?;
    let hook_cfg = HookConfig::default().with_stale_responses(stale_policy);

    tracing::info!(
        "++ Starting Nexus session (latency={:?}, cache={}, offline={}, stale={})",
        demo_cfg.latency,
        demo_cfg.cache_responses,
        demo_cfg.offline,
        stale_policy
    );

    let service: Arc<dyn AiService> = Arc::new(DemoAiService::new(demo_cfg));
    let clinical = FeatureSuite::for_group(Arc::clone(&service), FeatureGroup::Clinical, &hook_cfg)?;
    let advanced = FeatureSuite::for_group(service, FeatureGroup::Advanced, &hook_cfg)?;

    let triage = clinical
        .hook(Feature::Triage)
        .ok_or_else(|| anyhow::anyhow!("clinical suite has no triage hook"))?;
    let sepsis = advanced
        .hook(Feature::SepsisPredictor)
        .ok_or_else(|| anyhow::anyhow!("advanced suite has no sepsis hook"))?;

    let watchers = [
        watch_hook(Feature::Triage, triage),
        watch_hook(Feature::SepsisPredictor, sepsis),
    ];

    let patient = json!({
        "patient_name": "Ada Lovelace",
        "age": 36,
        "symptoms": ["chest pain", "shortness of breath"],
    });

    let first = triage.execute(patient.clone()).await;
    tracing::info!("triage: success={} cached={}", first.is_success(), first.is_cached());

    let repeat = triage.execute(patient.clone()).await;
    tracing::info!("triage repeat: success={} cached={}", repeat.is_success(), repeat.is_cached());

    let rejected = triage.execute(json!({})).await;
    tracing::info!(
        "triage refresh rejected: {} (previous result kept: {})",
        rejected.error().unwrap_or_default(),
        triage.data().is_some()
    );

    let vitals = json!({"patient_name": "Ada Lovelace", "temperature": 38.9, "heart_rate": 118});
    let warning = sepsis.execute(vitals).await;
    println!("{}", warning.render_json()?);

    println!("{}", serde_json::to_string_pretty(&triage.state())?);

    clinical.reset_all();
    advanced.reset_all();
    tracing::info!("-- Session finished, {} hooks reset", clinical.len() + advanced.len());

    for watcher in watchers {
        watcher.abort();
    }

    Ok(())
}
