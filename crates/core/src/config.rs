//! Hook runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into hook factories. Hooks
//! never read environment variables while executing, which keeps behaviour consistent across
//! multi-threaded runtimes and test harnesses.

use crate::constants::DEFAULT_FALLBACK_ERROR;
use crate::{CoreError, CoreResult};
use nexus_types::NonEmptyText;
use std::fmt;
use std::str::FromStr;

/// How a hook treats a call that settles after a newer `execute()` has started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StaleResponsePolicy {
    /// Every settled call writes state; the last one to settle wins, regardless of start order.
    #[default]
    LastSettledWins,
    /// Only the most recently started call may write state. Older calls still return their
    /// envelope to their own caller.
    DiscardStale,
}

impl StaleResponsePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastSettledWins => "last-settled-wins",
            Self::DiscardStale => "discard-stale",
        }
    }
}

impl fmt::Display for StaleResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaleResponsePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-settled-wins" | "last_settled_wins" => Ok(Self::LastSettledWins),
            "discard-stale" | "discard_stale" => Ok(Self::DiscardStale),
            other => Err(CoreError::InvalidInput(format!(
                "unknown stale response policy '{other}' (expected last-settled-wins or discard-stale)"
            ))),
        }
    }
}

/// Configuration shared by every hook a factory creates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookConfig {
    fallback_error: NonEmptyText,
    stale_responses: StaleResponsePolicy,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            fallback_error: NonEmptyText::new(DEFAULT_FALLBACK_ERROR)
                .expect("DEFAULT_FALLBACK_ERROR is non-empty"),
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}

impl HookConfig {
    /// Create a new `HookConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Text`] if `fallback_error` is blank.
    pub fn new(
        fallback_error: impl AsRef<str>,
        stale_responses: StaleResponsePolicy,
    ) -> CoreResult<Self> {
        Ok(Self {
            fallback_error: NonEmptyText::new(fallback_error)?,
            stale_responses,
        })
    }

    pub fn with_stale_responses(mut self, policy: StaleResponsePolicy) -> Self {
        self.stale_responses = policy;
        self
    }

    pub fn fallback_error(&self) -> &NonEmptyText {
        &self.fallback_error
    }

    pub fn stale_responses(&self) -> StaleResponsePolicy {
        self.stale_responses
    }
}

/// Parse the stale response policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`StaleResponsePolicy::LastSettledWins`].
pub fn stale_policy_from_env_value(value: Option<String>) -> CoreResult<StaleResponsePolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<StaleResponsePolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_observed_behaviour() {
        let cfg = HookConfig::default();
        assert_eq!(cfg.fallback_error().as_str(), "An error occurred");
        assert_eq!(cfg.stale_responses(), StaleResponsePolicy::LastSettledWins);
    }

    #[test]
    fn rejects_blank_fallback_error() {
        let err = HookConfig::new("  ", StaleResponsePolicy::DiscardStale)
            .expect_err("blank fallback should fail");
        assert!(matches!(err, CoreError::Text(_)));
    }

    #[test]
    fn policy_from_env_value() {
        assert_eq!(
            stale_policy_from_env_value(None).expect("default"),
            StaleResponsePolicy::LastSettledWins
        );
        assert_eq!(
            stale_policy_from_env_value(Some("   ".into())).expect("blank is default"),
            StaleResponsePolicy::LastSettledWins
        );
        assert_eq!(
            stale_policy_from_env_value(Some(" Discard-Stale ".into())).expect("parse"),
            StaleResponsePolicy::DiscardStale
        );

        let err = stale_policy_from_env_value(Some("newest".into())).expect_err("unknown");
        match err {
            CoreError::InvalidInput(msg) => assert!(msg.contains("newest")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn policy_display_round_trips() {
        for policy in [
            StaleResponsePolicy::LastSettledWins,
            StaleResponsePolicy::DiscardStale,
        ] {
            assert_eq!(policy.to_string().parse::<StaleResponsePolicy>().ok(), Some(policy));
        }
    }
}
