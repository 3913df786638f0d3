//! Constants used throughout the Nexus core crate.

/// Message surfaced when a failure carries no usable text of its own.
pub const DEFAULT_FALLBACK_ERROR: &str = "An error occurred";

/// Environment variable selecting the [`crate::StaleResponsePolicy`].
pub const STALE_POLICY_ENV: &str = "NEXUS_STALE_POLICY";

/// Label given to hooks created through [`crate::create_hook`] without an explicit name.
pub const UNNAMED_HOOK_LABEL: &str = "operation";
