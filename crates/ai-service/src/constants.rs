//! Constants for the AI service crate.

/// Simulated round-trip of the demo backend when no latency is configured.
pub const DEFAULT_DEMO_LATENCY_MS: u64 = 500;

/// Most responses the demo backend keeps before evicting the oldest.
pub const DEFAULT_DEMO_CACHE_CAPACITY: usize = 256;

/// Environment variable overriding the demo latency, in milliseconds.
pub const DEMO_LATENCY_ENV: &str = "NEXUS_AI_LATENCY_MS";

/// Environment variable enabling or disabling the demo response cache.
pub const DEMO_CACHE_ENV: &str = "NEXUS_AI_CACHE";

/// Environment variable making the demo backend behave as unreachable.
pub const DEMO_OFFLINE_ENV: &str = "NEXUS_AI_OFFLINE";
