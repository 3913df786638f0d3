//! # Nexus AI
//!
//! The AI features behind the Nexus dashboard, as seen by hooks.
//!
//! Contains:
//! - The feature catalogue ([`Feature`], [`FeatureGroup`])
//! - The backend interface ([`AiService`]) and typed per-feature hooks
//! - [`DemoAiService`], the mock backend used when no AI backend is configured
//! - [`FeatureSuite`], the combined hooks of one dashboard group
//!
//! Uses `nexus-core` for the hook state machine.

#![warn(rust_2018_idioms)]

pub mod constants;
pub mod demo;
pub mod feature;
pub mod service;
pub mod suite;

pub use demo::{mock_payload, DemoAiService, DemoConfig};
pub use feature::{Feature, FeatureGroup};
pub use service::{advanced_hook, feature_hook, AiService, FeatureOperation};
pub use suite::{FeatureHook, FeatureSuite};

/// Errors returned by the `nexus-ai` crate.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("unknown AI feature '{0}'")]
    UnknownFeature(String),

    #[error("unknown feature group '{0}'")]
    UnknownGroup(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("core error: {0}")]
    Core(#[from] nexus_core::CoreError),
}

/// Type alias for Results that can fail with an [`AiError`].
pub type AiResult<T> = Result<T, AiError>;
