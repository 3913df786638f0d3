//! # Nexus Core
//!
//! Request-lifecycle hooks for the Nexus hospital dashboard.
//!
//! Every AI-backed screen wraps a remote operation in an [`OperationHook`] which owns the
//! `data / loading / error / cached` bookkeeping for that call site:
//! - [`Envelope`]: the success/failure result every remote operation returns
//! - [`AsyncOperation`]: the remote procedure a hook drives
//! - [`create_hook`] / [`HookFactory`]: one factory per operation, one hook per screen
//! - [`HookGroup`]: screens with several hooks reset them together
//!
//! **No transport concerns**: which service answers an operation, and how, belongs in `nexus-ai`.

pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod group;
pub mod hook;
pub mod operation;
pub mod state;

pub use config::{stale_policy_from_env_value, HookConfig, StaleResponsePolicy};
pub use constants::DEFAULT_FALLBACK_ERROR;
pub use envelope::Envelope;
pub use error::{CoreError, CoreResult};
pub use group::{HookGroup, Resettable};
pub use hook::{create_hook, HookFactory, OperationHook};
pub use operation::{fallible, AsyncOperation, Fallible, OperationError};
pub use state::{HookState, HookStatus};

pub use nexus_types::{NonEmptyText, TextError};
