//! Hook factory and hook instances.
//!
//! A [`HookFactory`] wraps one remote operation; every [`OperationHook`] it creates owns an
//! independent [`HookState`]. Dashboard screens create one hook per AI-backed feature and drive
//! it with [`OperationHook::execute`] and [`OperationHook::reset`].
//!
//! State transitions:
//! - `execute(input)` sets `loading=true` and clears `error`/`cached` before returning, then
//!   settles to success (new `data`) or failure (new `error`, previous `data` kept).
//! - `reset()` clears `data`, `error` and `cached` without touching `loading` or cancelling
//!   in-flight calls.
//!
//! The operation runs on its own Tokio task. Dropping the future returned by `execute` does not
//! cancel the call, and a panicking operation is reported as a failure rather than unwinding
//! into the caller. Every path settles `loading` back to `false`.

use crate::config::{HookConfig, StaleResponsePolicy};
use crate::constants::UNNAMED_HOOK_LABEL;
use crate::operation::{AsyncOperation, OperationError};
use crate::state::{HookState, HookStatus};
use crate::Envelope;
use nexus_types::NonEmptyText;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use uuid::Uuid;

/// Produces independent hook instances for one remote operation.
pub struct HookFactory<I, R> {
    label: NonEmptyText,
    operation: Arc<dyn AsyncOperation<I, R>>,
    config: HookConfig,
}

impl<I, R> Clone for HookFactory<I, R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            operation: Arc::clone(&self.operation),
            config: self.config.clone(),
        }
    }
}

/// Wrap `operation` in a hook factory with the default [`HookConfig`].
///
/// # Example
///
/// ```rust,ignore
/// let use_triage = create_hook(|input: TriageInput| async move { service.triage(input).await });
/// let triage = use_triage.create();
/// let envelope = triage.execute(input).await;
/// ```
pub fn create_hook<I, R, O>(operation: O) -> HookFactory<I, R>
where
    O: AsyncOperation<I, R> + 'static,
{
    HookFactory::new(
        NonEmptyText::new(UNNAMED_HOOK_LABEL).expect("UNNAMED_HOOK_LABEL is non-empty"),
        Arc::new(operation),
        HookConfig::default(),
    )
}

impl<I, R> HookFactory<I, R> {
    pub fn new(
        label: NonEmptyText,
        operation: Arc<dyn AsyncOperation<I, R>>,
        config: HookConfig,
    ) -> Self {
        Self {
            label,
            operation,
            config,
        }
    }

    /// Name used for hooks from this factory in logs and hook groups.
    pub fn labelled(mut self, label: NonEmptyText) -> Self {
        self.label = label;
        self
    }

    pub fn with_config(mut self, config: HookConfig) -> Self {
        self.config = config;
        self
    }

    pub fn label(&self) -> &NonEmptyText {
        &self.label
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Create a hook instance in the idle state.
    pub fn create(&self) -> OperationHook<I, R> {
        let (state, _) = watch::channel(HookState::default());
        OperationHook {
            inner: Arc::new(HookInner {
                label: self.label.clone(),
                operation: Arc::clone(&self.operation),
                config: self.config.clone(),
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }
}

/// A stateful wrapper around one remote operation.
///
/// Clones share the same state, so a clone can be handed to a spawned task or another view
/// component while the owner keeps observing.
pub struct OperationHook<I, R> {
    inner: Arc<HookInner<I, R>>,
}

impl<I, R> Clone for OperationHook<I, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct HookInner<I, R> {
    label: NonEmptyText,
    operation: Arc<dyn AsyncOperation<I, R>>,
    config: HookConfig,
    state: watch::Sender<HookState<R>>,
    generation: AtomicU64,
}

impl<I, R> OperationHook<I, R>
where
    I: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Start the operation with `input`.
    ///
    /// `loading`, `error` and `cached` are updated before this returns, so an observer sees the
    /// pending state immediately. The returned future resolves to the operation's envelope, or to
    /// a synthetic failure envelope if the operation errored or panicked. It never fails itself.
    ///
    /// Called outside a Tokio runtime, the hook settles straight away as a failure carrying the
    /// fallback error, and the returned future resolves to that failure.
    pub fn execute(&self, input: I) -> impl Future<Output = Envelope<R>> + Send + 'static {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request_id = Uuid::new_v4();

        self.inner.state.send_modify(HookState::begin);
        tracing::debug!(hook = %self.inner.label, %request_id, generation, "execute started");

        let inner = Arc::clone(&self.inner);
        let settled = match Handle::try_current() {
            Ok(runtime) => {
                let task_inner = Arc::clone(&inner);
                Ok(runtime.spawn(async move {
                    let operation = Arc::clone(&task_inner.operation);
                    let call = tokio::spawn(async move { operation.run(input).await });
                    let outcome = match call.await {
                        Ok(outcome) => outcome,
                        Err(join_err) => {
                            tracing::error!(
                                hook = %task_inner.label,
                                %request_id,
                                "operation task did not complete: {}",
                                join_err
                            );
                            Err(OperationError::Opaque)
                        }
                    };
                    task_inner.settle(generation, request_id, outcome)
                }))
            }
            Err(err) => {
                tracing::error!(hook = %inner.label, %request_id, "no Tokio runtime: {}", err);
                Err(inner.settle(generation, request_id, Err(OperationError::Opaque)))
            }
        };

        async move {
            match settled {
                Ok(task) => match task.await {
                    Ok(envelope) => envelope,
                    Err(join_err) => {
                        tracing::error!(
                            hook = %inner.label,
                            %request_id,
                            "settling task did not complete: {}",
                            join_err
                        );
                        inner.settle(generation, request_id, Err(OperationError::Opaque))
                    }
                },
                Err(envelope) => envelope,
            }
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> HookState<R> {
        self.inner.state.borrow().clone()
    }

    pub fn data(&self) -> Option<R> {
        self.inner.state.borrow().data.clone()
    }
}

impl<I, R> OperationHook<I, R> {
    /// Clear `data`, `error` and `cached`. `loading` and in-flight calls are left alone.
    pub fn reset(&self) {
        self.inner.state.send_modify(HookState::clear);
        tracing::debug!(hook = %self.inner.label, "reset");
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn cached(&self) -> bool {
        self.inner.state.borrow().cached
    }

    pub fn status(&self) -> HookStatus {
        self.inner.state.borrow().status()
    }

    /// Receive every state transition, starting from the current state.
    pub fn subscribe(&self) -> watch::Receiver<HookState<R>> {
        self.inner.state.subscribe()
    }

    pub fn label(&self) -> &NonEmptyText {
        &self.inner.label
    }
}

impl<I, R: Clone> HookInner<I, R> {
    fn settle(
        &self,
        generation: u64,
        request_id: Uuid,
        outcome: Result<Envelope<R>, OperationError>,
    ) -> Envelope<R> {
        let current = self.is_current(generation);
        if !current {
            tracing::debug!(
                hook = %self.label,
                %request_id,
                generation,
                "discarding stale response"
            );
        }

        match outcome {
            Ok(envelope) => {
                match &envelope {
                    Envelope::Success { data, cached, .. } => {
                        tracing::debug!(hook = %self.label, %request_id, cached, "execute succeeded");
                        if current {
                            let data = data.clone();
                            let cached = *cached;
                            self.state.send_modify(|state| state.succeed(data, cached));
                        }
                    }
                    Envelope::Failure { error, .. } => {
                        let message = self.message_for(error.as_deref());
                        tracing::warn!(hook = %self.label, %request_id, "remote rejected: {}", message);
                        if current {
                            self.state.send_modify(|state| state.fail(message));
                        }
                    }
                }
                envelope
            }
            Err(err) => {
                let message = self.message_for(err.message());
                tracing::warn!(hook = %self.label, %request_id, "operation failed: {}", message);
                if current {
                    let surfaced = message.clone();
                    self.state.send_modify(|state| state.fail(surfaced));
                }
                Envelope::failure(message)
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        match self.config.stale_responses() {
            StaleResponsePolicy::LastSettledWins => true,
            StaleResponsePolicy::DiscardStale => {
                self.generation.load(Ordering::SeqCst) == generation
            }
        }
    }

    /// The message as supplied, or the fallback when it is missing or empty.
    fn message_for(&self, text: Option<&str>) -> String {
        text.filter(|message| !message.is_empty())
            .map_or_else(|| self.config.fallback_error().to_string(), str::to_string)
    }
}
