//! Remote operation abstraction consumed by hooks.

use crate::Envelope;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

/// A call that failed before producing an envelope.
///
/// This is the transport half of the error taxonomy: the remote never answered, or answered
/// with something that could not be understood. A remote that answers with a failure envelope
/// is not an `OperationError`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    #[error("{0}")]
    Transport(String),
    /// Failure with no usable message; surfaced to callers as the configured fallback text.
    #[error("operation failed without a message")]
    Opaque,
}

impl OperationError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// The message carried by this error, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Transport(message) => Some(message),
            Self::Opaque => None,
        }
    }
}

/// An asynchronous remote procedure returning an [`Envelope`].
///
/// Implemented for any `Fn(I) -> impl Future<Output = Result<Envelope<R>, OperationError>>`, so
/// plain async closures can be handed straight to [`crate::create_hook`].
#[async_trait]
pub trait AsyncOperation<I, R>: Send + Sync {
    async fn run(&self, input: I) -> Result<Envelope<R>, OperationError>;
}

#[async_trait]
impl<I, R, F, Fut> AsyncOperation<I, R> for F
where
    I: Send + 'static,
    R: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Envelope<R>, OperationError>> + Send + 'static,
{
    async fn run(&self, input: I) -> Result<Envelope<R>, OperationError> {
        (self)(input).await
    }
}

/// Operation over an endpoint that returns its payload directly or fails.
///
/// Created with [`fallible`]. Payloads are always reported as freshly computed.
pub struct Fallible<F, R> {
    f: F,
    _result: PhantomData<fn() -> R>,
}

/// Adapt a `Fn(I) -> impl Future<Output = Result<R, OperationError>>` into an operation.
pub fn fallible<I, R, F, Fut>(f: F) -> Fallible<F, R>
where
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, OperationError>> + Send + 'static,
{
    Fallible {
        f,
        _result: PhantomData,
    }
}

#[async_trait]
impl<I, R, F, Fut> AsyncOperation<I, R> for Fallible<F, R>
where
    I: Send + 'static,
    R: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, OperationError>> + Send + 'static,
{
    async fn run(&self, input: I) -> Result<Envelope<R>, OperationError> {
        (self.f)(input).await.map(Envelope::fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closures_are_operations() {
        let double = |n: u32| async move { Ok::<_, OperationError>(Envelope::fresh(n * 2)) };
        let envelope = double.run(21).await.expect("run");
        assert_eq!(envelope.into_data(), Some(42));
    }

    #[tokio::test]
    async fn fallible_wraps_payload_as_fresh_success() {
        let op = fallible(|name: String| async move {
            if name.is_empty() {
                Err(OperationError::transport("AI Error: 422"))
            } else {
                Ok(format!("pathway for {name}"))
            }
        });

        let ok = op.run("sepsis".to_string()).await.expect("run");
        assert!(ok.is_success());
        assert!(!ok.is_cached());
        assert_eq!(ok.data().map(String::as_str), Some("pathway for sepsis"));

        let err = op.run(String::new()).await.expect_err("should fail");
        assert_eq!(err.message(), Some("AI Error: 422"));
    }

    #[test]
    fn opaque_error_has_no_message() {
        assert_eq!(OperationError::Opaque.message(), None);
        assert_eq!(OperationError::transport("boom").to_string(), "boom");
    }
}
