//! The AI backend as seen by hooks.

use crate::Feature;
use async_trait::async_trait;
use nexus_core::{
    fallible, AsyncOperation, Envelope, HookConfig, HookFactory, NonEmptyText, OperationError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Remote AI backend answering feature requests with JSON envelopes.
///
/// Implementations own transport, authentication and caching. An implementation returns
/// `Err` only when it could not obtain an envelope at all.
#[async_trait]
pub trait AiService: Send + Sync {
    async fn invoke(&self, feature: Feature, input: Value)
        -> Result<Envelope<Value>, OperationError>;
}

/// Typed operation for one feature.
///
/// Serialises the input to JSON, forwards it to the shared [`AiService`], and decodes a
/// successful payload into `R`.
pub struct FeatureOperation<I, R> {
    service: Arc<dyn AiService>,
    feature: Feature,
    _types: PhantomData<fn(I) -> R>,
}

impl<I, R> FeatureOperation<I, R> {
    pub fn new(service: Arc<dyn AiService>, feature: Feature) -> Self {
        Self {
            service,
            feature,
            _types: PhantomData,
        }
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }
}

#[async_trait]
impl<I, R> AsyncOperation<I, R> for FeatureOperation<I, R>
where
    I: Serialize + Send + 'static,
    R: DeserializeOwned + Send + 'static,
{
    async fn run(&self, input: I) -> Result<Envelope<R>, OperationError> {
        let input = serde_json::to_value(&input).map_err(|e| {
            OperationError::transport(format!("failed to encode {} input: {e}", self.feature))
        })?;

        let envelope = self.service.invoke(self.feature, input).await?;

        match envelope {
            Envelope::Success {
                data,
                cached,
                timestamp,
            } => {
                let data = serde_json::from_value::<R>(data).map_err(|e| {
                    OperationError::transport(format!(
                        "unexpected {} payload: {e}",
                        self.feature
                    ))
                })?;
                Ok(Envelope::Success {
                    data,
                    cached,
                    timestamp,
                })
            }
            Envelope::Failure { error, timestamp } => Ok(Envelope::Failure { error, timestamp }),
        }
    }
}

/// Hook factory for `feature`, labelled with the feature slug.
pub fn feature_hook<I, R>(
    service: Arc<dyn AiService>,
    feature: Feature,
    config: HookConfig,
) -> HookFactory<I, R>
where
    I: Serialize + Send + 'static,
    R: DeserializeOwned + Send + 'static,
{
    let label = NonEmptyText::new(feature.slug()).expect("feature slugs are non-empty");
    HookFactory::new(
        label,
        Arc::new(FeatureOperation::<I, R>::new(service, feature)),
        config,
    )
}

/// Hook factory for a feature whose endpoint returns its payload directly or fails.
///
/// A failure envelope from the service becomes an operation error, so the hook reports it the
/// same way as a transport failure. Payloads are always reported as freshly computed.
pub fn advanced_hook<I, R>(
    service: Arc<dyn AiService>,
    feature: Feature,
    config: HookConfig,
) -> HookFactory<I, R>
where
    I: Serialize + Send + 'static,
    R: DeserializeOwned + Send + 'static,
{
    let typed = Arc::new(FeatureOperation::<I, R>::new(service, feature));
    let operation = fallible(move |input: I| {
        let typed = Arc::clone(&typed);
        async move {
            match typed.run(input).await? {
                Envelope::Success { data, .. } => Ok(data),
                Envelope::Failure { error, .. } => Err(error
                    .map(OperationError::Transport)
                    .unwrap_or(OperationError::Opaque)),
            }
        }
    });

    let label = NonEmptyText::new(feature.slug()).expect("feature slugs are non-empty");
    HookFactory::new(label, Arc::new(operation), config)
}
