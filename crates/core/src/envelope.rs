//! Response envelope returned by every remote operation.
//!
//! This module provides both the domain-level [`Envelope`] and its JSON wire model.
//!
//! Responsibilities:
//! - Model an operation outcome as an explicit success/failure sum type
//! - Define the flat wire object (`success`, `data`, `error`, `cached`, `timestamp`)
//! - Translate between the two, enforcing that a success always carries data
//!
//! Notes:
//! - A wire envelope claiming success without `data` is translated into a failure
//! - Timestamps render as RFC 3339 UTC with millisecond precision (`2026-01-11T14:35:22.045Z`)

use crate::{CoreError, CoreResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Outcome of one remote operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Envelope<T> {
    /// The operation completed and produced `data`.
    Success {
        data: T,
        /// `true` if `data` was served from a cache rather than freshly computed.
        cached: bool,
        timestamp: DateTime<Utc>,
    },
    /// The operation did not produce data.
    Failure {
        /// Human-readable reason, when the producer supplied one.
        error: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl<T> Envelope<T> {
    /// A freshly computed success stamped with the current time.
    pub fn fresh(data: T) -> Self {
        Self::Success {
            data,
            cached: false,
            timestamp: Utc::now(),
        }
    }

    /// A success served from a cache, stamped with the current time.
    pub fn cached(data: T) -> Self {
        Self::Success {
            data,
            cached: true,
            timestamp: Utc::now(),
        }
    }

    /// A failure with a reason, stamped with the current time.
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }

    /// A failure that carries no reason.
    pub fn failure_without_reason() -> Self {
        Self::Failure {
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Success { cached: true, .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => error.as_deref(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Success { timestamp, .. } | Self::Failure { timestamp, .. } => *timestamp,
        }
    }

    /// Transform the payload of a success, keeping the cache flag and timestamp.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Success {
                data,
                cached,
                timestamp,
            } => Envelope::Success {
                data: f(data),
                cached,
                timestamp,
            },
            Self::Failure { error, timestamp } => Envelope::Failure { error, timestamp },
        }
    }
}

// ============================================================================
// JSON operations
// ============================================================================

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope from JSON text.
    ///
    /// Uses `serde_path_to_error` so a schema mismatch names the failing field
    /// (for example `data.risk_score`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EnvelopeSchema`] if the JSON does not match the wire schema, or
    /// [`CoreError::InvalidTimestamp`] if `timestamp` is not RFC 3339.
    pub fn parse_json(text: &str) -> CoreResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(text);
        let wire = serde_path_to_error::deserialize::<_, EnvelopeWire<T>>(&mut deserializer)
            .map_err(schema_error)?;
        wire_to_domain(wire)
    }

    /// Parse an envelope from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Same as [`Envelope::parse_json`].
    pub fn from_value(value: serde_json::Value) -> CoreResult<Self> {
        let wire = serde_path_to_error::deserialize::<_, EnvelopeWire<T>>(value)
            .map_err(schema_error)?;
        wire_to_domain(wire)
    }
}

impl<T: Serialize> Envelope<T> {
    /// Render the envelope as compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the payload cannot be serialised.
    pub fn render_json(&self) -> CoreResult<String> {
        serde_json::to_string(&domain_to_wire(self)).map_err(CoreError::Serialization)
    }

    /// Render the envelope as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the payload cannot be serialised.
    pub fn to_value(&self) -> CoreResult<serde_json::Value> {
        serde_json::to_value(domain_to_wire(self)).map_err(CoreError::Serialization)
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        domain_to_wire(self).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Envelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let wire = EnvelopeWire::<T>::deserialize(deserializer)?;
        wire_to_domain(wire).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Wire model
// ============================================================================

#[derive(Deserialize)]
struct EnvelopeWire<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
    cached: Option<bool>,
    timestamp: String,
}

#[derive(Serialize)]
struct EnvelopeWireRef<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cached: Option<bool>,
    timestamp: String,
}

// ============================================================================
// Translation helpers
// ============================================================================

fn wire_to_domain<T>(wire: EnvelopeWire<T>) -> CoreResult<Envelope<T>> {
    let timestamp = parse_timestamp(&wire.timestamp)?;

    match (wire.success, wire.data) {
        (true, Some(data)) => Ok(Envelope::Success {
            data,
            cached: wire.cached.unwrap_or(false),
            timestamp,
        }),
        (true, None) => {
            tracing::debug!("envelope reported success without data; treating as failure");
            Ok(Envelope::Failure {
                error: wire.error,
                timestamp,
            })
        }
        (false, _) => Ok(Envelope::Failure {
            error: wire.error,
            timestamp,
        }),
    }
}

fn domain_to_wire<T>(envelope: &Envelope<T>) -> EnvelopeWireRef<'_, T> {
    match envelope {
        Envelope::Success {
            data,
            cached,
            timestamp,
        } => EnvelopeWireRef {
            success: true,
            data: Some(data),
            error: None,
            cached: Some(*cached),
            timestamp: render_timestamp(timestamp),
        },
        Envelope::Failure { error, timestamp } => EnvelopeWireRef {
            success: false,
            data: None,
            error: error.as_deref(),
            cached: None,
            timestamp: render_timestamp(timestamp),
        },
    }
}

fn schema_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> CoreError {
    let path = err.path().to_string();
    let message = err.into_inner().to_string();
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    CoreError::EnvelopeSchema { path, message }
}

fn parse_timestamp(value: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CoreError::InvalidTimestamp(value.to_string()))
}

pub(crate) fn render_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
