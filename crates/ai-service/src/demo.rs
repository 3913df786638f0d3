//! In-process stand-in for the AI backend.
//!
//! The dashboard runs in demo mode when no backend is configured. Responses are deterministic
//! mock payloads shaped by feature, delivered after a simulated network latency. Identical
//! requests can be answered from a response cache, which is what drives the `cached` flag that
//! hooks surface.

use crate::constants::{
    DEFAULT_DEMO_CACHE_CAPACITY, DEFAULT_DEMO_LATENCY_MS, DEMO_CACHE_ENV, DEMO_LATENCY_ENV,
    DEMO_OFFLINE_ENV,
};
use crate::{AiError, AiResult, AiService, Feature};
use async_trait::async_trait;
use nexus_core::{Envelope, OperationError};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::RwLock;

/// Demo service configuration, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoConfig {
    pub latency: Duration,
    pub cache_responses: bool,
    /// Cached responses kept before the oldest is evicted. `0` disables caching.
    pub cache_capacity: usize,
    /// Simulate an unreachable backend: every call fails before producing an envelope.
    pub offline: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_DEMO_LATENCY_MS),
            cache_responses: true,
            cache_capacity: DEFAULT_DEMO_CACHE_CAPACITY,
            offline: false,
        }
    }
}

impl DemoConfig {
    /// Build a config from optional raw environment values.
    ///
    /// Missing or blank values fall back to [`DemoConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`AiError::InvalidConfig`] naming the variable that failed to parse.
    pub fn from_env_values(
        latency_ms: Option<String>,
        cache: Option<String>,
        offline: Option<String>,
    ) -> AiResult<Self> {
        let defaults = Self::default();

        let latency = match non_blank(latency_ms) {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().map_err(|_| {
                AiError::InvalidConfig(format!(
                    "{DEMO_LATENCY_ENV} must be a whole number of milliseconds, got '{raw}'"
                ))
            })?),
            None => defaults.latency,
        };

        let cache_responses = match non_blank(cache) {
            Some(raw) => parse_flag(DEMO_CACHE_ENV, &raw)?,
            None => defaults.cache_responses,
        };

        let offline = match non_blank(offline) {
            Some(raw) => parse_flag(DEMO_OFFLINE_ENV, &raw)?,
            None => defaults.offline,
        };

        Ok(Self {
            latency,
            cache_responses,
            offline,
            ..defaults
        })
    }

    /// Read the demo variables from the process environment.
    ///
    /// Intended for binaries at startup only.
    pub fn from_env() -> AiResult<Self> {
        Self::from_env_values(
            std::env::var(DEMO_LATENCY_ENV).ok(),
            std::env::var(DEMO_CACHE_ENV).ok(),
            std::env::var(DEMO_OFFLINE_ENV).ok(),
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(name: &str, raw: &str) -> AiResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AiError::InvalidConfig(format!(
            "{name} must be a boolean flag, got '{raw}'"
        ))),
    }
}

/// Response cache keyed by feature and input, evicting in insertion order.
#[derive(Default)]
struct ResponseCache {
    entries: HashMap<String, Value>,
    order: VecDeque<String>,
}

impl ResponseCache {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: String, value: Value, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            return;
        }
        while self.order.len() >= capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Mock AI backend.
pub struct DemoAiService {
    config: DemoConfig,
    cache: RwLock<ResponseCache>,
}

impl DemoAiService {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            cache: RwLock::new(ResponseCache::default()),
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Number of cached responses.
    pub async fn cached_responses(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Drop every cached response.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        tracing::debug!("demo AI cache cleared");
    }

    fn cache_key(feature: Feature, input: &Value) -> String {
        // serde_json maps are ordered by key, so equal inputs render identically
        format!("{}:{}", feature.slug(), input)
    }
}

#[async_trait]
impl AiService for DemoAiService {
    async fn invoke(
        &self,
        feature: Feature,
        input: Value,
    ) -> Result<Envelope<Value>, OperationError> {
        tracing::debug!(feature = %feature, "demo AI request");
        tokio::time::sleep(self.config.latency).await;

        if self.config.offline {
            return Err(OperationError::transport("AI service unreachable"));
        }

        let is_usable = input.as_object().is_some_and(|fields| !fields.is_empty());
        if !is_usable {
            return Ok(Envelope::failure(format!(
                "{} requires a non-empty JSON object input",
                feature.title()
            )));
        }

        let key = Self::cache_key(feature, &input);
        if self.config.cache_responses {
            if let Some(hit) = self.cache.read().await.get(&key) {
                tracing::debug!(feature = %feature, "demo AI cache hit");
                return Ok(Envelope::cached(hit.clone()));
            }
        }

        let payload = mock_payload(feature);
        if self.config.cache_responses {
            self.cache
                .write()
                .await
                .insert(key, payload.clone(), self.config.cache_capacity);
        }

        Ok(Envelope::fresh(payload))
    }
}

/// Deterministic mock payload for `feature`, shaped like the backend's demo responses.
pub fn mock_payload(feature: Feature) -> Value {
    let slug = feature.slug();

    let mut payload = if slug.contains("sepsis") {
        json!({
            "risk_level": "Moderate",
            "qsofa_score": 1,
            "sirs_criteria": 2,
            "recommendation": "Monitor vitals q1h, consider lactate re-check."
        })
    } else if slug.contains("drug") || slug.contains("allergy") {
        json!({
            "interactions": [{
                "interaction": "Major",
                "severity": "High",
                "description": "Simulated interaction detected.",
                "recommendation": "Monitor closely."
            }]
        })
    } else if slug.contains("risk") {
        json!({
            "risk_score": 75,
            "risk_category": "High",
            "factors": ["Age", "Comorbidities"]
        })
    } else if slug.contains("schedul") || slug.contains("staffing") {
        json!({
            "optimized_slots": ["09:00", "09:30", "10:15"],
            "efficiency_gain": "15%"
        })
    } else {
        json!({
            "analysis": format!("{} simulation complete.", feature.title()),
            "confidence": 0.99
        })
    };

    if let Some(fields) = payload.as_object_mut() {
        fields.insert("status".into(), json!("mock"));
        fields.insert("feature".into(), json!(slug));
        fields.insert(
            "note".into(),
            json!("This is a mock response. Configure an AI backend for real analysis."),
        );
    }

    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(cache_responses: bool) -> DemoAiService {
        DemoAiService::new(DemoConfig {
            latency: Duration::ZERO,
            cache_responses,
            ..DemoConfig::default()
        })
    }

    #[test]
    fn config_from_env_values() {
        let cfg = DemoConfig::from_env_values(None, Some(" ".into()), None).expect("defaults");
        assert_eq!(cfg, DemoConfig::default());

        let cfg = DemoConfig::from_env_values(Some("0".into()), Some("off".into()), Some("TRUE".into()))
            .expect("parse");
        assert_eq!(cfg.latency, Duration::ZERO);
        assert!(!cfg.cache_responses);
        assert!(cfg.offline);

        let err = DemoConfig::from_env_values(Some("fast".into()), None, None).expect_err("bad latency");
        match err {
            AiError::InvalidConfig(msg) => assert!(msg.contains(DEMO_LATENCY_ENV)),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }

        let err = DemoConfig::from_env_values(None, Some("maybe".into()), None).expect_err("bad flag");
        assert!(matches!(err, AiError::InvalidConfig(msg) if msg.contains(DEMO_CACHE_ENV)));
    }

    #[tokio::test]
    async fn repeated_input_is_served_from_cache() {
        let service = instant(true);
        let input = json!({"patient_name": "Ada", "symptoms": ["fever"]});

        let first = service.invoke(Feature::Triage, input.clone()).await.expect("invoke");
        assert!(first.is_success());
        assert!(!first.is_cached());

        let second = service.invoke(Feature::Triage, input.clone()).await.expect("invoke");
        assert!(second.is_cached());
        assert_eq!(first.data(), second.data());

        let other_feature = service.invoke(Feature::Dosage, input).await.expect("invoke");
        assert!(!other_feature.is_cached());
        assert_eq!(service.cached_responses().await, 2);
    }

    #[tokio::test]
    async fn cache_can_be_disabled() {
        let service = instant(false);
        let input = json!({"ward": "ICU"});
        service.invoke(Feature::BedManagement, input.clone()).await.expect("invoke");
        let again = service.invoke(Feature::BedManagement, input).await.expect("invoke");
        assert!(!again.is_cached());
        assert_eq!(service.cached_responses().await, 0);
    }

    #[tokio::test]
    async fn cache_evicts_oldest_response_at_capacity() {
        let service = DemoAiService::new(DemoConfig {
            latency: Duration::ZERO,
            cache_capacity: 2,
            ..DemoConfig::default()
        });

        for ward in ["ICU", "HDU", "ED"] {
            service
                .invoke(Feature::BedManagement, json!({"ward": ward}))
                .await
                .expect("invoke");
        }
        assert_eq!(service.cached_responses().await, 2);

        let evicted = service
            .invoke(Feature::BedManagement, json!({"ward": "ICU"}))
            .await
            .expect("invoke");
        assert!(!evicted.is_cached());
        let kept = service
            .invoke(Feature::BedManagement, json!({"ward": "ED"}))
            .await
            .expect("invoke");
        assert!(kept.is_cached());
        assert_eq!(service.cached_responses().await, 2);

        service.clear_cache().await;
        assert_eq!(service.cached_responses().await, 0);
        let after_clear = service
            .invoke(Feature::BedManagement, json!({"ward": "ED"}))
            .await
            .expect("invoke");
        assert!(!after_clear.is_cached());
    }

    #[tokio::test]
    async fn rejects_empty_input_with_failure_envelope() {
        let service = instant(true);
        for input in [json!({}), json!(null), json!(["fever"])] {
            let envelope = service.invoke(Feature::SymptomChecker, input).await.expect("invoke");
            assert_eq!(
                envelope.error(),
                Some("Symptom Checker requires a non-empty JSON object input")
            );
        }
    }

    #[tokio::test]
    async fn offline_mode_fails_before_an_envelope() {
        let service = DemoAiService::new(DemoConfig {
            latency: Duration::ZERO,
            offline: true,
            ..DemoConfig::default()
        });
        let err = service
            .invoke(Feature::Ecg, json!({"leads": 12}))
            .await
            .expect_err("offline");
        assert_eq!(err.message(), Some("AI service unreachable"));
    }

    #[test]
    fn payload_shape_follows_feature() {
        assert_eq!(mock_payload(Feature::SepsisPredictor)["qsofa_score"], json!(1));
        assert!(mock_payload(Feature::DrugInteractions)["interactions"].is_array());
        assert!(mock_payload(Feature::AllergyCheck)["interactions"].is_array());
        assert_eq!(mock_payload(Feature::ReadmissionRisk)["risk_score"], json!(75));
        assert_eq!(mock_payload(Feature::StaffScheduling)["efficiency_gain"], json!("15%"));
        assert_eq!(mock_payload(Feature::PredictiveStaffing)["efficiency_gain"], json!("15%"));

        let generic = mock_payload(Feature::ChestXRay);
        assert_eq!(generic["analysis"], json!("Chest X-Ray Analysis simulation complete."));
        assert_eq!(generic["status"], json!("mock"));
        assert_eq!(generic["feature"], json!("chest-xray"));
    }
}
