//! End-to-end hook behaviour against the demo AI backend.

use nexus_ai::{DemoAiService, DemoConfig, Feature, FeatureGroup, FeatureSuite};
use nexus_core::{HookConfig, HookState, HookStatus, StaleResponsePolicy};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn demo(latency_ms: u64, offline: bool) -> Arc<DemoAiService> {
    Arc::new(DemoAiService::new(DemoConfig {
        latency: Duration::from_millis(latency_ms),
        offline,
        ..DemoConfig::default()
    }))
}

#[tokio::test]
async fn clinical_screen_lifecycle() {
    let suite = FeatureSuite::for_group(demo(5, false), FeatureGroup::Clinical, &HookConfig::default())
        .expect("suite");
    assert_eq!(suite.len(), 10);

    let triage = suite.hook(Feature::Triage).expect("triage hook");
    assert_eq!(triage.state(), HookState::default());

    let input = json!({"patient_name": "Ada", "symptoms": ["chest pain"]});

    let pending = triage.execute(input.clone());
    assert_eq!(triage.status(), HookStatus::Pending);
    let first = pending.await;
    assert!(first.is_success());
    assert!(!triage.cached());
    let first_data = triage.data().expect("data");
    assert_eq!(first_data["feature"], json!("triage"));

    triage.execute(input).await;
    assert!(triage.cached());

    // A rejected refresh keeps the last good result on screen.
    let rejected = triage.execute(json!({})).await;
    assert!(!rejected.is_success());
    assert_eq!(triage.data(), Some(first_data));
    assert_eq!(
        triage.error().as_deref(),
        Some("Triage Assistant requires a non-empty JSON object input")
    );
    assert!(!triage.cached());

    let dosage = suite.hook(Feature::Dosage).expect("dosage hook");
    dosage.execute(json!({"drug": "amoxicillin", "weight_kg": 18})).await;
    assert_eq!(dosage.status(), HookStatus::Succeeded);

    suite.reset_all();
    for (_, hook) in suite.hooks() {
        assert_eq!(hook.state(), HookState::default());
    }
}

#[tokio::test]
async fn offline_backend_surfaces_transport_error() {
    let suite = FeatureSuite::for_group(
        demo(0, true),
        FeatureGroup::MedicalImaging,
        &HookConfig::default(),
    )
    .expect("suite");

    let ecg = suite.hook(Feature::Ecg).expect("ecg hook");
    let envelope = ecg.execute(json!({"leads": 12})).await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.error(), Some("AI service unreachable"));
    assert_eq!(ecg.error().as_deref(), Some("AI service unreachable"));
    assert!(!ecg.loading());
    assert_eq!(ecg.data(), None);
}

#[tokio::test]
async fn advanced_suite_uses_fallible_hooks() {
    let service = demo(0, false);
    let suite = FeatureSuite::for_group(service, FeatureGroup::Advanced, &HookConfig::default())
        .expect("suite");
    assert_eq!(suite.len(), 25);

    let sepsis = suite.hook(Feature::SepsisPredictor).expect("sepsis hook");
    let input = json!({"patient_name": "Ada", "temperature": 38.9, "heart_rate": 118});

    sepsis.execute(input.clone()).await;
    sepsis.execute(input).await;
    assert_eq!(sepsis.data().expect("data")["risk_level"], json!("Moderate"));
    assert!(!sepsis.cached());

    sepsis.execute(json!([])).await;
    assert_eq!(
        sepsis.error().as_deref(),
        Some("Sepsis Early Warning requires a non-empty JSON object input")
    );
}

#[tokio::test]
async fn discard_stale_shows_newest_request() {
    let config = HookConfig::default().with_stale_responses(StaleResponsePolicy::DiscardStale);
    let suite = FeatureSuite::for_group(demo(20, false), FeatureGroup::Operational, &config)
        .expect("suite");
    let beds = suite.hook(Feature::BedManagement).expect("bed hook");

    let older = beds.execute(json!({"ward": "ICU"}));
    let newer = beds.execute(json!({}));
    let (older, newer) = tokio::join!(older, newer);

    // Both callers get their own envelope; only the newest call reaches the state.
    assert!(older.is_success());
    assert!(!newer.is_success());
    assert!(!beds.loading());
    assert_eq!(beds.data(), None);
    assert_eq!(
        beds.error().as_deref(),
        Some("Bed Management Optimizer requires a non-empty JSON object input")
    );
}
