//! Catalogue of AI features wired into the dashboard.
//!
//! Each feature is one remote operation with a stable slug (the endpoint name on the AI
//! backend), a display title and the dashboard group whose screens use it.

use crate::{AiError, AiResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dashboard area a feature belongs to. Each group has one combined screen with a single
/// "reset all" control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureGroup {
    Clinical,
    Operational,
    Administrative,
    PatientFacing,
    PredictiveAnalytics,
    MedicalImaging,
    /// Backend features that return their payload directly instead of an envelope.
    Advanced,
}

impl FeatureGroup {
    pub const ALL: [FeatureGroup; 7] = [
        FeatureGroup::Clinical,
        FeatureGroup::Operational,
        FeatureGroup::Administrative,
        FeatureGroup::PatientFacing,
        FeatureGroup::PredictiveAnalytics,
        FeatureGroup::MedicalImaging,
        FeatureGroup::Advanced,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Clinical => "clinical",
            Self::Operational => "operational",
            Self::Administrative => "administrative",
            Self::PatientFacing => "patient-facing",
            Self::PredictiveAnalytics => "predictive-analytics",
            Self::MedicalImaging => "medical-imaging",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FeatureGroup {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|group| group.slug() == wanted)
            .ok_or_else(|| AiError::UnknownGroup(s.to_string()))
    }
}

macro_rules! features {
    ($($variant:ident => ($slug:literal, $group:ident, $title:literal),)+) => {
        /// One AI-backed dashboard feature.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Feature {
            $($variant,)+
        }

        impl Feature {
            /// Every feature, grouped in dashboard order.
            pub const ALL: &'static [Feature] = &[$(Feature::$variant,)+];

            /// Endpoint name on the AI backend.
            pub fn slug(&self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)+
                }
            }

            pub fn group(&self) -> FeatureGroup {
                match self {
                    $(Self::$variant => FeatureGroup::$group,)+
                }
            }

            pub fn title(&self) -> &'static str {
                match self {
                    $(Self::$variant => $title,)+
                }
            }
        }
    };
}

features! {
    // Clinical
    Triage => ("triage", Clinical, "Triage Assistant"),
    Dosage => ("dosage", Clinical, "Dosage Calculator"),
    Cdss => ("cdss", Clinical, "Clinical Decision Support"),
    MedicalScribe => ("medical-scribe", Clinical, "Medical Scribe"),
    AllergyCheck => ("allergy-check", Clinical, "Allergy & Contraindication Check"),
    LabInterpretation => ("lab-interpretation", Clinical, "Lab Result Interpretation"),
    AntimicrobialStewardship => ("antimicrobial-stewardship", Clinical, "Antimicrobial Stewardship"),
    VitalSigns => ("vital-signs", Clinical, "Vital Signs Monitor"),
    DiagnosticEngine => ("diagnostic-engine", Clinical, "Diagnostic Engine"),
    PrescriptionGenerator => ("prescription-generator", Clinical, "Prescription Generator"),
    // Operational
    BedManagement => ("bed-management", Operational, "Bed Management Optimizer"),
    OrScheduler => ("or-scheduler", Operational, "OR Scheduler"),
    InventoryForecast => ("inventory-forecast", Operational, "Inventory Forecasting"),
    PatientFlow => ("patient-flow", Operational, "Patient Flow Analytics"),
    AmbulanceDispatch => ("ambulance-dispatch", Operational, "Ambulance Dispatch"),
    StaffScheduling => ("staff-scheduling", Operational, "Staff Scheduling Optimizer"),
    EquipmentMaintenance => ("equipment-maintenance", Operational, "Equipment Maintenance Predictor"),
    HousekeepingScheduler => ("housekeeping-scheduler", Operational, "Housekeeping Scheduler"),
    WasteManagement => ("waste-management", Operational, "Waste Management"),
    EnergyManagement => ("energy-management", Operational, "Energy Management"),
    // Administrative
    MedicalCoding => ("medical-coding", Administrative, "Medical Coding Assistant"),
    ClaimsDenial => ("claims-denial", Administrative, "Claims Denial Predictor"),
    RevenueCycle => ("revenue-cycle", Administrative, "Revenue Cycle Analytics"),
    ComplianceMonitoring => ("compliance-monitoring", Administrative, "Compliance Monitoring"),
    FraudDetection => ("fraud-detection", Administrative, "Fraud Detection"),
    DocumentProcessing => ("document-processing", Administrative, "Document Processing"),
    AuditTrail => ("audit-trail", Administrative, "Audit Trail Analysis"),
    ContractManagement => ("contract-management", Administrative, "Contract Management"),
    PolicyManagement => ("policy-management", Administrative, "Policy Management"),
    Reporting => ("reporting", Administrative, "Reporting Assistant"),
    // Patient-facing
    HealthChatbot => ("health-chatbot", PatientFacing, "Health Chatbot"),
    SymptomChecker => ("symptom-checker", PatientFacing, "Symptom Checker"),
    AppointmentScheduling => ("appointment-scheduling", PatientFacing, "Appointment Scheduling Assistant"),
    DischargeFollowUp => ("discharge-follow-up", PatientFacing, "Discharge Follow-up"),
    HealthEducation => ("health-education", PatientFacing, "Health Education Generator"),
    MedicationReminder => ("medication-reminder", PatientFacing, "Medication Reminder"),
    PatientFeedback => ("patient-feedback", PatientFacing, "Patient Feedback Analyzer"),
    // Predictive analytics
    ReadmissionRisk => ("readmission-risk", PredictiveAnalytics, "Readmission Risk Predictor"),
    OutbreakDetection => ("outbreak-detection", PredictiveAnalytics, "Outbreak Detection"),
    LengthOfStay => ("length-of-stay", PredictiveAnalytics, "Length of Stay Predictor"),
    MortalityRisk => ("mortality-risk", PredictiveAnalytics, "Mortality Risk Assessment"),
    HealthTrends => ("health-trends", PredictiveAnalytics, "Health Trend Analyzer"),
    // Medical imaging
    ChestXRay => ("chest-xray", MedicalImaging, "Chest X-Ray Analysis"),
    CtScan => ("ct-scan", MedicalImaging, "CT Scan Analysis"),
    Ultrasound => ("ultrasound", MedicalImaging, "Ultrasound Analysis"),
    Mri => ("mri", MedicalImaging, "MRI Analysis"),
    Mammography => ("mammography", MedicalImaging, "Mammography Analysis"),
    RetinalImaging => ("retinal-imaging", MedicalImaging, "Retinal Imaging Analysis"),
    DermatologyImage => ("dermatology-image", MedicalImaging, "Dermatology Image Analysis"),
    Ecg => ("ecg", MedicalImaging, "ECG Analysis"),
    // Advanced
    SepsisPredictor => ("sepsis-predictor", Advanced, "Sepsis Early Warning"),
    DrugInteractions => ("drug-interactions", Advanced, "Drug-Drug Interaction Checker"),
    ClinicalPathway => ("clinical-pathway", Advanced, "Clinical Pathway Recommender"),
    RiskStratification => ("risk-stratification", Advanced, "Patient Risk Stratification"),
    SmartScheduling => ("smart-scheduling", Advanced, "Smart Scheduling Optimizer"),
    SurgicalRisk => ("surgical-risk", Advanced, "Surgical Complication Predictor"),
    NlpRecords => ("nlp-records", Advanced, "NLP Medical Records Analyzer"),
    CancerScreening => ("cancer-screening", Advanced, "Cancer Screening Risk Assessor"),
    NutritionPlanner => ("nutrition-planner", Advanced, "Nutrition & Diet Planner"),
    MentalHealthScreening => ("mental-health-screening", Advanced, "Mental Health Screening"),
    PandemicSimulation => ("pandemic-simulation", Advanced, "Pandemic Simulation"),
    TrialEligibility => ("trial-eligibility", Advanced, "Clinical Trial Eligibility"),
    CostEstimator => ("cost-estimator", Advanced, "Treatment Cost Estimator"),
    GeneticRisk => ("genetic-risk", Advanced, "Genetic Risk Analysis"),
    EmergencyResponse => ("emergency-response", Advanced, "Emergency Response Optimizer"),
    PopulationHealth => ("population-health", Advanced, "Population Health Analytics"),
    PatientJourney => ("patient-journey", Advanced, "Patient Journey Mapper"),
    ChronicDiseaseManager => ("chronic-disease-manager", Advanced, "Chronic Disease Manager"),
    WoundAssessment => ("wound-assessment", Advanced, "Wound Assessment"),
    SpeechToSoap => ("speech-to-soap", Advanced, "Speech-to-SOAP Note"),
    AutoCoder => ("auto-coder", Advanced, "ICD/CPT Auto-Coder"),
    RadiologyReport => ("radiology-report", Advanced, "AI Radiology Report"),
    Pharmacovigilance => ("pharmacovigilance", Advanced, "Pharmacovigilance"),
    PredictiveStaffing => ("predictive-staffing", Advanced, "Predictive Staffing"),
    QualityMetrics => ("quality-metrics", Advanced, "Quality Metrics Analyzer"),
}

impl Feature {
    /// Features of `group`, in dashboard order.
    pub fn in_group(group: FeatureGroup) -> impl Iterator<Item = Feature> {
        Self::ALL
            .iter()
            .copied()
            .filter(move |feature| feature.group() == group)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Feature {
    type Err = AiError;

    fn from_str(s: &str) -> AiResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|feature| feature.slug() == wanted)
            .ok_or_else(|| AiError::UnknownFeature(s.to_string()))
    }
}

impl Serialize for Feature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn group_sizes_match_dashboard() {
        let count = |group| Feature::in_group(group).count();
        assert_eq!(count(FeatureGroup::Clinical), 10);
        assert_eq!(count(FeatureGroup::Operational), 10);
        assert_eq!(count(FeatureGroup::Administrative), 10);
        assert_eq!(count(FeatureGroup::PatientFacing), 7);
        assert_eq!(count(FeatureGroup::PredictiveAnalytics), 5);
        assert_eq!(count(FeatureGroup::MedicalImaging), 8);
        assert_eq!(count(FeatureGroup::Advanced), 25);
    }

    #[test]
    fn slugs_are_unique_and_parse_back() {
        let slugs: HashSet<_> = Feature::ALL.iter().map(Feature::slug).collect();
        assert_eq!(slugs.len(), Feature::ALL.len());

        for feature in Feature::ALL {
            assert_eq!(feature.slug().parse::<Feature>().ok(), Some(*feature));
        }
        assert_eq!(" Bed-Management ".parse::<Feature>().ok(), Some(Feature::BedManagement));
    }

    #[test]
    fn unknown_slugs_are_rejected() {
        let err = "teleportation".parse::<Feature>().expect_err("unknown feature");
        assert!(matches!(err, AiError::UnknownFeature(s) if s == "teleportation"));

        let err = "billing".parse::<FeatureGroup>().expect_err("unknown group");
        assert!(matches!(err, AiError::UnknownGroup(_)));
    }

    #[test]
    fn serialises_as_slug() {
        let json = serde_json::to_string(&Feature::SepsisPredictor).expect("serialize");
        assert_eq!(json, "\"sepsis-predictor\"");
        let group: FeatureGroup = serde_json::from_str("\"patient-facing\"").expect("deserialize");
        assert_eq!(group, FeatureGroup::PatientFacing);
    }
}
