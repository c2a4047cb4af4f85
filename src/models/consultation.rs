use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::patient::Vitals;

/// tPA treatment window from symptom onset: 4.5 hours.
pub const TPA_WINDOW_SECS: i64 = 16_200;

/// Coagulation panel attached to a consultation. All values optional;
/// an absent value skips the corresponding eligibility rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabResults {
    /// International Normalized Ratio.
    pub inr: Option<f64>,
    /// Platelet count, x10³/μL.
    pub platelet_count: Option<i32>,
    /// Prothrombin time, seconds.
    pub prothrombin_time: Option<f64>,
    /// Partial thromboplastin time, seconds.
    pub partial_thromboplastin_time: Option<f64>,
}

/// tPA consent as recorded at the bedside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consent {
    pub tpa_consent: bool,
    pub given_by: String,
    pub relationship_to_patient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub patient_id: String,
    /// Set when the consultation is entered; the window and age checks
    /// are computed against this stamp, never against wall-clock now.
    pub recorded_at: DateTime<Utc>,
    pub symptom_onset_time: Option<DateTime<Utc>>,
    pub diagnosis: String,
    pub treatment_plan: String,
    pub test_orders: String,
    pub vitals: Vitals,
    pub nihss_score: i32,
    pub lab_results: Option<LabResults>,
    pub consent: Option<Consent>,
}

impl Consultation {
    /// Whether the patient was still inside the 4.5-hour tPA window when
    /// this consultation was recorded. `None` when onset is unknown.
    /// Exactly 4.5 hours counts as inside the window.
    pub fn within_tpa_window(&self) -> Option<bool> {
        let onset = self.symptom_onset_time?;
        let elapsed = self.recorded_at.signed_duration_since(onset);
        Some(elapsed <= Duration::seconds(TPA_WINDOW_SECS))
    }
}
