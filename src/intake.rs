//! Form-style entry parsing.
//!
//! Data arrives from entry screens as loose optional strings; this module
//! turns it into the typed models, rejecting absent required fields and
//! unparseable values before anything reaches the registry or the rule
//! engine. Checkboxes follow form conventions: present as "on" when
//! ticked, absent otherwise.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Consent, Consultation, Gender, LabResults, Patient, RecentEvents, Vitals};

/// HTML datetime-local inputs, e.g. "2025-06-01T09:30".
const ONSET_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value `{value}` for field `{field}`")]
    InvalidValue { field: &'static str, value: String },
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, IntakeError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(IntakeError::MissingField(field)),
    }
}

fn parse_value<T: FromStr>(field: &'static str, raw: &str) -> Result<T, IntakeError> {
    raw.parse().map_err(|_| IntakeError::InvalidValue {
        field,
        value: raw.to_string(),
    })
}

/// Absent or blank optional fields become `None`; anything else must parse.
fn optional<T: FromStr>(
    field: &'static str,
    value: &Option<String>,
) -> Result<Option<T>, IntakeError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(Some(parse_value(field, v)?)),
        _ => Ok(None),
    }
}

fn checkbox(value: &Option<String>) -> bool {
    value.as_deref() == Some("on")
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsForm {
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub oxygen_saturation: Option<String>,
    pub temperature: Option<String>,
    pub blood_glucose: Option<String>,
    pub respiratory_rate: Option<String>,
}

impl VitalsForm {
    pub fn parse(&self) -> Result<Vitals, IntakeError> {
        Ok(Vitals {
            blood_pressure: required("blood_pressure", &self.blood_pressure)?.to_string(),
            heart_rate: parse_value("heart_rate", required("heart_rate", &self.heart_rate)?)?,
            oxygen_saturation: parse_value(
                "oxygen_saturation",
                required("oxygen_saturation", &self.oxygen_saturation)?,
            )?,
            temperature: parse_value("temperature", required("temperature", &self.temperature)?)?,
            blood_glucose: optional("blood_glucose", &self.blood_glucose)?,
            respiratory_rate: optional("respiratory_rate", &self.respiratory_rate)?,
        })
    }
}

/// Technician intake screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub chief_complaint: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub allergies: Option<String>,
    pub vitals: VitalsForm,
}

impl PatientForm {
    /// Produce a patient record with no hospital id; the registry
    /// assigns one at admission.
    pub fn parse(&self) -> Result<Patient, IntakeError> {
        let date_of_birth = NaiveDate::parse_from_str(
            required("date_of_birth", &self.date_of_birth)?,
            DATE_FORMAT,
        )
        .map_err(|_| IntakeError::InvalidValue {
            field: "date_of_birth",
            value: self.date_of_birth.clone().unwrap_or_default(),
        })?;
        let gender = match required("gender", &self.gender)? {
            "M" => Gender::Male,
            "F" => Gender::Female,
            "O" => Gender::Other,
            other => {
                return Err(IntakeError::InvalidValue {
                    field: "gender",
                    value: other.to_string(),
                })
            }
        };
        Ok(Patient {
            hospital_id: String::new(),
            first_name: required("first_name", &self.first_name)?.to_string(),
            last_name: required("last_name", &self.last_name)?.to_string(),
            date_of_birth,
            gender,
            chief_complaint: text(&self.chief_complaint),
            address: text(&self.address),
            phone_number: text(&self.phone_number),
            emergency_contact: text(&self.emergency_contact),
            medical_history: text(&self.medical_history),
            current_medications: text(&self.current_medications),
            allergies: text(&self.allergies),
            vitals: self.vitals.parse()?,
            nihss_score: 0,
            recent_events: None,
        })
    }
}

/// Neurologist consultation screen: vitals, NIHSS, labs, history
/// checkboxes, and the consent block, all on one form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsultationForm {
    pub nihss_score: Option<String>,
    pub symptom_onset_time: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment_plan: Option<String>,
    pub test_orders: Option<String>,
    pub vitals: VitalsForm,
    pub inr: Option<String>,
    pub platelet_count: Option<String>,
    pub recent_surgery: Option<String>,
    pub recent_biopsy: Option<String>,
    pub recent_head_trauma: Option<String>,
    pub recent_stroke: Option<String>,
    pub recent_mi: Option<String>,
    pub tpa_consent: Option<String>,
    pub consent_given_by: Option<String>,
    pub relationship_to_patient: Option<String>,
}

/// A parsed consultation submission: the consultation itself plus the
/// contraindication history recorded alongside it.
#[derive(Debug, Clone)]
pub struct ConsultationEntry {
    pub consultation: Consultation,
    pub recent_events: RecentEvents,
}

impl ConsultationForm {
    /// Parse the form against an explicit submission time, which becomes
    /// the consultation's `recorded_at` stamp.
    pub fn parse_at(
        &self,
        patient_id: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<ConsultationEntry, IntakeError> {
        let nihss_score: i32 =
            parse_value("nihss_score", required("nihss_score", &self.nihss_score)?)?;
        if !(0..=42).contains(&nihss_score) {
            return Err(IntakeError::InvalidValue {
                field: "nihss_score",
                value: nihss_score.to_string(),
            });
        }

        let symptom_onset_time = match self.symptom_onset_time.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let naive = NaiveDateTime::parse_from_str(raw, ONSET_FORMAT).map_err(|_| {
                    IntakeError::InvalidValue {
                        field: "symptom_onset_time",
                        value: raw.to_string(),
                    }
                })?;
                Some(Utc.from_utc_datetime(&naive))
            }
            _ => None,
        };

        let inr = optional("inr", &self.inr)?;
        let platelet_count = optional("platelet_count", &self.platelet_count)?;
        let lab_results = if inr.is_some() || platelet_count.is_some() {
            Some(LabResults {
                inr,
                platelet_count,
                ..Default::default()
            })
        } else {
            None
        };

        let consultation = Consultation {
            patient_id: patient_id.to_string(),
            recorded_at,
            symptom_onset_time,
            diagnosis: required("diagnosis", &self.diagnosis)?.to_string(),
            treatment_plan: required("treatment_plan", &self.treatment_plan)?.to_string(),
            test_orders: text(&self.test_orders),
            vitals: self.vitals.parse()?,
            nihss_score,
            lab_results,
            consent: Some(Consent {
                tpa_consent: checkbox(&self.tpa_consent),
                given_by: text(&self.consent_given_by),
                relationship_to_patient: text(&self.relationship_to_patient),
            }),
        };

        Ok(ConsultationEntry {
            consultation,
            recent_events: RecentEvents {
                recent_surgery: checkbox(&self.recent_surgery),
                recent_biopsy: checkbox(&self.recent_biopsy),
                recent_head_trauma: checkbox(&self.recent_head_trauma),
                recent_stroke: checkbox(&self.recent_stroke),
                recent_mi: checkbox(&self.recent_mi),
                event_date: Some(recorded_at.date_naive()),
                notes: String::new(),
            },
        })
    }
}
