//! Deterministic demo data for a fresh registry.
//!
//! Four admissions with graded vitals profiles, each followed by one
//! consultation submitted through the normal workflow, so every alert in
//! the seeded inbox comes out of [`crate::alerts::check_alerts`]. No
//! randomness and no module-level sample objects.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::info;

use crate::models::{Consultation, Gender, Patient, Vitals};
use crate::registry::{Registry, RegistryError};
use crate::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub patients: usize,
    pub consultations: usize,
    pub alerts: usize,
}

struct SeedPatient {
    first_name: &'static str,
    last_name: &'static str,
    date_of_birth: (i32, u32, u32),
    gender: Gender,
    chief_complaint: &'static str,
    medical_history: &'static str,
    current_medications: &'static str,
    allergies: &'static str,
    vitals: Vitals,
    nihss_score: i32,
    /// Hours from symptom onset to the consultation, when known.
    onset_hours_before: Option<i64>,
}

fn roster() -> Vec<SeedPatient> {
    vec![
        SeedPatient {
            first_name: "John",
            last_name: "Smith",
            date_of_birth: (1960, 5, 15),
            gender: Gender::Male,
            chief_complaint: "Sudden onset of right-sided weakness and speech difficulty",
            medical_history: "Hypertension, Type 2 Diabetes",
            current_medications: "Lisinopril, Metformin",
            allergies: "Penicillin",
            vitals: Vitals {
                blood_pressure: "120/80".into(),
                heart_rate: 75,
                oxygen_saturation: 98.0,
                temperature: 37.0,
                blood_glucose: Some(100),
                respiratory_rate: None,
            },
            nihss_score: 6,
            onset_hours_before: None,
        },
        SeedPatient {
            first_name: "Mary",
            last_name: "Johnson",
            date_of_birth: (1955, 8, 22),
            gender: Gender::Female,
            chief_complaint: "Acute onset of left-sided facial droop and arm weakness",
            medical_history: "Atrial Fibrillation, Hyperlipidemia",
            current_medications: "Warfarin, Atorvastatin",
            allergies: "None",
            vitals: Vitals {
                blood_pressure: "140/90".into(),
                heart_rate: 85,
                oxygen_saturation: 96.0,
                temperature: 37.2,
                blood_glucose: Some(120),
                respiratory_rate: None,
            },
            nihss_score: 12,
            onset_hours_before: Some(2),
        },
        SeedPatient {
            first_name: "Robert",
            last_name: "Williams",
            date_of_birth: (1972, 3, 10),
            gender: Gender::Male,
            chief_complaint: "Sudden severe headache and confusion",
            medical_history: "Migraine, Hypertension",
            current_medications: "Propranolol",
            allergies: "NSAIDs",
            vitals: Vitals {
                blood_pressure: "160/100".into(),
                heart_rate: 95,
                oxygen_saturation: 94.0,
                temperature: 37.5,
                blood_glucose: Some(150),
                respiratory_rate: None,
            },
            nihss_score: 4,
            onset_hours_before: None,
        },
        SeedPatient {
            first_name: "Sarah",
            last_name: "Brown",
            date_of_birth: (1948, 11, 30),
            gender: Gender::Female,
            chief_complaint: "Acute onset of vision loss in right eye",
            medical_history: "Diabetes, Coronary Artery Disease",
            current_medications: "Insulin, Aspirin",
            allergies: "Sulfa drugs",
            vitals: Vitals {
                blood_pressure: "180/110".into(),
                heart_rate: 110,
                oxygen_saturation: 92.0,
                temperature: 38.0,
                blood_glucose: Some(200),
                respiratory_rate: None,
            },
            nihss_score: 16,
            onset_hours_before: Some(5),
        },
    ]
}

/// Populate a registry with the demo roster, submitting one consultation
/// per patient at `now`.
pub fn seed_demo_data(
    registry: &mut Registry,
    now: DateTime<Utc>,
) -> Result<SeedSummary, RegistryError> {
    let mut summary = SeedSummary {
        patients: 0,
        consultations: 0,
        alerts: 0,
    };

    for entry in roster() {
        let (year, month, day) = entry.date_of_birth;
        let patient = Patient {
            hospital_id: String::new(),
            first_name: entry.first_name.into(),
            last_name: entry.last_name.into(),
            date_of_birth: NaiveDate::from_ymd_opt(year, month, day)
                .expect("seed roster dates are valid"),
            gender: entry.gender,
            chief_complaint: entry.chief_complaint.into(),
            address: String::new(),
            phone_number: String::new(),
            emergency_contact: String::new(),
            medical_history: entry.medical_history.into(),
            current_medications: entry.current_medications.into(),
            allergies: entry.allergies.into(),
            vitals: entry.vitals.clone(),
            nihss_score: 0,
            recent_events: None,
        };
        let hospital_id = registry
            .admit_patient(Role::Technician, patient)?
            .hospital_id
            .clone();
        summary.patients += 1;

        let consultation = Consultation {
            patient_id: hospital_id,
            recorded_at: now,
            symptom_onset_time: entry
                .onset_hours_before
                .map(|hours| now - Duration::hours(hours)),
            diagnosis: "Ischemic stroke".into(),
            treatment_plan: "Monitor vitals, administer tPA if eligible".into(),
            test_orders: "CT scan, blood work".into(),
            vitals: entry.vitals,
            nihss_score: entry.nihss_score,
            lab_results: None,
            consent: None,
        };
        let batch = registry.submit_consultation(Role::Neurologist, consultation, None)?;
        summary.consultations += 1;
        summary.alerts += batch.len();
    }

    info!(
        patients = summary.patients,
        consultations = summary.consultations,
        alerts = summary.alerts,
        "demo data seeded"
    );
    Ok(summary)
}
