//! Clinical alert rule engine.
//!
//! Maps a patient snapshot plus a submitted consultation to the batch of
//! triage alerts it warrants: the tPA eligibility checklist (NIHSS,
//! vitals, labs, contraindicating history, treatment window, consent).
//! Every caller that creates alerts routes through [`check_alerts`];
//! thresholds are never duplicated at call sites.

use thiserror::Error;

use crate::models::{Alert, Consultation, Patient};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertError {
    /// A field the rules cannot run without was left empty upstream.
    #[error("required field `{field}` is missing")]
    MissingField { field: &'static str },
    /// Blood pressure must be two integers separated by a slash.
    #[error("malformed blood pressure reading `{value}`: expected SYS/DIA")]
    MalformedVitals { value: String },
}

/// Evaluate every alert rule against one consultation.
///
/// Pure: the same snapshots always yield the same alerts in the same
/// order. Rules run in a fixed sequence and are independent of each
/// other; each emits at most one alert, except the recent-events block
/// which emits one per recorded contraindication. Absent optional data
/// (labs, consent, onset time, glucose, respiratory rate) skips the
/// corresponding rule silently.
///
/// The returned batch carries no ids or timestamps; persistence is the
/// caller's concern, and the batch should be stored atomically.
pub fn check_alerts(
    patient: &Patient,
    consultation: &Consultation,
) -> Result<Vec<Alert>, AlertError> {
    let vitals = &consultation.vitals;
    let (systolic, diastolic) = parse_blood_pressure(&vitals.blood_pressure)?;

    let id = patient.hospital_id.as_str();
    let mut alerts = Vec::new();

    // NIHSS severity
    if consultation.nihss_score >= 4 {
        alerts.push(Alert::warning(
            id,
            format!(
                "NIHSS score ({}) indicates potential stroke",
                consultation.nihss_score
            ),
        ));
    }

    // Blood pressure above the tPA administration limit
    if systolic > 185 || diastolic > 110 {
        alerts.push(Alert::critical(
            id,
            format!(
                "High blood pressure ({}) detected - tPA contraindicated",
                vitals.blood_pressure
            ),
        ));
    }

    // Heart rate outside 60-100 bpm
    if vitals.heart_rate < 60 || vitals.heart_rate > 100 {
        alerts.push(Alert::warning(
            id,
            format!("Abnormal heart rate ({} bpm) detected", vitals.heart_rate),
        ));
    }

    // Oxygen saturation below 95%
    if vitals.oxygen_saturation < 95.0 {
        alerts.push(Alert::warning(
            id,
            format!(
                "Oxygen saturation below normal range ({:.1}% < 95%) - Supplemental oxygen may be required",
                vitals.oxygen_saturation
            ),
        ));
    }

    // Temperature outside 36.1-38.0 °C
    if vitals.temperature < 36.1 || vitals.temperature > 38.0 {
        alerts.push(Alert::warning(
            id,
            format!(
                "Abnormal temperature detected ({:.1}°C) - Normal range: 36.1°C to 38°C",
                vitals.temperature
            ),
        ));
    }

    // Respiratory rate outside 12-20 breaths/min, when recorded
    if let Some(rate) = vitals.respiratory_rate {
        if rate < 12 || rate > 20 {
            alerts.push(Alert::warning(
                id,
                format!(
                    "Abnormal respiratory rate detected ({rate} breaths/min) - Normal range: 12-20 breaths/min"
                ),
            ));
        }
    }

    // Blood glucose outside 50-400 mg/dL, when recorded
    if let Some(glucose) = vitals.blood_glucose {
        if glucose < 50 || glucose > 400 {
            alerts.push(Alert::critical(
                id,
                format!(
                    "Blood glucose outside tPA administration range ({glucose} mg/dL) - Normal range: 50-400 mg/dL"
                ),
            ));
        }
    }

    // Age eligibility, computed at the consultation date
    let age = patient.age_on(consultation.recorded_at.date_naive());
    if age < 18 {
        alerts.push(Alert::critical(
            id,
            format!("Patient age ({age}) is below tPA eligibility threshold"),
        ));
    }

    // Contraindicating history, one alert per recorded event
    if let Some(events) = &patient.recent_events {
        if events.recent_surgery {
            alerts.push(Alert::critical(
                id,
                "Recent surgery detected - tPA contraindicated".to_string(),
            ));
        }
        if events.recent_biopsy {
            alerts.push(Alert::critical(
                id,
                "Recent biopsy detected - tPA contraindicated".to_string(),
            ));
        }
        if events.recent_head_trauma {
            alerts.push(Alert::critical(
                id,
                "Recent head trauma detected - tPA contraindicated".to_string(),
            ));
        }
        if events.recent_stroke {
            alerts.push(Alert::critical(
                id,
                "Recent stroke detected - tPA contraindicated".to_string(),
            ));
        }
        if events.recent_mi {
            alerts.push(Alert::critical(
                id,
                "Recent myocardial infarction detected - tPA contraindicated".to_string(),
            ));
        }
    }

    // Coagulation panel
    if let Some(labs) = &consultation.lab_results {
        if let Some(inr) = labs.inr {
            if inr > 1.7 {
                alerts.push(Alert::critical(
                    id,
                    format!(
                        "INR too high for tPA administration ({inr:.1} > 1.7) - tPA contraindicated"
                    ),
                ));
            }
        }
        if let Some(platelets) = labs.platelet_count {
            if platelets < 100_000 {
                alerts.push(Alert::critical(
                    id,
                    format!(
                        "Platelet count too low for tPA administration ({platelets} x10³/μL < 100,000) - tPA contraindicated"
                    ),
                ));
            }
        }
    }

    // Treatment window, exactly 4.5 hours still counts as inside
    if consultation.within_tpa_window() == Some(false) {
        alerts.push(Alert::critical(
            id,
            "Patient outside tPA treatment window (>4.5 hours)".to_string(),
        ));
    }

    // Consent must be recorded and explicitly negative to alert; a
    // consultation with no consent record raises nothing.
    if let Some(consent) = &consultation.consent {
        if !consent.tpa_consent {
            alerts.push(Alert::critical(
                id,
                "No consent for tPA administration".to_string(),
            ));
        }
    }

    Ok(alerts)
}

fn parse_blood_pressure(raw: &str) -> Result<(i32, i32), AlertError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AlertError::MissingField {
            field: "blood_pressure",
        });
    }
    let malformed = || AlertError::MalformedVitals {
        value: raw.to_string(),
    };
    let (systolic, diastolic) = trimmed.split_once('/').ok_or_else(malformed)?;
    let systolic = systolic.trim().parse().map_err(|_| malformed())?;
    let diastolic = diastolic.trim().parse().map_err(|_| malformed())?;
    Ok((systolic, diastolic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AlertType, Consent, Gender, LabResults, RecentEvents, Vitals, TPA_WINDOW_SECS,
    };
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use test_case::test_case;

    fn recorded_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn normal_vitals() -> Vitals {
        Vitals {
            blood_pressure: "120/80".into(),
            heart_rate: 75,
            oxygen_saturation: 98.0,
            temperature: 37.0,
            blood_glucose: None,
            respiratory_rate: None,
        }
    }

    fn patient_aged(age: i32) -> Patient {
        // Born January 1st, so the birthday has always passed by June.
        Patient {
            hospital_id: "P-1001".into(),
            first_name: "John".into(),
            last_name: "Smith".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2025 - age, 1, 1).unwrap(),
            gender: Gender::Male,
            chief_complaint: String::new(),
            address: String::new(),
            phone_number: String::new(),
            emergency_contact: String::new(),
            medical_history: String::new(),
            current_medications: String::new(),
            allergies: String::new(),
            vitals: normal_vitals(),
            nihss_score: 0,
            recent_events: None,
        }
    }

    fn consultation(nihss_score: i32, vitals: Vitals) -> Consultation {
        Consultation {
            patient_id: "P-1001".into(),
            recorded_at: recorded_at(),
            symptom_onset_time: None,
            diagnosis: "Ischemic stroke".into(),
            treatment_plan: "Monitor vitals, administer tPA if eligible".into(),
            test_orders: String::new(),
            vitals,
            nihss_score,
            lab_results: None,
            consent: None,
        }
    }

    #[test_case(0, 0 ; "zero score is quiet")]
    #[test_case(3, 0 ; "three is below threshold")]
    #[test_case(4, 1 ; "four warns")]
    #[test_case(42, 1 ; "maximum score warns once")]
    fn nihss_threshold(score: i32, expected: usize) {
        let alerts = check_alerts(&patient_aged(59), &consultation(score, normal_vitals())).unwrap();
        assert_eq!(alerts.len(), expected);
        if expected == 1 {
            assert_eq!(alerts[0].alert_type, AlertType::Warning);
            assert_eq!(
                alerts[0].description,
                format!("NIHSS score ({score}) indicates potential stroke")
            );
        }
    }

    #[test_case("185/110", 0 ; "at both limits no alert")]
    #[test_case("186/80", 1 ; "systolic over limit")]
    #[test_case("120/111", 1 ; "diastolic over limit")]
    #[test_case("190/120", 1 ; "both over limit emits one alert")]
    fn blood_pressure_limits(bp: &str, expected: usize) {
        let mut vitals = normal_vitals();
        vitals.blood_pressure = bp.into();
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(alerts.len(), expected);
        if expected == 1 {
            assert_eq!(alerts[0].alert_type, AlertType::Critical);
            assert_eq!(
                alerts[0].description,
                format!("High blood pressure ({bp}) detected - tPA contraindicated")
            );
        }
    }

    #[test_case(60, false ; "sixty is normal")]
    #[test_case(100, false ; "one hundred is normal")]
    #[test_case(59, true ; "bradycardia warns")]
    #[test_case(101, true ; "tachycardia warns")]
    fn heart_rate_range(bpm: i32, alerted: bool) {
        let mut vitals = normal_vitals();
        vitals.heart_rate = bpm;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(alerts.len(), usize::from(alerted));
        if alerted {
            assert_eq!(
                alerts[0].description,
                format!("Abnormal heart rate ({bpm} bpm) detected")
            );
        }
    }

    #[test]
    fn oxygen_boundary_at_95() {
        let mut vitals = normal_vitals();
        vitals.oxygen_saturation = 95.0;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert!(alerts.is_empty());

        let mut vitals = normal_vitals();
        vitals.oxygen_saturation = 94.9;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].description,
            "Oxygen saturation below normal range (94.9% < 95%) - Supplemental oxygen may be required"
        );
    }

    #[test]
    fn temperature_boundary_at_38() {
        let mut vitals = normal_vitals();
        vitals.temperature = 38.0;
        assert!(check_alerts(&patient_aged(59), &consultation(0, vitals))
            .unwrap()
            .is_empty());

        let mut vitals = normal_vitals();
        vitals.temperature = 38.01;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].description,
            "Abnormal temperature detected (38.0°C) - Normal range: 36.1°C to 38°C"
        );
    }

    #[test]
    fn low_temperature_warns_with_one_decimal() {
        let mut vitals = normal_vitals();
        vitals.temperature = 35.25;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(
            alerts[0].description,
            "Abnormal temperature detected (35.2°C) - Normal range: 36.1°C to 38°C"
        );
    }

    #[test_case(Some(12), 0 ; "twelve is normal")]
    #[test_case(Some(20), 0 ; "twenty is normal")]
    #[test_case(Some(11), 1 ; "slow breathing warns")]
    #[test_case(Some(21), 1 ; "fast breathing warns")]
    #[test_case(None, 0 ; "unrecorded rate is skipped")]
    fn respiratory_rate_range(rate: Option<i32>, expected: usize) {
        let mut vitals = normal_vitals();
        vitals.respiratory_rate = rate;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(alerts.len(), expected);
    }

    #[test_case(Some(50), 0 ; "fifty is acceptable")]
    #[test_case(Some(400), 0 ; "four hundred is acceptable")]
    #[test_case(Some(49), 1 ; "hypoglycemia is critical")]
    #[test_case(Some(401), 1 ; "hyperglycemia is critical")]
    #[test_case(None, 0 ; "unrecorded glucose is skipped")]
    fn glucose_range(glucose: Option<i32>, expected: usize) {
        let mut vitals = normal_vitals();
        vitals.blood_glucose = glucose;
        let alerts = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap();
        assert_eq!(alerts.len(), expected);
        if expected == 1 {
            assert_eq!(alerts[0].alert_type, AlertType::Critical);
        }
    }

    #[test]
    fn minors_are_flagged_for_age() {
        let alerts = check_alerts(&patient_aged(17), &consultation(0, normal_vitals())).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].description,
            "Patient age (17) is below tPA eligibility threshold"
        );

        assert!(check_alerts(&patient_aged(18), &consultation(0, normal_vitals()))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn each_recent_event_raises_its_own_critical() {
        let mut patient = patient_aged(59);
        patient.recent_events = Some(RecentEvents {
            recent_surgery: true,
            recent_biopsy: true,
            recent_head_trauma: true,
            recent_stroke: true,
            recent_mi: true,
            ..Default::default()
        });
        let alerts = check_alerts(&patient, &consultation(0, normal_vitals())).unwrap();
        let descriptions: Vec<&str> = alerts.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec![
                "Recent surgery detected - tPA contraindicated",
                "Recent biopsy detected - tPA contraindicated",
                "Recent head trauma detected - tPA contraindicated",
                "Recent stroke detected - tPA contraindicated",
                "Recent myocardial infarction detected - tPA contraindicated",
            ]
        );
        assert!(alerts.iter().all(|a| a.alert_type == AlertType::Critical));
    }

    #[test]
    fn toggling_one_event_changes_only_that_alert() {
        let mut patient = patient_aged(59);
        patient.recent_events = Some(RecentEvents {
            recent_surgery: true,
            ..Default::default()
        });
        let before = check_alerts(&patient, &consultation(0, normal_vitals())).unwrap();

        patient.recent_events.as_mut().unwrap().recent_mi = true;
        let after = check_alerts(&patient, &consultation(0, normal_vitals())).unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..]);
        assert_eq!(
            after.last().unwrap().description,
            "Recent myocardial infarction detected - tPA contraindicated"
        );
    }

    #[test]
    fn inr_boundary_at_1_7() {
        let mut consultation = consultation(0, normal_vitals());
        consultation.lab_results = Some(LabResults {
            inr: Some(1.7),
            ..Default::default()
        });
        assert!(check_alerts(&patient_aged(59), &consultation)
            .unwrap()
            .is_empty());

        consultation.lab_results = Some(LabResults {
            inr: Some(1.71),
            ..Default::default()
        });
        let alerts = check_alerts(&patient_aged(59), &consultation).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].description,
            "INR too high for tPA administration (1.7 > 1.7) - tPA contraindicated"
        );
    }

    #[test]
    fn low_platelets_are_critical() {
        let mut consultation = consultation(0, normal_vitals());
        consultation.lab_results = Some(LabResults {
            platelet_count: Some(100_000),
            ..Default::default()
        });
        assert!(check_alerts(&patient_aged(59), &consultation)
            .unwrap()
            .is_empty());

        consultation.lab_results = Some(LabResults {
            platelet_count: Some(99_999),
            ..Default::default()
        });
        let alerts = check_alerts(&patient_aged(59), &consultation).unwrap();
        assert_eq!(
            alerts[0].description,
            "Platelet count too low for tPA administration (99999 x10³/μL < 100,000) - tPA contraindicated"
        );
    }

    #[test]
    fn onset_five_hours_before_is_outside_window() {
        let mut consultation = consultation(0, normal_vitals());
        consultation.symptom_onset_time = Some(consultation.recorded_at - Duration::hours(5));
        let alerts = check_alerts(&patient_aged(59), &consultation).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].description,
            "Patient outside tPA treatment window (>4.5 hours)"
        );
    }

    #[test]
    fn onset_exactly_at_window_edge_is_quiet() {
        let mut consultation = consultation(0, normal_vitals());
        consultation.symptom_onset_time =
            Some(consultation.recorded_at - Duration::seconds(TPA_WINDOW_SECS));
        assert!(check_alerts(&patient_aged(59), &consultation)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn declined_consent_is_critical_but_absent_consent_is_quiet() {
        let mut with_refusal = consultation(0, normal_vitals());
        with_refusal.consent = Some(Consent {
            tpa_consent: false,
            given_by: "Jane Smith".into(),
            relationship_to_patient: "Spouse".into(),
        });
        let alerts = check_alerts(&patient_aged(59), &with_refusal).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].description, "No consent for tPA administration");

        // No consent record at all raises nothing.
        let without = consultation(0, normal_vitals());
        assert!(check_alerts(&patient_aged(59), &without).unwrap().is_empty());

        let mut granted = consultation(0, normal_vitals());
        granted.consent = Some(Consent {
            tpa_consent: true,
            given_by: "Jane Smith".into(),
            relationship_to_patient: "Spouse".into(),
        });
        assert!(check_alerts(&patient_aged(59), &granted).unwrap().is_empty());
    }

    #[test]
    fn scenario_elevated_nihss_only() {
        let vitals = Vitals {
            blood_pressure: "160/95".into(),
            heart_rate: 88,
            oxygen_saturation: 96.0,
            temperature: 37.2,
            blood_glucose: Some(180),
            respiratory_rate: None,
        };
        let alerts = check_alerts(&patient_aged(59), &consultation(12, vitals)).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::Warning);
        assert_eq!(
            alerts[0].description,
            "NIHSS score (12) indicates potential stroke"
        );
    }

    #[test]
    fn scenario_unstable_minor() {
        let vitals = Vitals {
            blood_pressure: "190/120".into(),
            heart_rate: 110,
            oxygen_saturation: 94.0,
            temperature: 37.0,
            blood_glucose: None,
            respiratory_rate: None,
        };
        let alerts = check_alerts(&patient_aged(15), &consultation(8, vitals)).unwrap();
        assert_eq!(alerts.len(), 5);
        let types: Vec<AlertType> = alerts.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            types,
            vec![
                AlertType::Warning,  // NIHSS
                AlertType::Critical, // blood pressure
                AlertType::Warning,  // heart rate
                AlertType::Warning,  // oxygen saturation
                AlertType::Critical, // age
            ]
        );
    }

    #[test]
    fn scenario_contraindicated_history_only() {
        let mut patient = patient_aged(59);
        patient.recent_events = Some(RecentEvents {
            recent_surgery: true,
            recent_mi: true,
            ..Default::default()
        });
        let alerts = check_alerts(&patient, &consultation(2, normal_vitals())).unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.alert_type == AlertType::Critical));
        assert_eq!(
            alerts[0].description,
            "Recent surgery detected - tPA contraindicated"
        );
        assert_eq!(
            alerts[1].description,
            "Recent myocardial infarction detected - tPA contraindicated"
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut patient = patient_aged(15);
        patient.recent_events = Some(RecentEvents {
            recent_stroke: true,
            ..Default::default()
        });
        let mut consultation = consultation(9, Vitals {
            blood_pressure: "200/115".into(),
            heart_rate: 45,
            oxygen_saturation: 91.5,
            temperature: 39.2,
            blood_glucose: Some(420),
            respiratory_rate: Some(24),
        });
        consultation.symptom_onset_time = Some(consultation.recorded_at - Duration::hours(6));
        consultation.lab_results = Some(LabResults {
            inr: Some(2.3),
            platelet_count: Some(80_000),
            ..Default::default()
        });
        consultation.consent = Some(Consent {
            tpa_consent: false,
            given_by: String::new(),
            relationship_to_patient: String::new(),
        });

        let first = check_alerts(&patient, &consultation).unwrap();
        let second = check_alerts(&patient, &consultation).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 13);
    }

    #[test]
    fn empty_blood_pressure_is_a_missing_field() {
        let mut vitals = normal_vitals();
        vitals.blood_pressure = "  ".into();
        let err = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap_err();
        assert_eq!(
            err,
            AlertError::MissingField {
                field: "blood_pressure"
            }
        );
    }

    #[test_case("120-80" ; "wrong separator")]
    #[test_case("120/80/60" ; "too many parts")]
    #[test_case("high/80" ; "non numeric systolic")]
    #[test_case("120/" ; "empty diastolic")]
    fn unparseable_blood_pressure_is_malformed(bp: &str) {
        let mut vitals = normal_vitals();
        vitals.blood_pressure = bp.into();
        let err = check_alerts(&patient_aged(59), &consultation(0, vitals)).unwrap_err();
        assert_eq!(
            err,
            AlertError::MalformedVitals {
                value: bp.to_string()
            }
        );
    }
}
