//! In-memory record keeping for the unit: patients, consultations, and
//! the alert inbox.
//!
//! This stands in for the persistence layer. State is owned by the
//! [`Registry`] value, never by module globals, and every operation takes
//! the acting [`Role`] explicitly so access decisions stay visible at the
//! call site. Alert batches produced by the rule engine are stored
//! all-or-nothing: an engine error leaves the registry untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::alerts::{check_alerts, AlertError};
use crate::models::{Alert, AlertType, Consultation, Patient, RecentEvents, Vitals};
use crate::roles::{Capability, Role};

/// Hospital ids count up from here, matching the unit's numbering.
const FIRST_PATIENT_NUMBER: u32 = 1001;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("role `{role}` lacks the `{capability}` capability")]
    AccessDenied { role: Role, capability: Capability },
    #[error("no patient with id {0}")]
    UnknownPatient(String),
    #[error("patient id {0} is already registered")]
    DuplicatePatient(String),
    #[error("no alert with id {0}")]
    UnknownAlert(Uuid),
    #[error(transparent)]
    Alert(#[from] AlertError),
}

/// An alert at rest: the engine's output plus the storage-assigned id,
/// timestamp, and acknowledgement trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAlert {
    pub id: Uuid,
    #[serde(flatten)]
    pub alert: Alert,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConsultation {
    pub id: Uuid,
    #[serde(flatten)]
    pub consultation: Consultation,
}

#[derive(Debug, Default)]
pub struct Registry {
    patients: Vec<Patient>,
    consultations: Vec<StoredConsultation>,
    alerts: Vec<StoredAlert>,
    admissions: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn require(role: Role, capability: Capability) -> Result<(), RegistryError> {
        if role.permits(capability) {
            Ok(())
        } else {
            warn!(%role, %capability, "access denied");
            Err(RegistryError::AccessDenied { role, capability })
        }
    }

    /// Register a new patient (technician). An empty `hospital_id` gets
    /// the next sequential id, "P-1001" onward.
    pub fn admit_patient(
        &mut self,
        role: Role,
        mut patient: Patient,
    ) -> Result<&Patient, RegistryError> {
        Self::require(role, Capability::RegisterPatient)?;
        if patient.hospital_id.is_empty() {
            patient.hospital_id = format!("P-{}", FIRST_PATIENT_NUMBER + self.admissions);
        }
        if self.find_patient(&patient.hospital_id).is_some() {
            return Err(RegistryError::DuplicatePatient(patient.hospital_id));
        }
        self.admissions += 1;
        info!(hospital_id = %patient.hospital_id, name = %patient.name(), "patient admitted");
        let index = self.patients.len();
        self.patients.push(patient);
        Ok(&self.patients[index])
    }

    /// Replace a patient's current vitals (technician).
    pub fn update_vitals(
        &mut self,
        role: Role,
        patient_id: &str,
        vitals: Vitals,
    ) -> Result<(), RegistryError> {
        Self::require(role, Capability::UpdateVitals)?;
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.hospital_id == patient_id)
            .ok_or_else(|| RegistryError::UnknownPatient(patient_id.to_string()))?;
        patient.vitals = vitals;
        info!(hospital_id = %patient_id, "vitals updated");
        Ok(())
    }

    /// Record a consultation (neurologist): evaluates the alert rules,
    /// then persists the consultation, refreshes the patient's current
    /// NIHSS score, vitals, and contraindication history, and appends the
    /// full alert batch. On an engine error nothing is stored.
    pub fn submit_consultation(
        &mut self,
        role: Role,
        consultation: Consultation,
        recent_events: Option<RecentEvents>,
    ) -> Result<Vec<StoredAlert>, RegistryError> {
        Self::require(role, Capability::SubmitConsultation)?;
        let patient_index = self
            .patients
            .iter()
            .position(|p| p.hospital_id == consultation.patient_id)
            .ok_or_else(|| RegistryError::UnknownPatient(consultation.patient_id.clone()))?;

        // Evaluate against a scratch snapshot so an engine error leaves
        // the stored patient untouched.
        let mut snapshot = self.patients[patient_index].clone();
        if let Some(events) = &recent_events {
            snapshot.recent_events = Some(events.clone());
        }
        let alerts = check_alerts(&snapshot, &consultation)?;

        let patient = &mut self.patients[patient_index];
        if let Some(events) = recent_events {
            patient.recent_events = Some(events);
        }
        patient.nihss_score = consultation.nihss_score;
        patient.vitals = consultation.vitals.clone();

        let consultation_id = Uuid::new_v4();
        info!(
            hospital_id = %consultation.patient_id,
            %consultation_id,
            alerts = alerts.len(),
            "consultation recorded"
        );
        self.consultations.push(StoredConsultation {
            id: consultation_id,
            consultation,
        });

        let created_at = Utc::now();
        let batch: Vec<StoredAlert> = alerts
            .into_iter()
            .map(|alert| {
                if alert.alert_type == AlertType::Critical {
                    warn!(hospital_id = %alert.patient_id, "{}", alert.description);
                }
                StoredAlert {
                    id: Uuid::new_v4(),
                    alert,
                    created_at,
                    acknowledged: false,
                    acknowledged_by: None,
                    acknowledged_at: None,
                }
            })
            .collect();
        self.alerts.extend(batch.iter().cloned());
        Ok(batch)
    }

    /// The inbox: unacknowledged alerts, newest first (neurologist).
    pub fn unacknowledged_alerts(&self, role: Role) -> Result<Vec<&StoredAlert>, RegistryError> {
        Self::require(role, Capability::ViewAlerts)?;
        Ok(self.alerts.iter().rev().filter(|a| !a.acknowledged).collect())
    }

    /// Every alert ever raised, newest first (neurologist).
    pub fn all_alerts(&self, role: Role) -> Result<Vec<&StoredAlert>, RegistryError> {
        Self::require(role, Capability::ViewAlerts)?;
        Ok(self.alerts.iter().rev().collect())
    }

    pub fn acknowledge_alert(
        &mut self,
        role: Role,
        alert_id: Uuid,
        acknowledged_by: &str,
    ) -> Result<(), RegistryError> {
        Self::require(role, Capability::AcknowledgeAlert)?;
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == alert_id)
            .ok_or(RegistryError::UnknownAlert(alert_id))?;
        alert.acknowledged = true;
        alert.acknowledged_by = Some(acknowledged_by.to_string());
        alert.acknowledged_at = Some(Utc::now());
        info!(%alert_id, %acknowledged_by, "alert acknowledged");
        Ok(())
    }

    pub fn patient(&self, role: Role, patient_id: &str) -> Result<&Patient, RegistryError> {
        Self::require(role, Capability::ViewPatients)?;
        self.find_patient(patient_id)
            .ok_or_else(|| RegistryError::UnknownPatient(patient_id.to_string()))
    }

    pub fn patients(&self, role: Role) -> Result<&[Patient], RegistryError> {
        Self::require(role, Capability::ViewPatients)?;
        Ok(&self.patients)
    }

    /// Consultation history, newest first (neurologist).
    pub fn consultations(&self, role: Role) -> Result<Vec<&StoredConsultation>, RegistryError> {
        Self::require(role, Capability::ViewConsultations)?;
        Ok(self.consultations.iter().rev().collect())
    }

    fn find_patient(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.hospital_id == patient_id)
    }
}
