//! Staff roles and what each one is allowed to do.
//!
//! Access is decided by an explicit capability check against an
//! enumerated role, passed in by the caller; nothing is inferred from
//! attached profile objects.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Technician,
    Neurologist,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Technician => write!(f, "technician"),
            Role::Neurologist => write!(f, "neurologist"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    RegisterPatient,
    UpdateVitals,
    ViewPatients,
    SubmitConsultation,
    ViewConsultations,
    ViewAlerts,
    AcknowledgeAlert,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::RegisterPatient => "register patient",
            Capability::UpdateVitals => "update vitals",
            Capability::ViewPatients => "view patients",
            Capability::SubmitConsultation => "submit consultation",
            Capability::ViewConsultations => "view consultations",
            Capability::ViewAlerts => "view alerts",
            Capability::AcknowledgeAlert => "acknowledge alert",
        };
        write!(f, "{name}")
    }
}

impl Role {
    /// Technicians handle intake and vitals; neurologists handle
    /// consultations and the alert inbox. Both can look up patients.
    pub fn permits(self, capability: Capability) -> bool {
        match self {
            Role::Technician => matches!(
                capability,
                Capability::RegisterPatient | Capability::UpdateVitals | Capability::ViewPatients
            ),
            Role::Neurologist => matches!(
                capability,
                Capability::ViewPatients
                    | Capability::SubmitConsultation
                    | Capability::ViewConsultations
                    | Capability::ViewAlerts
                    | Capability::AcknowledgeAlert
            ),
        }
    }
}
