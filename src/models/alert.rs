use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertType::Critical => write!(f, "critical"),
            AlertType::Warning => write!(f, "warning"),
            AlertType::Info => write!(f, "info"),
        }
    }
}

/// A triage alert as produced by the rule engine. Identifiers and
/// timestamps are assigned by whoever stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub description: String,
    pub patient_id: String,
}

impl Alert {
    pub fn critical(patient_id: &str, description: String) -> Self {
        Self {
            alert_type: AlertType::Critical,
            description,
            patient_id: patient_id.to_string(),
        }
    }

    pub fn warning(patient_id: &str, description: String) -> Self {
        Self {
            alert_type: AlertType::Warning,
            description,
            patient_id: patient_id.to_string(),
        }
    }
}
