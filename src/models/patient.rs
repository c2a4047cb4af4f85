use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
}

/// Point-in-time vital signs, shared by patients and consultations.
///
/// Blood pressure is carried as the entered "SYS/DIA" string; the alert
/// engine parses it and rejects anything that is not two integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub blood_pressure: String,
    pub heart_rate: i32,
    pub oxygen_saturation: f64,
    pub temperature: f64,
    pub blood_glucose: Option<i32>,
    pub respiratory_rate: Option<i32>,
}

/// tPA contraindication history taken at intake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentEvents {
    pub recent_surgery: bool,
    pub recent_biopsy: bool,
    pub recent_head_trauma: bool,
    pub recent_stroke: bool,
    pub recent_mi: bool,
    pub event_date: Option<NaiveDate>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Sequential unit identifier, e.g. "P-1001". Assigned by the registry.
    pub hospital_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub chief_complaint: String,
    pub address: String,
    pub phone_number: String,
    pub emergency_contact: String,
    pub medical_history: String,
    pub current_medications: String,
    pub allergies: String,
    pub vitals: Vitals,
    pub nihss_score: i32,
    pub recent_events: Option<RecentEvents>,
}

impl Patient {
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let mut age = date.year() - self.date_of_birth.year();
        if (date.month(), date.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }
}
