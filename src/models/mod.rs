//! Data contracts for the stroke unit record system.

pub mod alert;
pub mod consultation;
pub mod patient;

pub use alert::{Alert, AlertType};
pub use consultation::{Consent, Consultation, LabResults, TPA_WINDOW_SECS};
pub use patient::{Gender, Patient, RecentEvents, Vitals};
