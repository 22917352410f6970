//! Console output for store notifications

use crate::domain_models::{PatientInfo, Screen};

pub fn navigation_line(screen: &Screen) -> String {
    format!("Navigate to: {}", screen)
}

pub fn patient_line(patient: &PatientInfo) -> String {
    format!("Load patient: {} {}", patient.name, patient.last_name)
}
