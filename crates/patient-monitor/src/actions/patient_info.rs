use slice_store::{Action, ActionPayload};

use crate::domain_models::PatientInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientInfoActionKind {
    Set,
}

/// Patient record actions
#[derive(Debug, Clone, PartialEq)]
pub enum PatientInfoAction {
    /// Replace the current patient record
    Set(PatientInfo),
}

impl PatientInfoAction {
    pub fn set(patient_info: PatientInfo) -> Action<PatientInfoAction> {
        Action::new(Self::Set(patient_info))
    }
}

impl ActionPayload for PatientInfoAction {
    type Kind = PatientInfoActionKind;

    fn kind(&self) -> PatientInfoActionKind {
        match self {
            Self::Set(_) => PatientInfoActionKind::Set,
        }
    }
}
