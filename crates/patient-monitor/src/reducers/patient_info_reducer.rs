//! Patient Info Reducer

use slice_store::Action;

use crate::actions::PatientInfoAction;
use crate::domain_models::PatientInfo;

/// Reducer for the patient record.
///
/// Actions this reducer does not apply keep the previous record rather than
/// falling back to a placeholder.
pub fn reduce(state: PatientInfo, action: &Action<PatientInfoAction>) -> PatientInfo {
    if action.is_error() {
        return state;
    }

    match action.payload() {
        PatientInfoAction::Set(patient_info) => patient_info.clone(),
    }
}
