//! Actions for each store.
//!
//! Every store has its own payload enum. Use the factory functions
//! (`ScreenAction::transit`, `PatientInfoAction::set`) to build dispatchable
//! actions; they fix the discriminator together with its payload type.

pub mod patient_info;
pub mod screen;

pub use patient_info::PatientInfoAction;
pub use screen::ScreenAction;
