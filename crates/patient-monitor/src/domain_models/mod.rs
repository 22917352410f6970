mod patient_info;
mod screen;

pub use patient_info::PatientInfo;
pub use screen::Screen;
