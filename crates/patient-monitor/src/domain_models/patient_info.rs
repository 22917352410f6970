use patient_monitor_config::PatientDefaults;

/// Patient record shown on the record screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientInfo {
    pub name: String,
    pub last_name: String,
}

impl PatientInfo {
    pub fn new(name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Default for PatientInfo {
    fn default() -> Self {
        Self::from(&PatientDefaults::default())
    }
}

impl From<&PatientDefaults> for PatientInfo {
    fn from(defaults: &PatientDefaults) -> Self {
        Self::new(defaults.name.clone(), defaults.last_name.clone())
    }
}
