use patient_monitor_config::AppConfig;
use slice_store::{reducer, Action, Store};

use crate::actions::{PatientInfoAction, ScreenAction};
use crate::domain_models::{PatientInfo, Screen};
use crate::reducers::{patient_info_reducer, screen_reducer};

pub type ScreenStore = Store<Screen, Action<ScreenAction>>;
pub type PatientInfoStore = Store<PatientInfo, Action<PatientInfoAction>>;

/// Application context: one store per state slice.
///
/// Built once at startup and passed by reference to whatever needs it.
pub struct AppState {
    pub screen: ScreenStore,
    pub patient_info: PatientInfoStore,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            screen: Store::with_config(
                reducer::pure(screen_reducer::reduce),
                initial_screen(config),
                config.screen_store.clone(),
            ),
            patient_info: Store::with_config(
                reducer::pure(patient_info_reducer::reduce),
                PatientInfo::from(&config.default_patient),
                config.patient_info_store.clone(),
            ),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

fn initial_screen(config: &AppConfig) -> Screen {
    config.initial_screen.parse().unwrap_or_else(|_| {
        log::warn!(
            "Unknown initial screen '{}', starting on {}",
            config.initial_screen,
            Screen::default()
        );
        Screen::default()
    })
}
