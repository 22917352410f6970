use anyhow::Result;
use patient_monitor_config::AppConfig;

mod actions;
mod domain_models;
mod logger;
mod reducers;
mod state;
mod views;

use actions::{PatientInfoAction, ScreenAction};
use domain_models::{PatientInfo, Screen};
use state::AppState;

fn main() -> Result<()> {
    let log_file = logger::init()?;

    log::info!("Starting patient-monitor, logging to {}", log_file.display());

    // Load the state at the very beginning of the app
    let config = AppConfig::load();
    let state = AppState::new(&config);

    run(&state)?;

    log::info!("Exiting patient-monitor");
    Ok(())
}

fn run(state: &AppState) -> Result<()> {
    // Main UI screen
    let screen_subscription = state
        .screen
        .subscribe(|screen| println!("{}", views::navigation_line(screen)));

    // Patient info screen
    let patient_subscription = state
        .patient_info
        .subscribe(|patient| println!("{}", views::patient_line(patient)));

    state.screen.dispatch(ScreenAction::transit(Screen::Live))?;
    state
        .patient_info
        .dispatch(PatientInfoAction::set(PatientInfo::new("naum", "puroski")))?;

    state.screen.unsubscribe(screen_subscription);
    state.patient_info.unsubscribe(patient_subscription);
    Ok(())
}
