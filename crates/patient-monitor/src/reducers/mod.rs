pub mod patient_info_reducer;
pub mod screen_reducer;
