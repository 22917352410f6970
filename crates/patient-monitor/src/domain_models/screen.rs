use strum::{Display, EnumString};

/// Screens the monitor can navigate between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Screen {
    #[default]
    Setup,
    Live,
    Record,
    Other,
}
