use slice_store::{Action, ActionPayload};

use crate::domain_models::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenActionKind {
    Transit,
}

/// Navigation actions
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to another screen
    Transit(Screen),
}

impl ScreenAction {
    pub fn transit(to: Screen) -> Action<ScreenAction> {
        Action::new(Self::Transit(to))
    }
}

impl ActionPayload for ScreenAction {
    type Kind = ScreenActionKind;

    fn kind(&self) -> ScreenActionKind {
        match self {
            Self::Transit(_) => ScreenActionKind::Transit,
        }
    }
}
