//! Screen Reducer

use slice_store::Action;

use crate::actions::ScreenAction;
use crate::domain_models::Screen;

/// Reducer for navigation state.
///
/// Error-flagged actions report a failed navigation and leave the screen as is.
pub fn reduce(state: Screen, action: &Action<ScreenAction>) -> Screen {
    if action.is_error() {
        return state;
    }

    match action.payload() {
        ScreenAction::Transit(to) => *to,
    }
}
