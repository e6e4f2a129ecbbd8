//! Action types for the frontend
//!
//! Panels and the toolbar receive read-only views of the app and return
//! `AppAction`s instead of mutating state directly. The app applies them
//! in order after the widgets that produced them have been drawn.

use crate::cursor::{Axis, CursorColor};
use crate::viewer::ViewerAction;

/// Actions that any panel can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Forward an action to the viewer shell
    Viewer(ViewerAction),
    /// Show the native folder picker
    PickFolder,
    /// Show the native file picker
    PickFile,
    /// Switch the active theme
    SelectTheme(String),
    /// Write the active palette to the user theme directory under a new name
    SaveThemeAs(String),
    /// Change a marker pair's color and remember it
    SetCursorColor { axis: Axis, color: CursorColor },
    /// Fit the plot to the capture again
    ResetZoom,
}

impl From<ViewerAction> for AppAction {
    fn from(action: ViewerAction) -> Self {
        AppAction::Viewer(action)
    }
}
