use crate::awaiter::EventFilter;
use crate::types::{PointerButton, PointerButtons};

/// How `wait_for_pointer_move` decides which movement counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MoveFilter {
    /// Same `button == 0` check as the press/release waits. Browsers report
    /// 0 for every `mousemove`, so in practice any movement matches.
    #[default]
    PrimaryButtonCode,
    /// Only movement while the primary button is held (drag).
    PrimaryButtonHeld,
    Any,
}

impl MoveFilter {
    pub fn event_filter(self) -> EventFilter {
        match self {
            MoveFilter::PrimaryButtonCode => EventFilter::Button(PointerButton::Primary),
            MoveFilter::PrimaryButtonHeld => {
                EventFilter::ButtonsHeld(PointerButtons::new().with(PointerButton::Primary))
            }
            MoveFilter::Any => EventFilter::Any,
        }
    }
}

/// Configuration for a [`PointerInput`](crate::PointerInput).
#[derive(Clone, Debug)]
pub struct InputSettings {
    /// Prevent the default action of move events so dragging does not
    /// select page text.
    pub suppress_text_selection: bool,
    /// Prevent the browser context menu so right-click stays available to
    /// `wait_for_right_button_down`. Turn off to keep developer tools
    /// reachable from the context menu.
    pub suppress_context_menu: bool,
    pub move_filter: MoveFilter,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            suppress_text_selection: true,
            suppress_context_menu: true,
            move_filter: MoveFilter::default(),
        }
    }
}

impl InputSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_selection_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_text_selection = suppress;
        self
    }

    pub fn with_context_menu_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_context_menu = suppress;
        self
    }

    pub fn with_move_filter(mut self, filter: MoveFilter) -> Self {
        self.move_filter = filter;
        self
    }
}
