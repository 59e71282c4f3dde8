//! Pointer event model shared by every event target.

use std::cell::Cell;
use std::rc::Rc;

/// Position in client (CSS) pixels, relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0, y: 0 };
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (i32, i32) {
    fn from(point: Point) -> Self {
        (point.x, point.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
    /// Fired for a secondary click; used as the right-button press.
    ContextMenu,
}

impl PointerEventKind {
    pub const ALL: [PointerEventKind; 4] = [
        PointerEventKind::Down,
        PointerEventKind::Up,
        PointerEventKind::Move,
        PointerEventKind::ContextMenu,
    ];

    /// DOM event type name.
    pub fn dom_name(self) -> &'static str {
        match self {
            PointerEventKind::Down => "mousedown",
            PointerEventKind::Up => "mouseup",
            PointerEventKind::Move => "mousemove",
            PointerEventKind::ContextMenu => "contextmenu",
        }
    }
}

/// Button codes as reported by `MouseEvent.button`.
#[repr(i16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Auxiliary = 1,
    Secondary = 2,
    Back = 3,
    Forward = 4,
}

impl PointerButton {
    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(PointerButton::Primary),
            1 => Some(PointerButton::Auxiliary),
            2 => Some(PointerButton::Secondary),
            3 => Some(PointerButton::Back),
            4 => Some(PointerButton::Forward),
            _ => None,
        }
    }

    /// Bit used for this button in `MouseEvent.buttons`. The held-buttons
    /// mask swaps secondary and auxiliary relative to the button codes.
    pub fn mask(self) -> u16 {
        match self {
            PointerButton::Primary => 1,
            PointerButton::Secondary => 1 << 1,
            PointerButton::Auxiliary => 1 << 2,
            PointerButton::Back => 1 << 3,
            PointerButton::Forward => 1 << 4,
        }
    }
}

/// Set of held buttons, laid out like `MouseEvent.buttons`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerButtons(u16);

impl PointerButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= button.mask();
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !button.mask();
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & button.mask()) != 0
    }

    /// True when every button in `other` is held.
    pub fn contains_all(&self, other: PointerButtons) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// A single pointer event as seen by listeners.
///
/// The default-prevented flag is shared between clones so a listener deep in
/// the dispatch can ask the host to suppress the browser's default action.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
    /// Raw `MouseEvent.button` code. Move events report 0 here in browsers.
    pub button: i16,
    pub buttons: PointerButtons,
    default_prevented: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            button: PointerButton::Primary.code(),
            buttons: PointerButtons::NONE,
            default_prevented: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button.code();
        self
    }

    pub fn with_button_code(mut self, code: i16) -> Self {
        self.button = code;
        self
    }

    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Decoded button, `None` for codes outside the standard five.
    pub fn pointer_button(&self) -> Option<PointerButton> {
        PointerButton::from_code(self.button)
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
