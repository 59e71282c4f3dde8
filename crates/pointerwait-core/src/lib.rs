//! Awaitable pointer events and last-known pointer position.
//!
//! [`PointerInput`] ties the pieces together: it tracks the pointer on an
//! [`EventTarget`] and hands out single-shot waits for press, release,
//! right-click and movement. Hosts feed events through
//! [`LocalEventTarget`] or a platform backend.

mod abort;
mod awaiter;
mod drag;
mod input;
mod settings;
mod state;
mod target;
mod types;

pub use abort::{AbortSignal, Abortable, WaitError};
pub use awaiter::{EventFilter, NextEvent};
pub use drag::{DragWait, Selection};
pub use input::{PointerInput, PointerWait};
pub use settings::{InputSettings, MoveFilter};
pub use state::InputState;
pub use target::{EventTarget, Listener, ListenerAction, ListenerId, LocalEventTarget};
pub use types::{Point, PointerButton, PointerButtons, PointerEvent, PointerEventKind};
