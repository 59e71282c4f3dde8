//! The pointer facade: position tracking plus the four wait operations.

use crate::abort::{AbortSignal, Abortable};
use crate::awaiter::{EventFilter, NextEvent};
use crate::settings::InputSettings;
use crate::state::InputState;
use crate::target::{EventTarget, ListenerAction, ListenerId};
use crate::types::{PointerButton, PointerEvent, PointerEventKind};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Pointer input bound to one event target.
///
/// Installing registers the position tracker (and the optional context-menu
/// suppression) on the target; dropping the `PointerInput` removes them.
/// Waits created from it hold their own handle to the target and may
/// outlive it.
pub struct PointerInput<T: EventTarget + Clone> {
    target: T,
    state: Rc<InputState>,
    settings: InputSettings,
    tracker_listeners: Vec<ListenerId>,
}

impl<T: EventTarget + Clone> PointerInput<T> {
    pub fn install(target: T, settings: InputSettings) -> Self {
        let state = Rc::new(InputState::new());
        let mut tracker_listeners = Vec::with_capacity(2);

        {
            let state = Rc::clone(&state);
            let suppress_selection = settings.suppress_text_selection;
            let id = target.add_listener(
                PointerEventKind::Move,
                Rc::new(move |event: &PointerEvent| {
                    state.record_position(event.position);
                    if suppress_selection {
                        event.prevent_default();
                    }
                    ListenerAction::Keep
                }),
            );
            tracker_listeners.push(id);
        }

        if settings.suppress_context_menu {
            let id = target.add_listener(
                PointerEventKind::ContextMenu,
                Rc::new(|event: &PointerEvent| {
                    event.prevent_default();
                    ListenerAction::Keep
                }),
            );
            tracker_listeners.push(id);
        }

        log::debug!("pointer input installed with {:?}", settings);
        Self {
            target,
            state,
            settings,
            tracker_listeners,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    /// Shared handle to the tracked position.
    pub fn state(&self) -> Rc<InputState> {
        Rc::clone(&self.state)
    }

    pub fn get_pointer_x(&self) -> i32 {
        self.state.pointer_x()
    }

    pub fn get_pointer_y(&self) -> i32 {
        self.state.pointer_y()
    }

    pub fn get_pointer_position(&self) -> (i32, i32) {
        self.state.pointer_position().into()
    }

    /// Waits for the next event of `kind` that passes `filter`, yielding the
    /// event itself.
    pub fn next_event(&self, kind: PointerEventKind, filter: EventFilter) -> NextEvent<T> {
        NextEvent::new(self.target.clone(), kind, filter)
    }

    /// Primary button press.
    pub fn wait_for_pointer_down(&self) -> PointerWait<T> {
        self.wait(
            PointerEventKind::Down,
            EventFilter::Button(PointerButton::Primary),
        )
    }

    /// Primary button release.
    pub fn wait_for_pointer_up(&self) -> PointerWait<T> {
        self.wait(
            PointerEventKind::Up,
            EventFilter::Button(PointerButton::Primary),
        )
    }

    /// Right click, observed through the context-menu event.
    pub fn wait_for_right_button_down(&self) -> PointerWait<T> {
        self.wait(PointerEventKind::ContextMenu, EventFilter::Any)
    }

    /// Pointer movement, filtered per [`InputSettings::move_filter`].
    pub fn wait_for_pointer_move(&self) -> PointerWait<T> {
        self.wait(PointerEventKind::Move, self.settings.move_filter.event_filter())
    }

    fn wait(&self, kind: PointerEventKind, filter: EventFilter) -> PointerWait<T> {
        PointerWait {
            next: self.next_event(kind, filter),
        }
    }
}

impl<T: EventTarget + Clone> Drop for PointerInput<T> {
    fn drop(&mut self) {
        for id in self.tracker_listeners.drain(..) {
            self.target.remove_listener(id);
        }
    }
}

impl<T: EventTarget + Clone> fmt::Debug for PointerInput<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerInput")
            .field("position", &self.state.pointer_position())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Payload-free wait returned by the `wait_for_*` operations.
#[derive(Debug)]
pub struct PointerWait<T: EventTarget> {
    next: NextEvent<T>,
}

impl<T: EventTarget> PointerWait<T> {
    pub fn is_complete(&self) -> bool {
        self.next.is_complete()
    }

    pub fn abortable(self, signal: &AbortSignal) -> Abortable<Self> {
        Abortable::new(self, signal)
    }
}

impl<T: EventTarget> Future for PointerWait<T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.next.poll_event(cx).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MoveFilter;
    use crate::target::LocalEventTarget;
    use crate::types::{Point, PointerButtons};
    use futures_task::noop_waker_ref;

    fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
        let mut cx = Context::from_waker(noop_waker_ref());
        Pin::new(future).poll(&mut cx)
    }

    #[test]
    fn tracker_follows_moves_and_prevents_selection() {
        let target = LocalEventTarget::new();
        let input = PointerInput::install(target.clone(), InputSettings::default());

        let event = PointerEvent::new(PointerEventKind::Move, Point::new(10, 20));
        target.dispatch(&event);

        assert_eq!(input.get_pointer_x(), 10);
        assert_eq!(input.get_pointer_y(), 20);
        assert_eq!(input.get_pointer_position(), (10, 20));
        assert!(event.is_default_prevented());
    }

    #[test]
    fn suppression_can_be_turned_off() {
        let target = LocalEventTarget::new();
        let settings = InputSettings::new()
            .with_text_selection_suppressed(false)
            .with_context_menu_suppressed(false);
        let _input = PointerInput::install(target.clone(), settings);
        assert_eq!(target.listener_count(PointerEventKind::ContextMenu), 0);

        let movement = PointerEvent::new(PointerEventKind::Move, Point::new(1, 1));
        let menu = PointerEvent::new(PointerEventKind::ContextMenu, Point::new(1, 1))
            .with_button(PointerButton::Secondary);
        target.dispatch(&movement);
        target.dispatch(&menu);
        assert!(!movement.is_default_prevented());
        assert!(!menu.is_default_prevented());
    }

    #[test]
    fn dropping_input_removes_tracker_listeners() {
        let target = LocalEventTarget::new();
        let input = PointerInput::install(target.clone(), InputSettings::default());
        assert_eq!(target.total_listener_count(), 2);
        drop(input);
        assert_eq!(target.total_listener_count(), 0);
    }

    #[test]
    fn held_move_filter_ignores_hover() {
        let target = LocalEventTarget::new();
        let input = PointerInput::install(
            target.clone(),
            InputSettings::new().with_move_filter(MoveFilter::PrimaryButtonHeld),
        );
        let mut wait = input.wait_for_pointer_move();

        target.dispatch(&PointerEvent::new(PointerEventKind::Move, Point::new(5, 5)));
        assert!(poll_once(&mut wait).is_pending());

        target.dispatch(
            &PointerEvent::new(PointerEventKind::Move, Point::new(6, 6))
                .with_buttons(PointerButtons::new().with(PointerButton::Primary)),
        );
        assert!(poll_once(&mut wait).is_ready());
        assert_eq!(input.get_pointer_position(), (6, 6));
    }
}
