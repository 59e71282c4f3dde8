//! Single-shot futures that complete on the next matching pointer event.

use crate::abort::{AbortSignal, Abortable};
use crate::target::{EventTarget, Listener, ListenerAction, ListenerId};
use crate::types::{PointerButton, PointerButtons, PointerEvent, PointerEventKind};
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Predicate deciding whether an event is the one being waited for.
#[derive(Clone)]
pub enum EventFilter {
    Any,
    /// Matches on `PointerEvent::button`, the button that changed state.
    Button(PointerButton),
    /// Matches when every button in the mask is currently held.
    ButtonsHeld(PointerButtons),
    Custom(Rc<dyn Fn(&PointerEvent) -> bool>),
}

impl EventFilter {
    pub fn custom(predicate: impl Fn(&PointerEvent) -> bool + 'static) -> Self {
        EventFilter::Custom(Rc::new(predicate))
    }

    pub fn matches(&self, event: &PointerEvent) -> bool {
        match self {
            EventFilter::Any => true,
            EventFilter::Button(button) => event.button == button.code(),
            EventFilter::ButtonsHeld(mask) => event.buttons.contains_all(*mask),
            EventFilter::Custom(predicate) => predicate(event),
        }
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        EventFilter::Any
    }
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventFilter::Any => f.write_str("Any"),
            EventFilter::Button(button) => f.debug_tuple("Button").field(button).finish(),
            EventFilter::ButtonsHeld(mask) => f.debug_tuple("ButtonsHeld").field(mask).finish(),
            EventFilter::Custom(predicate) => f
                .debug_tuple("Custom")
                .field(&Rc::as_ptr(predicate))
                .finish(),
        }
    }
}

struct NextEventState {
    registration: Option<ListenerId>,
    fired: bool,
    event: Option<PointerEvent>,
    waker: Option<Waker>,
}

impl NextEventState {
    fn new() -> Self {
        Self {
            registration: None,
            fired: false,
            event: None,
            waker: None,
        }
    }
}

/// Completes with the first event of `kind` that passes the filter.
///
/// The listener is registered when the future is created, not on first
/// poll, so events dispatched between creation and the first `.await` still
/// count. It is removed exactly once: when the matching event arrives or
/// when the future is dropped, whichever comes first.
pub struct NextEvent<T: EventTarget> {
    target: T,
    kind: PointerEventKind,
    state: Rc<RefCell<NextEventState>>,
}

impl<T: EventTarget> NextEvent<T> {
    pub fn new(target: T, kind: PointerEventKind, filter: EventFilter) -> Self {
        let state = Rc::new(RefCell::new(NextEventState::new()));
        let weak = Rc::downgrade(&state);
        let listener: Listener = Rc::new(move |event: &PointerEvent| {
            let Some(state) = weak.upgrade() else {
                return ListenerAction::Remove;
            };
            let mut state = state.borrow_mut();
            if state.fired {
                return ListenerAction::Remove;
            }
            if !filter.matches(event) {
                return ListenerAction::Keep;
            }
            state.fired = true;
            state.registration = None;
            state.event = Some(event.clone());
            let waker = state.waker.take();
            drop(state);
            log::debug!("{:?} wait completed", event.kind);
            if let Some(waker) = waker {
                waker.wake();
            }
            ListenerAction::Remove
        });

        let id = target.add_listener(kind, listener);
        state.borrow_mut().registration = Some(id);
        Self {
            target,
            kind,
            state,
        }
    }

    pub fn kind(&self) -> PointerEventKind {
        self.kind
    }

    /// True once the matching event has been seen.
    pub fn is_complete(&self) -> bool {
        self.state.borrow().fired
    }

    /// Polls through a shared reference; the awaiter keeps no pinned state.
    pub fn poll_event(&self, cx: &mut Context<'_>) -> Poll<PointerEvent> {
        let mut state = self.state.borrow_mut();
        if let Some(event) = state.event.take() {
            return Poll::Ready(event);
        }
        state.waker = Some(cx.waker().clone());
        Poll::Pending
    }

    /// Completes with `Err(WaitError::Aborted)` once `signal` is raised.
    pub fn abortable(self, signal: &AbortSignal) -> Abortable<Self> {
        Abortable::new(self, signal)
    }
}

impl<T: EventTarget> Future for NextEvent<T> {
    type Output = PointerEvent;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.poll_event(cx)
    }
}

impl<T: EventTarget> Drop for NextEvent<T> {
    fn drop(&mut self) {
        let registration = self.state.borrow_mut().registration.take();
        if let Some(id) = registration {
            log::trace!("dropping pending {:?} wait", self.kind);
            self.target.remove_listener(id);
        }
    }
}

impl<T: EventTarget> fmt::Debug for NextEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("NextEvent")
            .field("kind", &self.kind)
            .field("registration", &state.registration)
            .field("fired", &state.fired)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::LocalEventTarget;
    use crate::types::Point;
    use futures_task::noop_waker_ref;

    fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
        let mut cx = Context::from_waker(noop_waker_ref());
        Pin::new(future).poll(&mut cx)
    }

    fn down(button: PointerButton) -> PointerEvent {
        PointerEvent::new(PointerEventKind::Down, Point::new(3, 4)).with_button(button)
    }

    #[test]
    fn registers_eagerly_and_resolves_with_event() {
        let target = LocalEventTarget::new();
        let mut next = NextEvent::new(
            target.clone(),
            PointerEventKind::Down,
            EventFilter::Button(PointerButton::Primary),
        );
        assert_eq!(target.listener_count(PointerEventKind::Down), 1);

        // Fired before the first poll.
        target.dispatch(&down(PointerButton::Primary));
        assert!(next.is_complete());
        assert_eq!(target.listener_count(PointerEventKind::Down), 0);

        match poll_once(&mut next) {
            Poll::Ready(event) => assert_eq!(event.position, Point::new(3, 4)),
            Poll::Pending => panic!("wait should have completed"),
        }
    }

    #[test]
    fn filter_mismatch_keeps_listener() {
        let target = LocalEventTarget::new();
        let mut next = NextEvent::new(
            target.clone(),
            PointerEventKind::Down,
            EventFilter::Button(PointerButton::Primary),
        );
        assert!(poll_once(&mut next).is_pending());

        target.dispatch(&down(PointerButton::Secondary));
        target.dispatch(&down(PointerButton::Auxiliary));
        assert!(poll_once(&mut next).is_pending());
        assert_eq!(target.listener_count(PointerEventKind::Down), 1);

        target.dispatch(&down(PointerButton::Primary));
        assert!(poll_once(&mut next).is_ready());
    }

    #[test]
    fn dropping_pending_wait_removes_listener() {
        let target = LocalEventTarget::new();
        let next = NextEvent::new(target.clone(), PointerEventKind::Up, EventFilter::Any);
        assert_eq!(target.total_listener_count(), 1);
        drop(next);
        assert_eq!(target.total_listener_count(), 0);
    }

    #[test]
    fn buttons_held_filter_checks_mask() {
        let filter = EventFilter::ButtonsHeld(PointerButtons::new().with(PointerButton::Primary));
        let idle = PointerEvent::new(PointerEventKind::Move, Point::ZERO);
        let dragging = idle
            .clone()
            .with_buttons(PointerButtons::new().with(PointerButton::Primary));
        assert!(!filter.matches(&idle));
        assert!(filter.matches(&dragging));
    }

    #[test]
    fn custom_filter_sees_payload() {
        let filter = EventFilter::custom(|event| event.position.x > 100);
        assert!(!filter.matches(&PointerEvent::new(PointerEventKind::Move, Point::new(50, 0))));
        assert!(filter.matches(&PointerEvent::new(PointerEventKind::Move, Point::new(150, 0))));
    }
}
