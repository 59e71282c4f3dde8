//! Rubber-band selection built from press, move and release listeners.

use crate::abort::{AbortSignal, Abortable};
use crate::awaiter::EventFilter;
use crate::input::PointerInput;
use crate::target::{EventTarget, ListenerAction, ListenerId};
use crate::types::{Point, PointerButton, PointerEvent, PointerEventKind};
use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Start and end of a primary-button drag, in client pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
}

impl Selection {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Corners ordered as (top-left, bottom-right) regardless of drag
    /// direction.
    pub fn rect(&self) -> (Point, Point) {
        (
            Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
    }

    pub fn width(&self) -> u32 {
        self.end.x.abs_diff(self.start.x)
    }

    pub fn height(&self) -> u32 {
        self.end.y.abs_diff(self.start.y)
    }

    /// True when the pointer moved no more than `tolerance` pixels on either
    /// axis between press and release.
    pub fn is_click(&self, tolerance: u32) -> bool {
        self.width() <= tolerance && self.height() <= tolerance
    }

    /// Clamps the end point into the `[min, max]` box; the start is kept.
    pub fn clamp_end(self, min: Point, max: Point) -> Self {
        Self {
            start: self.start,
            end: Point::new(
                self.end.x.clamp(min.x, max.x),
                self.end.y.clamp(min.y, max.y),
            ),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum DragPhase {
    Idle,
    Dragging(Point),
    Finished(Selection),
}

struct DragState {
    phase: DragPhase,
    moves: VecDeque<Selection>,
    press: Option<ListenerId>,
    release: Option<ListenerId>,
    movement: Option<ListenerId>,
    waker: Option<Waker>,
}

impl DragState {
    fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
            moves: VecDeque::new(),
            press: None,
            release: None,
            movement: None,
            waker: None,
        }
    }

    fn take_registrations(&mut self) -> Vec<ListenerId> {
        [self.press.take(), self.release.take(), self.movement.take()]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn wake_task(mut state: RefMut<'_, DragState>) {
    let waker = state.waker.take();
    drop(state);
    if let Some(waker) = waker {
        waker.wake();
    }
}

/// Future returned by [`PointerInput::wait_for_drag`].
///
/// Press, release and movement listeners are all registered when the drag
/// is created and stay registered for its whole life, so events dispatched
/// between polls are never lost. Movements are queued and handed to the
/// callback in arrival order on the next poll.
pub struct DragWait<T: EventTarget, F> {
    target: T,
    state: Rc<RefCell<DragState>>,
    on_move: F,
}

// No field is structurally pinned.
impl<T: EventTarget, F> Unpin for DragWait<T, F> {}

impl<T: EventTarget, F: FnMut(Selection)> DragWait<T, F> {
    fn new(target: T, on_move: F) -> Self {
        let state = Rc::new(RefCell::new(DragState::new()));
        let primary = EventFilter::Button(PointerButton::Primary);

        let press = {
            let weak = Rc::downgrade(&state);
            let filter = primary.clone();
            target.add_listener(
                PointerEventKind::Down,
                Rc::new(move |event: &PointerEvent| {
                    let Some(state) = weak.upgrade() else {
                        return ListenerAction::Remove;
                    };
                    if !filter.matches(event) {
                        return ListenerAction::Keep;
                    }
                    let mut state = state.borrow_mut();
                    state.press = None;
                    if matches!(state.phase, DragPhase::Idle) {
                        log::debug!("drag started at {:?}", event.position);
                        state.phase = DragPhase::Dragging(event.position);
                    }
                    ListenerAction::Remove
                }),
            )
        };

        let release = {
            let weak = Rc::downgrade(&state);
            target.add_listener(
                PointerEventKind::Up,
                Rc::new(move |event: &PointerEvent| {
                    let Some(state) = weak.upgrade() else {
                        return ListenerAction::Remove;
                    };
                    if !primary.matches(event) {
                        return ListenerAction::Keep;
                    }
                    let mut state = state.borrow_mut();
                    let DragPhase::Dragging(start) = state.phase else {
                        return ListenerAction::Keep;
                    };
                    let selection = Selection::new(start, event.position);
                    log::debug!("drag finished: {:?}", selection);
                    state.phase = DragPhase::Finished(selection);
                    state.release = None;
                    wake_task(state);
                    ListenerAction::Remove
                }),
            )
        };

        let movement = {
            let weak = Rc::downgrade(&state);
            target.add_listener(
                PointerEventKind::Move,
                Rc::new(move |event: &PointerEvent| {
                    let Some(state) = weak.upgrade() else {
                        return ListenerAction::Remove;
                    };
                    let mut state = state.borrow_mut();
                    let phase = state.phase;
                    match phase {
                        DragPhase::Idle => ListenerAction::Keep,
                        DragPhase::Dragging(start) => {
                            state.moves.push_back(Selection::new(start, event.position));
                            wake_task(state);
                            ListenerAction::Keep
                        }
                        DragPhase::Finished(_) => {
                            state.movement = None;
                            ListenerAction::Remove
                        }
                    }
                }),
            )
        };

        {
            let mut registered = state.borrow_mut();
            registered.press = Some(press);
            registered.release = Some(release);
            registered.movement = Some(movement);
        }
        Self {
            target,
            state,
            on_move,
        }
    }

    /// True once the primary release has been seen.
    pub fn is_complete(&self) -> bool {
        matches!(self.state.borrow().phase, DragPhase::Finished(_))
    }

    pub fn abortable(self, signal: &AbortSignal) -> Abortable<Self> {
        Abortable::new(self, signal)
    }
}

impl<T: EventTarget, F> DragWait<T, F> {
    fn release_listeners(&self) {
        let registrations = self.state.borrow_mut().take_registrations();
        if !registrations.is_empty() {
            log::trace!("removing {} drag listeners", registrations.len());
        }
        for id in registrations {
            self.target.remove_listener(id);
        }
    }
}

impl<T: EventTarget, F: FnMut(Selection)> Future for DragWait<T, F> {
    type Output = Selection;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Selection> {
        let this = self.get_mut();
        loop {
            let mut state = this.state.borrow_mut();
            if let Some(span) = state.moves.pop_front() {
                drop(state);
                (this.on_move)(span);
                continue;
            }
            let phase = state.phase;
            if let DragPhase::Finished(selection) = phase {
                drop(state);
                this.release_listeners();
                return Poll::Ready(selection);
            }
            state.waker = Some(cx.waker().clone());
            return Poll::Pending;
        }
    }
}

impl<T: EventTarget, F> Drop for DragWait<T, F> {
    fn drop(&mut self) {
        self.release_listeners();
    }
}

impl<T: EventTarget, F> fmt::Debug for DragWait<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DragWait")
            .field("phase", &state.phase)
            .field("queued_moves", &state.moves.len())
            .finish()
    }
}

impl<T: EventTarget + Clone> PointerInput<T> {
    /// Waits for a primary press, reports the span so far to `on_move` for
    /// every movement until the primary release, then returns the final span.
    pub fn wait_for_drag<F: FnMut(Selection)>(&self, on_move: F) -> DragWait<T, F> {
        DragWait::new(self.target().clone(), on_move)
    }
}
