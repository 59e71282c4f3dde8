use pointerwait_core::{
    InputSettings, LocalEventTarget, Point, PointerButton, PointerButtons, PointerEvent,
    PointerEventKind, PointerInput,
};
use std::rc::Rc;

/// Headless harness that drives a [`PointerInput`] through a
/// [`LocalEventTarget`], the way a browser would.
///
/// The robot remembers the cursor position and which buttons are held so the
/// events it produces carry a consistent `buttons` mask. Every interaction
/// returns the dispatched event(s) so tests can inspect default prevention.
pub struct PointerRobot {
    target: LocalEventTarget,
    input: Rc<PointerInput<LocalEventTarget>>,
    position: Point,
    held: PointerButtons,
}

impl PointerRobot {
    /// Launch with default [`InputSettings`].
    pub fn launch() -> Self {
        Self::launch_with_settings(InputSettings::default())
    }

    pub fn launch_with_settings(settings: InputSettings) -> Self {
        let target = LocalEventTarget::new();
        let input = Rc::new(PointerInput::install(target.clone(), settings));
        Self {
            target,
            input,
            position: Point::ZERO,
            held: PointerButtons::NONE,
        }
    }

    /// Shared handle, so tasks can own the input while the robot drives it.
    pub fn input(&self) -> Rc<PointerInput<LocalEventTarget>> {
        Rc::clone(&self.input)
    }

    pub fn target(&self) -> &LocalEventTarget {
        &self.target
    }

    pub fn held_buttons(&self) -> PointerButtons {
        self.held
    }

    /// Listeners currently registered for `kind`, tracker included.
    pub fn listener_count(&self, kind: PointerEventKind) -> usize {
        self.target.listener_count(kind)
    }

    /// Dispatch a raw event as-is.
    pub fn dispatch(&self, event: PointerEvent) -> PointerEvent {
        self.target.dispatch(&event);
        event
    }

    /// Move the virtual pointer, dispatching a move event.
    pub fn move_pointer(&mut self, x: i32, y: i32) -> PointerEvent {
        self.position = Point::new(x, y);
        self.dispatch(
            PointerEvent::new(PointerEventKind::Move, self.position).with_buttons(self.held),
        )
    }

    /// Press `button` at the current position.
    pub fn press(&mut self, button: PointerButton) -> PointerEvent {
        self.held.insert(button);
        self.dispatch(
            PointerEvent::new(PointerEventKind::Down, self.position)
                .with_button(button)
                .with_buttons(self.held),
        )
    }

    /// Release `button` at the current position.
    pub fn release(&mut self, button: PointerButton) -> PointerEvent {
        self.held.remove(button);
        self.dispatch(
            PointerEvent::new(PointerEventKind::Up, self.position)
                .with_button(button)
                .with_buttons(self.held),
        )
    }

    /// Press and release `button` at the current position.
    pub fn click(&mut self, button: PointerButton) -> (PointerEvent, PointerEvent) {
        let down = self.press(button);
        let up = self.release(button);
        (down, up)
    }

    /// Secondary click as a browser reports it: press, release, then the
    /// context-menu event. Returns the context-menu event.
    pub fn right_click(&mut self) -> PointerEvent {
        self.click(PointerButton::Secondary);
        self.context_menu()
    }

    pub fn context_menu(&mut self) -> PointerEvent {
        self.dispatch(
            PointerEvent::new(PointerEventKind::ContextMenu, self.position)
                .with_button(PointerButton::Secondary)
                .with_buttons(self.held),
        )
    }

    /// Primary-button drag from `from` to `to` in `steps` intermediate moves.
    pub fn drag(&mut self, from: (i32, i32), to: (i32, i32), steps: u32) {
        self.move_pointer(from.0, from.1);
        self.press(PointerButton::Primary);
        let steps = steps.max(1) as i32;
        for step in 1..=steps {
            let x = from.0 + (to.0 - from.0) * step / steps;
            let y = from.1 + (to.1 - from.1) * step / steps;
            self.move_pointer(x, y);
        }
        self.release(PointerButton::Primary);
    }
}
