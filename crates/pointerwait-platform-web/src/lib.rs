//! Browser backend: forwards DOM mouse events into pointerwait listeners.

use pointerwait_core::{
    EventTarget, InputSettings, Listener, ListenerId, LocalEventTarget, Point, PointerButtons,
    PointerEvent, PointerEventKind, PointerInput,
};
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MouseEvent;

struct DomBinding {
    kind: PointerEventKind,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

struct DomInner {
    element: web_sys::EventTarget,
    local: LocalEventTarget,
    bindings: Vec<DomBinding>,
}

impl Drop for DomInner {
    fn drop(&mut self) {
        for binding in self.bindings.drain(..) {
            let result = self.element.remove_event_listener_with_callback(
                binding.kind.dom_name(),
                binding.closure.as_ref().unchecked_ref(),
            );
            if let Err(err) = result {
                log::warn!("failed to detach {} listener: {:?}", binding.kind.dom_name(), err);
            }
        }
    }
}

/// DOM node (usually the document) acting as a pointer event target.
///
/// One closure per event kind is attached to the node; each converts the
/// `MouseEvent`, runs the Rust listeners, then calls `preventDefault()` if any
/// of them asked for it. The closures are detached when the last clone is
/// dropped.
#[derive(Clone)]
pub struct DomEventTarget {
    inner: Rc<DomInner>,
}

impl DomEventTarget {
    /// Attaches to `window.document`.
    pub fn document() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no global window exists")?;
        let document = window
            .document()
            .ok_or("should have a document on window")?;
        Self::attach(document.into())
    }

    pub fn attach(element: web_sys::EventTarget) -> Result<Self, JsValue> {
        let mut inner = DomInner {
            element,
            local: LocalEventTarget::new(),
            bindings: Vec::with_capacity(PointerEventKind::ALL.len()),
        };

        for kind in PointerEventKind::ALL {
            let local = inner.local.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let pointer_event = pointer_event_from_dom(kind, &event);
                local.dispatch(&pointer_event);
                if pointer_event.is_default_prevented() {
                    event.prevent_default();
                }
            }) as Box<dyn FnMut(_)>);
            // Anything attached so far is detached by DomInner's drop if this fails.
            inner
                .element
                .add_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref())?;
            inner.bindings.push(DomBinding { kind, closure });
        }

        log::debug!("attached DOM listeners for {} pointer events", inner.bindings.len());
        Ok(Self {
            inner: Rc::new(inner),
        })
    }

    /// The Rust-side registry the DOM closures dispatch into.
    pub fn local(&self) -> &LocalEventTarget {
        &self.inner.local
    }
}

impl EventTarget for DomEventTarget {
    fn add_listener(&self, kind: PointerEventKind, listener: Listener) -> ListenerId {
        self.inner.local.add_listener(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.local.remove_listener(id)
    }
}

impl fmt::Debug for DomEventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomEventTarget")
            .field("bindings", &self.inner.bindings.len())
            .field("local", &self.inner.local)
            .finish()
    }
}

/// Pointer input tracking the whole document.
pub fn install_document_input(
    settings: InputSettings,
) -> Result<PointerInput<DomEventTarget>, JsValue> {
    let target = DomEventTarget::document()?;
    Ok(PointerInput::install(target, settings))
}

/// Visible client area as (top-left, bottom-right) corners.
pub fn viewport_bounds() -> Result<(Point, Point), JsValue> {
    let window = web_sys::window().ok_or("no global window exists")?;
    let width = window
        .inner_width()?
        .as_f64()
        .ok_or("innerWidth should be a number")?;
    let height = window
        .inner_height()?
        .as_f64()
        .ok_or("innerHeight should be a number")?;
    Ok(bounds_from_size(width, height))
}

fn bounds_from_size(width: f64, height: f64) -> (Point, Point) {
    let last = |extent: f64| (extent as i32).saturating_sub(1).max(0);
    (Point::ZERO, Point::new(last(width), last(height)))
}

pub fn pointer_event_from_dom(kind: PointerEventKind, event: &MouseEvent) -> PointerEvent {
    pointer_event_from_parts(
        kind,
        event.client_x(),
        event.client_y(),
        event.button(),
        event.buttons(),
    )
}

/// Builds a [`PointerEvent`] from raw `MouseEvent` fields. Client
/// coordinates are CSS pixels and are used as-is.
pub fn pointer_event_from_parts(
    kind: PointerEventKind,
    client_x: i32,
    client_y: i32,
    button: i16,
    buttons: u16,
) -> PointerEvent {
    PointerEvent::new(kind, Point::new(client_x, client_y))
        .with_button_code(button)
        .with_buttons(PointerButtons::from_bits(buttons))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointerwait_core::PointerButton;

    #[test]
    fn raw_fields_map_onto_event() {
        let event = pointer_event_from_parts(PointerEventKind::Down, 14, 28, 2, 0b10);
        assert_eq!(event.position, Point::new(14, 28));
        assert_eq!(event.pointer_button(), Some(PointerButton::Secondary));
        assert!(event.buttons.contains(PointerButton::Secondary));
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn move_while_dragging_reports_held_primary() {
        let event = pointer_event_from_parts(PointerEventKind::Move, 0, 0, 0, 1);
        assert_eq!(event.button, PointerButton::Primary.code());
        assert!(event.buttons.contains(PointerButton::Primary));
    }

    #[test]
    fn viewport_corners_are_inclusive_pixels() {
        assert_eq!(
            bounds_from_size(1280.0, 720.0),
            (Point::ZERO, Point::new(1279, 719))
        );
        assert_eq!(bounds_from_size(0.0, 0.0), (Point::ZERO, Point::ZERO));
    }
}
