//! Listener registration seam and the in-memory event target.

use crate::types::{PointerEvent, PointerEventKind};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub type ListenerId = u64;

/// What a listener wants done with its registration after it ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerAction {
    Keep,
    Remove,
}

pub type Listener = Rc<dyn Fn(&PointerEvent) -> ListenerAction>;

/// Something pointer listeners can be attached to.
///
/// Listeners are identified by the id returned from `add_listener`. Removing
/// an id that is not registered is a no-op and returns `false`.
pub trait EventTarget {
    fn add_listener(&self, kind: PointerEventKind, listener: Listener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId) -> bool;
}

impl<T: EventTarget + ?Sized> EventTarget for Rc<T> {
    fn add_listener(&self, kind: PointerEventKind, listener: Listener) -> ListenerId {
        (**self).add_listener(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        (**self).remove_listener(id)
    }
}

struct ListenerEntry {
    id: ListenerId,
    kind: PointerEventKind,
    listener: Listener,
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: Cell<ListenerId>,
    entries: RefCell<Vec<ListenerEntry>>,
}

/// Event target that lives entirely in Rust.
///
/// Hosts push events in with [`LocalEventTarget::dispatch`]; the web backend
/// forwards DOM events through one of these. Clones share the same registry.
#[derive(Clone, Default)]
pub struct LocalEventTarget {
    registry: Rc<ListenerRegistry>,
}

impl LocalEventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener registered for its kind, in
    /// registration order.
    ///
    /// Listeners removed by an earlier listener during the same dispatch are
    /// skipped; listeners added during dispatch only see later events.
    pub fn dispatch(&self, event: &PointerEvent) {
        let pending: Vec<(ListenerId, Listener)> = self
            .registry
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.kind == event.kind)
            .map(|entry| (entry.id, Rc::clone(&entry.listener)))
            .collect();

        for (id, listener) in pending {
            if !self.is_registered(id) {
                continue;
            }
            if listener(event) == ListenerAction::Remove {
                self.remove_listener(id);
            }
        }
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.registry
            .entries
            .borrow()
            .iter()
            .any(|entry| entry.id == id)
    }

    pub fn listener_count(&self, kind: PointerEventKind) -> usize {
        self.registry
            .entries
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    pub fn total_listener_count(&self) -> usize {
        self.registry.entries.borrow().len()
    }
}

impl EventTarget for LocalEventTarget {
    fn add_listener(&self, kind: PointerEventKind, listener: Listener) -> ListenerId {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry.entries.borrow_mut().push(ListenerEntry { id, kind, listener });
        log::trace!("registered {:?} listener {}", kind, id);
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut entries = self.registry.entries.borrow_mut();
        match entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                let entry = entries.remove(index);
                drop(entries);
                log::trace!("removed {:?} listener {}", entry.kind, id);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for LocalEventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventTarget")
            .field("listeners", &self.total_listener_count())
            .finish()
    }
}
