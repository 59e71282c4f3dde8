//! Opt-in cancellation for pending waits.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitError {
    /// The wait was abandoned through its [`AbortSignal`].
    Aborted,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitError::Aborted => f.write_str("pointer wait aborted"),
        }
    }
}

impl std::error::Error for WaitError {}

/// Key of one [`Abortable`]'s waker inside the signal.
type WakerSlot = u64;

#[derive(Default)]
struct AbortInner {
    aborted: Cell<bool>,
    next_slot: Cell<WakerSlot>,
    wakers: RefCell<Vec<(WakerSlot, Waker)>>,
}

/// Shared abort flag. Clones observe the same state; once raised it stays
/// raised.
#[derive(Clone, Default)]
pub struct AbortSignal {
    inner: Rc<AbortInner>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        if self.inner.aborted.replace(true) {
            return;
        }
        let wakers = std::mem::take(&mut *self.inner.wakers.borrow_mut());
        log::debug!("abort raised, waking {} pending waits", wakers.len());
        for (_, waker) in wakers {
            waker.wake();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.get()
    }

    /// Number of pending abortable waits that would be woken by `abort()`.
    pub fn pending_waiters(&self) -> usize {
        self.inner.wakers.borrow().len()
    }

    /// Stores `waker` under `slot`, allocating the slot on first use.
    fn register(&self, slot: &mut Option<WakerSlot>, waker: &Waker) {
        let mut wakers = self.inner.wakers.borrow_mut();
        if let Some(key) = *slot {
            if let Some((_, existing)) = wakers.iter_mut().find(|(k, _)| *k == key) {
                if !existing.will_wake(waker) {
                    *existing = waker.clone();
                }
                return;
            }
        }
        let key = self.inner.next_slot.get();
        self.inner.next_slot.set(key.wrapping_add(1));
        wakers.push((key, waker.clone()));
        *slot = Some(key);
    }

    fn unregister(&self, slot: WakerSlot) {
        self.inner.wakers.borrow_mut().retain(|(k, _)| *k != slot);
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .field("pending_waiters", &self.pending_waiters())
            .finish()
    }
}

/// Wraps a future so it can be abandoned through an [`AbortSignal`].
///
/// On abort the inner future is dropped right away, which for pointer waits
/// removes their listener from the target.
pub struct Abortable<F> {
    inner: Option<F>,
    signal: AbortSignal,
    slot: Option<WakerSlot>,
}

impl<F> Abortable<F> {
    pub fn new(inner: F, signal: &AbortSignal) -> Self {
        Self {
            inner: Some(inner),
            signal: signal.clone(),
            slot: None,
        }
    }

    fn release_slot(&mut self) {
        if let Some(slot) = self.slot.take() {
            self.signal.unregister(slot);
        }
    }
}

impl<F: Future + Unpin> Future for Abortable<F> {
    type Output = Result<F::Output, WaitError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.signal.is_aborted() {
            this.inner = None;
            this.release_slot();
            return Poll::Ready(Err(WaitError::Aborted));
        }
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(Err(WaitError::Aborted));
        };
        match Pin::new(inner).poll(cx) {
            Poll::Ready(output) => {
                this.inner = None;
                this.release_slot();
                Poll::Ready(Ok(output))
            }
            Poll::Pending => {
                this.signal.register(&mut this.slot, cx.waker());
                Poll::Pending
            }
        }
    }
}

impl<F> Drop for Abortable<F> {
    fn drop(&mut self) {
        self.release_slot();
    }
}
