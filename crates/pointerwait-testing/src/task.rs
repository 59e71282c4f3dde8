use futures_task::{waker, ArcWake};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

struct WakeCounter {
    wakes: AtomicUsize,
}

impl ArcWake for WakeCounter {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.wakes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A local future driven by hand.
///
/// Nothing runs until [`ManualTask::poll`] is called, which lets tests
/// dispatch events between polls and check how often the task was woken.
pub struct ManualTask<T> {
    future: Option<Pin<Box<dyn Future<Output = T>>>>,
    output: Option<T>,
    counter: Arc<WakeCounter>,
    polls: usize,
}

impl<T> ManualTask<T> {
    pub fn new(future: impl Future<Output = T> + 'static) -> Self {
        Self {
            future: Some(Box::pin(future)),
            output: None,
            counter: Arc::new(WakeCounter {
                wakes: AtomicUsize::new(0),
            }),
            polls: 0,
        }
    }

    /// Polls the future once if it has not finished yet. Returns whether
    /// the task is complete afterwards.
    pub fn poll(&mut self) -> bool {
        let Some(future) = self.future.as_mut() else {
            return true;
        };
        self.polls += 1;
        let task_waker = waker(Arc::clone(&self.counter));
        let mut cx = Context::from_waker(&task_waker);
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => {
                self.future = None;
                self.output = Some(output);
                true
            }
            Poll::Pending => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.future.is_none()
    }

    pub fn take_output(&mut self) -> Option<T> {
        self.output.take()
    }

    /// Times the task's waker was invoked since creation.
    pub fn wake_count(&self) -> usize {
        self.counter.wakes.load(Ordering::SeqCst)
    }

    pub fn poll_count(&self) -> usize {
        self.polls
    }

    /// Drops the future without finishing it.
    pub fn cancel(&mut self) {
        if self.future.take().is_some() {
            log::trace!("manual task cancelled after {} polls", self.polls);
        }
    }
}
