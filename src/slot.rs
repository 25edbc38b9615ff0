//! Single-slot handoff buffer for externally produced frames.
//!
//! Stereo capture hardware delivers frames asynchronously from its own
//! callback context. The render thread only ever wants the most recent
//! frame, so the handoff is a single slot with most-recent-wins semantics:
//! no queueing and no backpressure signal back to the producer.

use std::sync::Mutex;

/// A one-element, most-recent-wins mailbox.
///
/// Wrap it in an `Arc` to share between a producer callback and the render
/// thread. `put` overwrites any frame the consumer has not picked up yet.
#[derive(Debug, Default)]
pub struct FrameSlot<T> {
    latest: Mutex<Option<T>>,
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }

    /// Deposit a frame, returning the undelivered one it replaced, if any.
    pub fn put(&self, frame: T) -> Option<T> {
        self.lock().replace(frame)
    }

    /// Remove and return the most recent frame.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<T>> {
        // A poisoned slot only means a producer panicked mid-put; the
        // contained frame is still a plain value.
        match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
