use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle that stops a [`FrameTask`]; clones share the same flag
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Stop the task. Returns true only for the call that actually cancelled it.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Cancellable repeating task, fired once per display frame with the elapsed time
///
/// A fire after cancellation does nothing and returns `None`, so a frame callback
/// that arrives late never touches released resources.
#[derive(Debug, Default)]
pub struct FrameTask {
    handle: CancelHandle,
    runs: u64,
}

impl FrameTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    pub fn cancel(&self) -> bool {
        self.handle.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    /// Number of invocations that actually ran
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Run `body` for time `t` unless cancelled
    pub fn fire<T, F: FnOnce(f32) -> T>(&mut self, t: f32, body: F) -> Option<T> {
        if self.handle.is_cancelled() {
            return None;
        }
        self.runs += 1;
        Some(body(t))
    }
}
