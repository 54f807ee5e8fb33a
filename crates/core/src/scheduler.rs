//! Coalescing of bursty work into at most one unit per frame.

/// Holds at most one pending unit of work. Scheduling while one is pending
/// replaces it; the next frame boundary takes whatever is pending.
#[derive(Debug)]
pub struct CoalescingScheduler<T> {
    pending: Option<T>,
    superseded: u64,
}

impl<T> Default for CoalescingScheduler<T> {
    fn default() -> Self {
        Self { pending: None, superseded: 0 }
    }
}

impl<T> CoalescingScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, work: T) {
        if self.pending.replace(work).is_some() {
            self.superseded += 1;
        }
    }

    /// Drops the pending unit, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Called at a frame boundary.
    pub fn take_due(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Number of units replaced before they ran.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
