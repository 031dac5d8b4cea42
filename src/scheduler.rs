//! The work queue plus the wake-up signal the game loop idles on.

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    signal::Signal,
};

use crate::{
    error::Result,
    event::Event,
    queue::WorkQueue,
};

/// Shared between the tick interrupt (which only posts) and the game loop
/// (which posts chained events and takes everything).
pub struct Scheduler<const N: usize> {
    queue: WorkQueue<N>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl<const N: usize> Scheduler<N> {
    pub const fn new() -> Self {
        Self {
            queue: WorkQueue::new(),
            wake: Signal::new(),
        }
    }

    /// Queue `event` and wake the loop. Interrupt safe.
    pub fn post(&self, event: Event) -> Result<()> {
        self.queue.enqueue(event)?;
        self.wake.signal(());
        Ok(())
    }

    /// Next pending event, if any. Game loop only.
    pub fn next(&self) -> Option<Event> {
        self.queue.dequeue().ok()
    }

    /// Wait until something has been posted. Returns at once if the queue
    /// already holds work.
    pub async fn idle(&self) {
        while self.queue.is_empty() {
            self.wake.wait().await;
        }
    }

    pub fn queue(&self) -> &WorkQueue<N> {
        &self.queue
    }
}

impl<const N: usize> Default for Scheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}
