//! Bounded FIFO of game events shared by the tick interrupt and the game loop.
//!
//! The tick interrupt and chaining handlers produce; the game loop is the only
//! consumer. One slot is always left empty, so a queue of `N` slots holds at
//! most `N - 1` events. Posting into a full queue is rejected with
//! [`Error::QueueFull`]: nothing already queued is ever overwritten.

use core::{
    cell::{
        Cell,
        UnsafeCell,
    },
    sync::atomic::{
        AtomicUsize,
        Ordering,
    },
};

use critical_section::Mutex;

use crate::{
    error::{
        Error,
        Result,
    },
    event::Event,
};

/// Circular buffer of [`Event`]s with an explicit element count.
pub struct WorkQueue<const N: usize> {
    slots: [UnsafeCell<Event>; N],
    /// Next slot to read. Consumer only.
    head: AtomicUsize,
    /// Next slot to write. Only touched inside a critical section.
    tail: AtomicUsize,
    count: Mutex<Cell<usize>>,
    dropped: Mutex<Cell<u32>>,
}

// SAFETY: producers write the tail slot only inside a critical section, and
// only while a free slot exists. The consumer reads the head slot only while
// `count > 0`. With one slot reserved the tail never reaches an occupied head
// slot, so no slot is read and written at the same time.
unsafe impl<const N: usize> Sync for WorkQueue<N> {}

impl<const N: usize> WorkQueue<N> {
    pub const fn new() -> Self {
        assert!(N >= 2, "a work queue needs at least two slots");
        Self {
            slots: [const { UnsafeCell::new(Event::MoveCatcher) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            count: Mutex::new(Cell::new(0)),
            dropped: Mutex::new(Cell::new(0)),
        }
    }

    /// Number of events the queue can hold.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.count.borrow(cs).get())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Events rejected because the queue was full.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.dropped.borrow(cs).get())
    }

    /// Append `event` at the tail. Safe to call from interrupt context.
    pub fn enqueue(&self, event: Event) -> Result<()> {
        critical_section::with(|cs| {
            let count = self.count.borrow(cs);
            if count.get() >= self.capacity() {
                let dropped = self.dropped.borrow(cs);
                dropped.set(dropped.get().wrapping_add(1));
                return Err(Error::QueueFull);
            }

            let tail = self.tail.load(Ordering::Relaxed);
            // SAFETY: the slot at `tail` is free (count < N - 1) and no other
            // producer can run while we hold the critical section.
            unsafe { *self.slots[tail].get() = event };
            self.tail.store((tail + 1) % N, Ordering::Relaxed);
            count.set(count.get() + 1);
            Ok(())
        })
    }

    /// Remove the event at the head.
    ///
    /// Must only be called from the consumer; never from interrupt context.
    pub fn dequeue(&self) -> Result<Event> {
        if self.is_empty() {
            return Err(Error::QueueEmpty);
        }

        let head = self.head.load(Ordering::Relaxed);
        // SAFETY: count > 0, so the head slot holds a published event that no
        // producer will touch until the count below is decremented.
        let event = unsafe { *self.slots[head].get() };
        self.head.store((head + 1) % N, Ordering::Relaxed);

        critical_section::with(|cs| {
            let count = self.count.borrow(cs);
            debug_assert!(count.get() > 0);
            count.set(count.get() - 1);
        });
        Ok(event)
    }
}

impl<const N: usize> Default for WorkQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use proptest::prelude::*;

    use super::*;
    use crate::event::FallSlot;

    fn any_event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::AdvanceDummy),
            Just(Event::MoveCatcher),
            Just(Event::Rescue),
            (0u8..3).prop_map(|i| Event::LoseLife(FallSlot::new(i).unwrap())),
            (0u8..3).prop_map(|i| Event::PlayFallAnimation(FallSlot::new(i).unwrap())),
        ]
    }

    #[test]
    fn test_new_queue_is_empty() {
        let queue = WorkQueue::<8>::new();
        assert!(queue.is_empty());
        assert!(!queue.is_full());
        assert_eq!(queue.capacity(), 7);
        assert_eq!(queue.dequeue(), Err(Error::QueueEmpty));
    }

    #[test]
    fn test_single_event_round_trip() {
        let queue = WorkQueue::<8>::new();
        queue.enqueue(Event::Rescue).unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.dequeue(), Ok(Event::Rescue));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_rejects_without_overwrite() {
        let queue = WorkQueue::<4>::new();
        queue.enqueue(Event::MoveCatcher).unwrap();
        queue.enqueue(Event::AdvanceDummy).unwrap();
        queue.enqueue(Event::Rescue).unwrap();
        assert!(queue.is_full());

        assert_eq!(queue.enqueue(Event::MoveCatcher), Err(Error::QueueFull));
        assert_eq!(queue.dropped(), 1);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.dequeue(), Ok(Event::MoveCatcher));
        assert_eq!(queue.dequeue(), Ok(Event::AdvanceDummy));
        assert_eq!(queue.dequeue(), Ok(Event::Rescue));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_indices_wrap_around() {
        let queue = WorkQueue::<3>::new();
        for round in 0..10u8 {
            let slot = FallSlot::new(round % 3).unwrap();
            queue.enqueue(Event::PlayFallAnimation(slot)).unwrap();
            queue.enqueue(Event::LoseLife(slot)).unwrap();
            assert!(queue.is_full());
            assert_eq!(queue.dequeue(), Ok(Event::PlayFallAnimation(slot)));
            assert_eq!(queue.dequeue(), Ok(Event::LoseLife(slot)));
        }
        assert!(queue.is_empty());
        assert_eq!(queue.dropped(), 0);
    }

    proptest! {
        #[test]
        fn prop_dequeue_preserves_enqueue_order(events in prop::collection::vec(any_event(), 0..16)) {
            let queue = WorkQueue::<16>::new();
            for event in &events {
                queue.enqueue(*event).unwrap();
            }
            prop_assert_eq!(queue.len(), events.len());
            prop_assert_eq!(queue.is_full(), events.len() == queue.capacity());

            for event in &events {
                prop_assert_eq!(queue.dequeue(), Ok(*event));
            }
            prop_assert!(queue.is_empty());
        }

        #[test]
        fn prop_interleaved_ops_match_a_deque(ops in prop::collection::vec(prop::option::of(any_event()), 0..64)) {
            let queue = WorkQueue::<6>::new();
            let mut model = VecDeque::new();

            for op in ops {
                match op {
                    Some(event) => {
                        let accepted = queue.enqueue(event).is_ok();
                        prop_assert_eq!(accepted, model.len() < queue.capacity());
                        if accepted {
                            model.push_back(event);
                        }
                    }
                    None => {
                        prop_assert_eq!(queue.dequeue().ok(), model.pop_front());
                    }
                }
                prop_assert_eq!(queue.len(), model.len());
                prop_assert_eq!(queue.is_empty(), model.is_empty());
                prop_assert_eq!(queue.is_full(), model.len() == queue.capacity());
            }
        }
    }
}
