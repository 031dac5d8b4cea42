//! Errors shared by the queue, the input path and the sprite lookups.

/// Everything that can go wrong inside the game core.
///
/// None of these reach the player; they are logged and handled where they
/// occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A producer tried to post into a queue with no free slot.
    #[error("work queue is full")]
    QueueFull,
    /// The consumer tried to take from an empty queue.
    #[error("work queue is empty")]
    QueueEmpty,
    /// The keypad reported a press but could not resolve a key.
    #[error("keypad read failed")]
    InputReadFailure,
    /// No crash sprite sits under the recorded fall slot.
    #[error("no crash sprite for fall slot")]
    NotFound,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
