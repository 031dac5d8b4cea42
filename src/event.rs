//! Units of deferred work carried by the queue.

/// One of the three checkpoints where the dummy can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FallSlot(u8);

impl FallSlot {
    pub const COUNT: usize = 3;

    /// Slot for checkpoint `index`, if there is one.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Build a slot without the range check. Only the lookup tests use it.
    #[cfg(test)]
    pub(crate) const fn unchecked(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Game events, dispatched in the order they were queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Move the dummy one step along its path (or detect a catch/miss).
    AdvanceDummy,
    /// Poll the keypad and move the firemen.
    MoveCatcher,
    /// A dummy made it to the ambulance.
    Rescue,
    /// Take a life after a miss at the given slot.
    LoseLife(FallSlot),
    /// Show the crash at the given slot and reset the scene.
    PlayFallAnimation(FallSlot),
}
