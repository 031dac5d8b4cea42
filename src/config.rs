//! Fixed game and timing constants.

/// Base rate of the tick interrupt (Hz).
pub const TICK_RATE_HZ: u32 = 100;

/// Ticks between two `MoveCatcher` events (20 Hz at the base rate).
pub const CATCHER_PERIOD_TICKS: u16 = 5;

/// Ticks between two `AdvanceDummy` events (2.5 Hz at the base rate).
pub const DUMMY_PERIOD_TICKS: u16 = 40;

/// Slots in the deferred-work queue. One slot stays reserved, so
/// `QUEUE_LEN - 1` events fit.
pub const QUEUE_LEN: usize = 512;

/// How long the crash graphic stays up after a miss.
pub const CRASH_HOLD_MS: u32 = 400;

/// Pause between wiping the crash scene and repainting the landscape.
pub const RESTORE_HOLD_MS: u32 = 40;

/// Lives at the start of a game.
pub const START_LIVES: u8 = 3;

/// Rescues needed to win.
pub const RESCUES_TO_WIN: u16 = 9;

/// Output level requested from the audio collaborator at game start.
pub const MUSIC_VOLUME: u8 = u8::MAX;
