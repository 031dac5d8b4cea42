//! Contracts the game core expects from the hardware.
//!
//! The blocking delay primitive is `embedded_hal::delay::DelayNs`.

use embedded_graphics::{
    prelude::Point,
    primitives::Rectangle,
};

use crate::{
    error::Result,
    sprite::Art,
};

/// Something the game can paint on.
pub trait Screen {
    /// Paint `art` into `area`.
    fn draw_sprite(&mut self, art: Art, area: Rectangle);

    /// Wipe `area` back to the empty backdrop colour.
    fn clear_region(&mut self, area: Rectangle);

    /// Paint `art` over the whole screen.
    fn draw_background(&mut self, art: Art);

    fn draw_text(&mut self, at: Point, text: &str);

    fn draw_integer(&mut self, at: Point, value: u16);
}

/// Keys the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Start a game from the menu.
    Play,
    /// Leave from the menu.
    Quit,
    Left,
    Right,
    /// Any key the game does not use.
    Other,
}

/// Polled, non-blocking key input.
pub trait Keypad {
    /// Whether a key is currently held.
    fn is_pressed(&mut self) -> bool;

    /// The held key, or [`Error::InputReadFailure`](crate::Error::InputReadFailure)
    /// when the scan could not resolve one.
    fn read_code(&mut self) -> Result<Key>;
}

/// Background music player. Fire-and-forget; playback state lives in the
/// implementation.
pub trait Audio {
    fn set_volume(&mut self, level: u8);

    /// Start playing `track` in a loop.
    fn play_loop(&mut self, track: &'static [i16]);

    fn pause(&mut self);

    fn resume(&mut self);
}

/// The periodic interrupt source behind the tick events.
pub trait TickTimer {
    /// Start firing the tick interrupt at `rate_hz`.
    fn install(&mut self, rate_hz: u32);

    /// Stop the tick interrupt.
    fn uninstall(&mut self);

    /// Clear the interrupt-pending condition. Called once per tick, from the
    /// interrupt handler.
    fn acknowledge(&mut self);
}
