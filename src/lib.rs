//! # firemen
//!
//! The Firemen rescue game, driven by a tick interrupt and a deferred-work
//! queue.
//!
//! A falling dummy crosses the screen in 27 steps. Three times on the way
//! down it reaches a checkpoint, and the firemen have to be standing under
//! it with their trampoline. Nine rescues win; three misses lose.
//!
//! - **Queue**: [`queue::WorkQueue`], a fixed-capacity event FIFO the tick
//!   interrupt and the game loop both post to
//! - **Tick**: [`tick::TickSource`], which turns the base tick into the 20 Hz
//!   catcher and 2.5 Hz dummy events
//! - **Game**: [`game::GameContext`], the event handlers and game state
//! - **Loop**: [`event_loop::play`], which drains the queue and idles on
//!   [`scheduler::Scheduler`] in between
//!
//! Everything above is hardware-agnostic and talks to the board through
//! the traits in [`hal`]. The `badge` feature adds the ESP32-S3 glue.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = firemen::init();
//! let resources = firemen::split_resources!(peripherals);
//!
//! let screen = firemen::screen(resources.display, resources.backlight);
//! let (keypad, transport) = firemen::keys(resources.buttons);
//! let mut ticker = firemen::Ticker::new(resources.ticker);
//! let mut io = Devices { screen, keypad, delay: esp_hal::delay::Delay::new() };
//! let outcome = event_loop::play(&mut io, &firemen::SCHEDULER, &mut ticker).await;
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod audio;
pub mod config;
mod error;
pub mod event;
pub mod event_loop;
pub mod game;
pub mod hal;
pub mod menu;
pub mod queue;
pub mod render;
pub mod scheduler;
pub mod sprite;
pub mod tick;

#[cfg(test)]
mod testing;

#[cfg(feature = "badge")]
mod board;
#[cfg(feature = "badge")]
mod buttons;
#[cfg(feature = "badge")]
mod leds;
#[cfg(feature = "badge")]
mod timer;

#[cfg(feature = "badge")]
pub use board::*;
#[cfg(feature = "badge")]
pub use buttons::{
    GameKeys,
    TransportKeys,
    keys,
};
pub use error::{
    Error,
    Result,
};
pub use event::{
    Event,
    FallSlot,
};
#[cfg(feature = "badge")]
pub use leds::{
    BAR_COUNT,
    LED_COUNT,
    Leds,
    Soundtrack,
};
#[cfg(feature = "badge")]
#[doc(hidden)]
pub use static_cell;
#[cfg(feature = "badge")]
pub use timer::{
    SCHEDULER,
    Ticker,
};

/// StaticCell helper: allocates a value into a `static` exactly once.
#[cfg(feature = "badge")]
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: $crate::static_cell::StaticCell<$t> = $crate::static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}
