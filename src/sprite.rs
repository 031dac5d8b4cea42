//! Fixed sprite geometry for the 320×170 screen.
//!
//! Each sprite has one size and a table of places it can be drawn. The dummy
//! bounces along 19 places from the burning building to the ambulance; at
//! three of them (the checkpoints) it lands on the firemen's trampoline.

use embedded_graphics::{
    prelude::{
        Point,
        Size,
    },
    primitives::Rectangle,
};

use crate::{
    error::{
        Error,
        Result,
    },
    event::FallSlot,
    hal::Screen,
};

/// Which way the tumbling dummy is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pose {
    Up,
    Right,
    Down,
    Left,
}

/// Every graphic the game draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Art {
    Landscape,
    Firemen,
    Crash,
    Dummy(Pose),
    Life,
}

/// One place a sprite can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plot {
    pub at: Point,
    pub art: Art,
}

const fn plot(x: i32, y: i32, art: Art) -> Plot {
    Plot {
        at: Point::new(x, y),
        art,
    }
}

/// A graphic of fixed size together with the places it may appear.
#[derive(Debug)]
pub struct Sprite {
    pub size: Size,
    pub plots: &'static [Plot],
}

impl Sprite {
    pub const fn len(&self) -> usize {
        self.plots.len()
    }

    /// Screen area covered at place `pos`.
    pub fn area(&self, pos: usize) -> Rectangle {
        Rectangle::new(self.plots[pos].at, self.size)
    }

    pub fn plot(&self, screen: &mut impl Screen, pos: usize) {
        screen.draw_sprite(self.plots[pos].art, self.area(pos));
    }

    pub fn clear(&self, screen: &mut impl Screen, pos: usize) {
        screen.clear_region(self.area(pos));
    }
}

pub const FIREMEN: Sprite = Sprite {
    size: Size::new(64, 32),
    plots: &[
        plot(32, 112, Art::Firemen),
        plot(128, 112, Art::Firemen),
        plot(224, 112, Art::Firemen),
    ],
};

pub const DUMMY: Sprite = Sprite {
    size: Size::new(32, 32),
    plots: &[
        plot(0, 24, Art::Dummy(Pose::Up)),
        plot(16, 48, Art::Dummy(Pose::Right)),
        plot(32, 72, Art::Dummy(Pose::Down)),
        plot(48, 96, Art::Dummy(Pose::Left)),
        plot(64, 72, Art::Dummy(Pose::Up)),
        plot(80, 48, Art::Dummy(Pose::Right)),
        plot(96, 24, Art::Dummy(Pose::Down)),
        plot(112, 48, Art::Dummy(Pose::Left)),
        plot(128, 72, Art::Dummy(Pose::Up)),
        plot(144, 96, Art::Dummy(Pose::Right)),
        plot(160, 72, Art::Dummy(Pose::Down)),
        plot(176, 48, Art::Dummy(Pose::Left)),
        plot(192, 24, Art::Dummy(Pose::Up)),
        plot(208, 48, Art::Dummy(Pose::Right)),
        plot(224, 72, Art::Dummy(Pose::Down)),
        plot(240, 96, Art::Dummy(Pose::Left)),
        plot(256, 72, Art::Dummy(Pose::Up)),
        plot(272, 48, Art::Dummy(Pose::Right)),
        plot(288, 24, Art::Dummy(Pose::Down)),
    ],
};

pub const CRASH: Sprite = Sprite {
    size: Size::new(64, 24),
    plots: &[
        plot(32, 144, Art::Crash),
        plot(128, 144, Art::Crash),
        plot(224, 144, Art::Crash),
    ],
};

pub const LIFE: Sprite = Sprite {
    size: Size::new(16, 16),
    plots: &[
        plot(8, 4, Art::Life),
        plot(24, 4, Art::Life),
        plot(40, 4, Art::Life),
    ],
};

/// Dummy places where the firemen have to be underneath. Checkpoint `i` is
/// caught by firemen place `i`.
pub const CHECKPOINTS: [usize; FallSlot::COUNT] = [2, 8, 14];

/// Where the rescue counter is printed.
pub const COUNTER_AT: Point = Point::new(287, 4);

/// The fall slot guarded by dummy place `pos`, if it is a checkpoint.
pub fn checkpoint_at(pos: usize) -> Option<FallSlot> {
    CHECKPOINTS
        .iter()
        .position(|&checkpoint| checkpoint == pos)
        .and_then(|i| FallSlot::new(i as u8))
}

/// Index of the crash plot lying under the checkpoint of `slot`.
pub fn crash_for(slot: FallSlot) -> Result<usize> {
    let checkpoint = CHECKPOINTS.get(slot.index()).ok_or(Error::NotFound)?;
    let x = DUMMY.plots[*checkpoint].at.x;
    CRASH
        .plots
        .iter()
        .position(|crash| crash.at.x == x)
        .ok_or(Error::NotFound)
}
