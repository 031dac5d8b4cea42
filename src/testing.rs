//! Fakes for the hardware contracts, shared by the unit tests.

use std::{
    collections::VecDeque,
    string::{
        String,
        ToString,
    },
    vec::Vec,
};

use embedded_graphics::{
    prelude::Point,
    primitives::Rectangle,
};
use embedded_hal::delay::DelayNs;

use crate::{
    error::{
        Error,
        Result,
    },
    game::Devices,
    hal::{
        Key,
        Keypad,
        Screen,
        TickTimer,
    },
    sprite::Art,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Sprite(Art, Rectangle),
    Clear(Rectangle),
    Background(Art),
    Text(Point, String),
    Integer(Point, u16),
}

/// Screen that remembers every call.
#[derive(Default)]
pub struct RecordingScreen {
    pub ops: Vec<Op>,
}

impl Screen for RecordingScreen {
    fn draw_sprite(&mut self, art: Art, area: Rectangle) {
        self.ops.push(Op::Sprite(art, area));
    }

    fn clear_region(&mut self, area: Rectangle) {
        self.ops.push(Op::Clear(area));
    }

    fn draw_background(&mut self, art: Art) {
        self.ops.push(Op::Background(art));
    }

    fn draw_text(&mut self, at: Point, text: &str) {
        self.ops.push(Op::Text(at, text.to_string()));
    }

    fn draw_integer(&mut self, at: Point, value: u16) {
        self.ops.push(Op::Integer(at, value));
    }
}

/// Keypad that plays back a fixed list of reads; idle once it runs out.
#[derive(Default)]
pub struct ScriptedKeypad {
    pub reads: VecDeque<Result<Key>>,
}

impl ScriptedKeypad {
    pub fn press(&mut self, key: Key) {
        self.reads.push_back(Ok(key));
    }

    pub fn fail(&mut self) {
        self.reads.push_back(Err(Error::InputReadFailure));
    }
}

impl Keypad for ScriptedKeypad {
    fn is_pressed(&mut self) -> bool {
        !self.reads.is_empty()
    }

    fn read_code(&mut self) -> Result<Key> {
        self.reads.pop_front().unwrap_or(Err(Error::InputReadFailure))
    }
}

/// Delay that only records what was asked of it.
#[derive(Default)]
pub struct FakeDelay {
    pub waits_ms: Vec<u32>,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits_ms.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
    }
}

#[derive(Debug, Default)]
pub struct FakeTimer {
    pub rate_hz: Option<u32>,
    pub acks: u32,
}

impl TickTimer for FakeTimer {
    fn install(&mut self, rate_hz: u32) {
        self.rate_hz = Some(rate_hz);
    }

    fn uninstall(&mut self) {
        self.rate_hz = None;
    }

    fn acknowledge(&mut self) {
        self.acks += 1;
    }
}

pub type FakeDevices = Devices<RecordingScreen, ScriptedKeypad, FakeDelay>;

pub fn devices() -> FakeDevices {
    Devices {
        screen: RecordingScreen::default(),
        keypad: ScriptedKeypad::default(),
        delay: FakeDelay::default(),
    }
}
