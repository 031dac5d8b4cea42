//! Whole games played through the public API with scripted hardware.

use std::collections::VecDeque;

use embassy_futures::block_on;
use embedded_graphics::{
    prelude::Point,
    primitives::Rectangle,
};
use embedded_hal::delay::DelayNs;
use firemen::{
    Error,
    Event,
    Result,
    config::{
        CRASH_HOLD_MS,
        QUEUE_LEN,
        RESCUES_TO_WIN,
    },
    event_loop,
    game::{
        Devices,
        GameContext,
        Outcome,
    },
    hal::{
        Key,
        Keypad,
        Screen,
        TickTimer,
    },
    scheduler::Scheduler,
    sprite::{
        Art,
        COUNTER_AT,
    },
    tick::TickSource,
};

#[derive(Default)]
struct Screenshots {
    texts: Vec<String>,
    counters: Vec<u16>,
    landscapes: usize,
}

impl Screen for Screenshots {
    fn draw_sprite(&mut self, _art: Art, _area: Rectangle) {}

    fn clear_region(&mut self, _area: Rectangle) {}

    fn draw_background(&mut self, art: Art) {
        if art == Art::Landscape {
            self.landscapes += 1;
        }
    }

    fn draw_text(&mut self, _at: Point, text: &str) {
        self.texts.push(text.to_owned());
    }

    fn draw_integer(&mut self, at: Point, value: u16) {
        assert_eq!(at, COUNTER_AT);
        self.counters.push(value);
    }
}

#[derive(Default)]
struct Presses(VecDeque<Key>);

impl Keypad for Presses {
    fn is_pressed(&mut self) -> bool {
        !self.0.is_empty()
    }

    fn read_code(&mut self) -> Result<Key> {
        self.0.pop_front().ok_or(Error::InputReadFailure)
    }
}

#[derive(Default)]
struct Waits(Vec<u32>);

impl DelayNs for Waits {
    fn delay_ns(&mut self, ns: u32) {
        self.0.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.push(ms);
    }
}

#[derive(Default)]
struct Timer {
    running: bool,
    acks: usize,
}

impl TickTimer for Timer {
    fn install(&mut self, _rate_hz: u32) {
        self.running = true;
    }

    fn uninstall(&mut self) {
        self.running = false;
    }

    fn acknowledge(&mut self) {
        self.acks += 1;
    }
}

type Io = Devices<Screenshots, Presses, Waits>;

fn io() -> Io {
    Devices {
        screen: Screenshots::default(),
        keypad: Presses::default(),
        delay: Waits::default(),
    }
}

#[test]
fn test_perfect_game_is_won() {
    let mut io = io();
    let mut timer = Timer::default();
    let scheduler = Scheduler::<QUEUE_LEN>::new();

    // One lap of the dummy: step the firemen right just after each
    // checkpoint so they are waiting under the next one, and wrap them back
    // to the left once the dummy lands.
    let advance = |steps: usize| {
        for _ in 0..steps {
            scheduler.post(Event::AdvanceDummy).unwrap();
        }
    };
    for _ in 0..RESCUES_TO_WIN {
        advance(3);
        scheduler.post(Event::MoveCatcher).unwrap();
        advance(6);
        scheduler.post(Event::MoveCatcher).unwrap();
        advance(6);
        advance(4);
        scheduler.post(Event::MoveCatcher).unwrap();
        io.keypad.0.extend([Key::Right; 3]);
    }

    let outcome = block_on(event_loop::play(&mut io, &scheduler, &mut timer));

    assert_eq!(outcome, Outcome::Won);
    assert!(!timer.running);
    assert!(io.keypad.0.is_empty());
    assert!(io.delay.0.is_empty());
    assert_eq!(io.screen.counters.last(), Some(&RESCUES_TO_WIN));
    assert_eq!(io.screen.texts.iter().filter(|t| *t == "YOU WIN!").count(), 1);
    assert_eq!(scheduler.queue().dropped(), 0);
}

#[test]
fn test_idle_player_loses_to_the_tick() {
    let mut io = io();
    let mut timer = Timer::default();
    let scheduler = Scheduler::<QUEUE_LEN>::new();
    let mut source = TickSource::new();
    let mut game = GameContext::new();
    game.start(&mut io);

    let mut ticks = 0;
    while game.outcome().is_none() {
        assert!(ticks < 10_000, "game never ended");
        source.service(&scheduler, &mut timer);
        ticks += 1;
        while let Some(event) = scheduler.next() {
            game.handle(event, &mut io, &scheduler);
        }
    }

    assert_eq!(game.outcome(), Some(Outcome::Lost));
    assert_eq!(game.hearts(), 0);
    assert_eq!(game.rescued(), 0);
    assert_eq!(timer.acks, ticks);
    assert_eq!(io.delay.0.iter().filter(|ms| **ms == CRASH_HOLD_MS).count(), 3);
    // Opening scene plus one repaint per fall.
    assert_eq!(io.screen.landscapes, 4);

    // Late ticks after the loss change nothing.
    for _ in 0..100 {
        source.service(&scheduler, &mut timer);
    }
    while let Some(event) = scheduler.next() {
        game.handle(event, &mut io, &scheduler);
    }
    assert_eq!(game.hearts(), 0);
    assert!(game.phase().has_lost());
}
