//! Badge buttons as the game keypad and the music transport.
//!
//! Left/Right steer the firemen, A and B answer the menu. Select and Start
//! pause and resume the music and are only ever waited on asynchronously.

use embassy_futures::select::{
    Either,
    select,
};
use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::gpio::{
    Input,
    InputConfig,
    Pull,
};

use crate::{
    ButtonResources,
    audio::Transport,
    error::{
        Error,
        Result,
    },
    hal::{
        Key,
        Keypad,
    },
};

const DEBOUNCE_MS: u64 = 20;

/// The four buttons the game polls.
///
/// A held button reports one press; it has to be released before it counts
/// again.
pub struct GameKeys {
    left: Input<'static>,
    right: Input<'static>,
    a: Input<'static>,
    b: Input<'static>,
    latched: Option<Key>,
}

/// Select pauses the music, Start resumes it.
pub struct TransportKeys {
    start: Input<'static>,
    select: Input<'static>,
}

/// Configure the button pins and split them between the game and the music.
pub fn keys(res: ButtonResources<'static>) -> (GameKeys, TransportKeys) {
    let pull_up = InputConfig::default().with_pull(Pull::Up);
    let game = GameKeys {
        left: Input::new(res.left, pull_up),
        right: Input::new(res.right, pull_up),
        a: Input::new(res.a, pull_up),
        b: Input::new(res.b, pull_up),
        latched: None,
    };
    let transport = TransportKeys {
        start: Input::new(res.start, pull_up),
        select: Input::new(res.select, InputConfig::default().with_pull(Pull::Down)),
    };
    (game, transport)
}

impl GameKeys {
    fn scan(&self) -> Option<Key> {
        if self.left.is_low() {
            Some(Key::Left)
        } else if self.right.is_low() {
            Some(Key::Right)
        } else if self.a.is_low() {
            Some(Key::Play)
        } else if self.b.is_low() {
            Some(Key::Quit)
        } else {
            None
        }
    }
}

impl Keypad for GameKeys {
    fn is_pressed(&mut self) -> bool {
        let down = self.scan();
        if down.is_none() {
            self.latched = None;
        }
        down.is_some() && down != self.latched
    }

    fn read_code(&mut self) -> Result<Key> {
        let key = self.scan().ok_or(Error::InputReadFailure)?;
        self.latched = Some(key);
        trace!("key {:?}", key);
        Ok(key)
    }
}

impl TransportKeys {
    /// Wait for the next debounced press on either transport button.
    pub async fn next(&mut self) -> Transport {
        match select(debounce_rise(&mut self.select), debounce_press(&mut self.start)).await {
            Either::First(()) => Transport::Pause,
            Either::Second(()) => Transport::Resume,
        }
    }
}

/// Wait for a debounced falling edge (active low).
async fn debounce_press(button: &mut Input<'_>) {
    loop {
        button.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        if button.is_low() {
            return;
        }
    }
}

/// Select is pulled down and reads high while pressed.
async fn debounce_rise(button: &mut Input<'_>) {
    loop {
        button.wait_for_rising_edge().await;
        Timer::after(Duration::from_millis(DEBOUNCE_MS)).await;
        if button.is_high() {
            return;
        }
    }
}
