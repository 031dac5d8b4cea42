//! WS2812 LED bars, used as the game's music output.
//!
//! The badge has no speaker. [`Soundtrack`] plays a track as a level meter
//! on the two LED bars instead: each step lights as many LEDs as the
//! current sample is loud.

extern crate alloc;

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::{
    Blocking,
    gpio::{
        Level,
        Output,
        OutputConfig,
    },
    rmt::{
        PulseCode,
        Rmt,
        Tx,
        TxChannelConfig,
        TxChannelCreator as _,
    },
    time::Rate,
};
use palette::Srgb;

use crate::{
    LedResources,
    hal::Audio,
};

/// Two bars of five. Hardware index 0 is bottom right, 4 top right, 5 top
/// left and 9 bottom left.
pub const LED_COUNT: usize = 10;

/// LEDs per bar.
pub const BAR_COUNT: usize = 5;

const OFF: Srgb<u8> = Srgb::new(0, 0, 0);

/// WS2812 strip behind an RMT channel, flushed with [`update`](Leds::update).
pub struct Leds<'a> {
    channel: Option<esp_hal::rmt::Channel<'a, Blocking, Tx>>,
    framebuffer: [Srgb<u8>; LED_COUNT],
}

impl<'a> From<LedResources<'a>> for Leds<'a> {
    fn from(res: LedResources<'a>) -> Self {
        // The strip's power switch has to stay on for as long as the LEDs do.
        core::mem::forget(Output::new(res.power, Level::High, OutputConfig::default()));
        let rmt = Rmt::new(res.rmt, Rate::from_mhz(40)).unwrap();
        let tx_config = TxChannelConfig::default().with_clk_divider(1);
        Leds::new(rmt.channel0.configure_tx(res.io, tx_config).unwrap())
    }
}

impl<'a> Leds<'a> {
    pub const fn new(channel: esp_hal::rmt::Channel<'a, Blocking, Tx>) -> Self {
        Self {
            channel: Some(channel),
            framebuffer: [OFF; LED_COUNT],
        }
    }

    /// Flush the framebuffer to the strip.
    pub async fn update(&mut self) {
        let Some(channel) = self.channel.take() else {
            error!("RMT channel lost during previous transmission");
            return;
        };

        let pulses = self
            .framebuffer
            .iter()
            .flat_map(|c| {
                // WS2812 wants GRB
                [byte_to_pulses(c.green), byte_to_pulses(c.red), byte_to_pulses(c.blue)]
                    .into_iter()
                    .flatten()
            })
            .chain(core::iter::once(PulseCode::end_marker()))
            .collect::<alloc::vec::Vec<_>>();

        let transaction = match channel.transmit(&pulses) {
            Ok(t) => t,
            Err(e) => {
                error!("RMT transmit failed: {}", e);
                return;
            }
        };

        self.channel = Some(match transaction.wait() {
            Ok(ch) => ch,
            Err((err, ch)) => {
                error!("RMT transaction failed: {}", err);
                ch
            }
        });

        // WS2812 reset time
        Timer::after(Duration::from_micros(50)).await;
    }

    pub fn clear(&mut self) {
        self.framebuffer.fill(OFF);
    }

    /// Light both bars the same way, bottom LED first.
    pub fn set_both_bars(&mut self, colors: &[Srgb<u8>; BAR_COUNT]) {
        self.framebuffer[..BAR_COUNT].copy_from_slice(colors);
        for i in 0..BAR_COUNT {
            self.framebuffer[BAR_COUNT + i] = colors[BAR_COUNT - 1 - i];
        }
    }
}

/// WS2812 bit timing at a 40 MHz RMT clock.
const fn bit_to_pulse(bit: bool) -> PulseCode {
    if bit {
        // '1': 0.8 µs high, 0.45 µs low
        PulseCode::new(Level::High, 32, Level::Low, 18)
    } else {
        // '0': 0.4 µs high, 0.85 µs low
        PulseCode::new(Level::High, 16, Level::Low, 34)
    }
}

fn byte_to_pulses(byte: u8) -> [PulseCode; 8] {
    let mut pulses = [PulseCode::default(); 8];
    for (i, pulse) in pulses.iter_mut().enumerate() {
        *pulse = bit_to_pulse((byte >> (7 - i)) & 1 != 0);
    }
    pulses
}

/// Music as a level meter on the LED bars.
///
/// The [`Audio`] calls only change state; [`step`](Soundtrack::step) moves
/// to the next sample and repaints.
pub struct Soundtrack<'a> {
    leds: Leds<'a>,
    track: &'static [i16],
    cursor: usize,
    volume: u8,
    playing: bool,
}

impl<'a> Soundtrack<'a> {
    pub const fn new(leds: Leds<'a>) -> Self {
        Self {
            leds,
            track: &[],
            cursor: 0,
            volume: 0,
            playing: false,
        }
    }

    /// Show the next sample, or blank the bars while paused.
    pub async fn step(&mut self) {
        match self.track.get(self.cursor) {
            Some(&sample) if self.playing => {
                self.cursor = (self.cursor + 1) % self.track.len();
                let lit = usize::from(sample.unsigned_abs()) * BAR_COUNT / usize::from(i16::MAX.unsigned_abs());
                let color = Srgb::new(self.volume / 4, self.volume / 8, 0);
                let mut bar = [OFF; BAR_COUNT];
                bar[..lit.min(BAR_COUNT)].fill(color);
                self.leds.set_both_bars(&bar);
            }
            _ => self.leds.clear(),
        }
        self.leds.update().await;
    }
}

impl Audio for Soundtrack<'_> {
    fn set_volume(&mut self, level: u8) {
        self.volume = level;
    }

    fn play_loop(&mut self, track: &'static [i16]) {
        self.track = track;
        self.cursor = 0;
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) {
        self.playing = true;
    }
}
