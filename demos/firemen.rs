//! Firemen rescue firmware for the badge.
//!
//! A: play, B: quit, Left/Right: move the firemen. Select pauses the music
//! (shown on the LED bars) and Start resumes it.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_futures::select::{
    Either,
    select,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    signal::Signal,
};
use embassy_time::{
    Duration,
    Timer,
};
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    timer::timg::TimerGroup,
};
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use firemen::*;
use firemen::{
    audio::Player,
    event_loop,
    game::Devices,
    menu::{
        self,
        Choice,
    },
};

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

type BadgeDevices = Devices<BadgeScreen, GameKeys, Delay>;

/// One bar of the theme as a loudness envelope.
static THEME: [i16; 16] = [
    8000, 16000, 24000, 32000, 24000, 16000, 8000, 0, 12000, 20000, 28000, 20000, 12000, 4000, 0, 0,
];

/// Raised by the game task when a game starts.
static MUSIC_ON: Signal<CriticalSectionRawMutex, ()> = Signal::new();

const MUSIC_STEP_MS: u64 = 125;
const MENU_POLL_MS: u64 = 20;

#[embassy_executor::task]
async fn music_task(player: &'static mut Player<Soundtrack<'static>>, transport: &'static mut TransportKeys) {
    MUSIC_ON.wait().await;
    player.start(&THEME);

    loop {
        let step = Timer::after(Duration::from_millis(MUSIC_STEP_MS));
        if let Either::First(press) = select(transport.next(), step).await {
            player.apply(press);
        }
        player.audio_mut().step().await;
    }
}

#[embassy_executor::task]
async fn game_task(io: &'static mut BadgeDevices, ticker: &'static mut Ticker) {
    menu::draw(&mut io.screen);
    let choice = loop {
        if let Some(choice) = menu::poll(&mut io.keypad) {
            break choice;
        }
        Timer::after(Duration::from_millis(MENU_POLL_MS)).await;
    };

    match choice {
        Choice::Quit => menu::draw_farewell(&mut io.screen),
        Choice::Play => {
            MUSIC_ON.signal(());
            let outcome = event_loop::play(io, &SCHEDULER, ticker).await;
            info!("game over: {:?}", outcome);
        }
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = firemen::init();
    let resources = split_resources!(peripherals);

    esp_alloc::heap_allocator!(size: 64 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let screen = firemen::screen(resources.display, resources.backlight);
    let (keypad, transport) = firemen::keys(resources.buttons);
    let io = mk_static!(
        BadgeDevices,
        Devices {
            screen,
            keypad,
            delay: Delay::new(),
        }
    );
    let ticker = mk_static!(Ticker, Ticker::new(resources.ticker));
    let player = mk_static!(
        Player<Soundtrack<'static>>,
        Player::new(Soundtrack::new(resources.leds.into()))
    );
    let transport = mk_static!(TransportKeys, transport);

    spawner.must_spawn(music_task(player, transport));
    spawner.must_spawn(game_task(io, ticker));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
