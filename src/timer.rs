//! The tick interrupt on the badge.
//!
//! TIMG1's timer 0 fires at [`TICK_RATE_HZ`](crate::config::TICK_RATE_HZ)
//! and its handler runs [`TickSource::service`] against [`SCHEDULER`].

use core::cell::RefCell;

use critical_section::Mutex;
use esp_hal::{
    Blocking,
    handler,
    time::Duration,
    timer::{
        PeriodicTimer,
        timg::TimerGroup,
    },
};

use crate::{
    TickerResources,
    config::QUEUE_LEN,
    hal::TickTimer,
    scheduler::Scheduler,
    tick::TickSource,
};

/// The queue the tick interrupt and the game loop share.
pub static SCHEDULER: Scheduler<QUEUE_LEN> = Scheduler::new();

static SOURCE: Mutex<RefCell<TickSource>> = Mutex::new(RefCell::new(TickSource::new()));
static TIMER: Mutex<RefCell<Option<PeriodicTimer<'static, Blocking>>>> = Mutex::new(RefCell::new(None));

#[handler]
fn on_tick() {
    critical_section::with(|cs| {
        SOURCE
            .borrow_ref_mut(cs)
            .service(&SCHEDULER, &mut Ticker { _owned: () });
    });
}

/// Handle on the tick timer. Only one exists, created from
/// [`TickerResources`].
pub struct Ticker {
    _owned: (),
}

impl Ticker {
    pub fn new(res: TickerResources<'static>) -> Self {
        let timg = TimerGroup::new(res.timg);
        let mut timer = PeriodicTimer::new(timg.timer0);
        timer.set_interrupt_handler(on_tick);
        critical_section::with(|cs| TIMER.borrow_ref_mut(cs).replace(timer));
        Self { _owned: () }
    }

    fn with_timer(f: impl FnOnce(&mut PeriodicTimer<'static, Blocking>)) {
        critical_section::with(|cs| {
            if let Some(timer) = TIMER.borrow_ref_mut(cs).as_mut() {
                f(timer);
            }
        });
    }
}

impl TickTimer for Ticker {
    fn install(&mut self, rate_hz: u32) {
        let period = Duration::from_micros(1_000_000 / u64::from(rate_hz));
        Self::with_timer(|timer| {
            timer.listen();
            if let Err(err) = timer.start(period) {
                error!("tick timer failed to start: {:?}", err);
            }
        });
        info!("tick timer running at {} Hz", rate_hz);
    }

    fn uninstall(&mut self) {
        Self::with_timer(|timer| {
            timer.unlisten();
            if let Err(err) = timer.cancel() {
                warn!("tick timer failed to stop: {:?}", err);
            }
        });
        info!("tick timer stopped");
    }

    fn acknowledge(&mut self) {
        Self::with_timer(PeriodicTimer::clear_interrupt);
    }
}
