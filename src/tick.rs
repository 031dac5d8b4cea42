//! Periodic event source driven by the tick interrupt.
//!
//! Every tick counts down two independent dividers. When one runs out it is
//! reloaded and its event is posted. Nothing else happens in interrupt
//! context.

use crate::{
    config::{
        CATCHER_PERIOD_TICKS,
        DUMMY_PERIOD_TICKS,
    },
    event::Event,
    hal::TickTimer,
    scheduler::Scheduler,
};

#[derive(Debug)]
struct Countdown {
    period: u16,
    remaining: u16,
}

impl Countdown {
    const fn new(period: u16) -> Self {
        Self {
            period,
            remaining: period,
        }
    }

    /// Count one tick; true when the period has elapsed.
    fn tick(&mut self) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }
}

/// Tick dividers for the catcher (20 Hz) and dummy (2.5 Hz) streams.
#[derive(Debug)]
pub struct TickSource {
    catcher: Countdown,
    dummy: Countdown,
}

impl TickSource {
    pub const fn new() -> Self {
        Self::with_periods(CATCHER_PERIOD_TICKS, DUMMY_PERIOD_TICKS)
    }

    pub const fn with_periods(catcher: u16, dummy: u16) -> Self {
        assert!(catcher > 0 && dummy > 0);
        Self {
            catcher: Countdown::new(catcher),
            dummy: Countdown::new(dummy),
        }
    }

    /// Body of the tick interrupt handler.
    ///
    /// Posts whatever is due (`MoveCatcher` before `AdvanceDummy`) and then
    /// acknowledges the interrupt, whether or not anything was posted.
    pub fn service<const N: usize>(&mut self, scheduler: &Scheduler<N>, timer: &mut impl TickTimer) {
        if self.catcher.tick() {
            post(scheduler, Event::MoveCatcher);
        }
        if self.dummy.tick() {
            post(scheduler, Event::AdvanceDummy);
        }
        timer.acknowledge();
    }
}

impl Default for TickSource {
    fn default() -> Self {
        Self::new()
    }
}

fn post<const N: usize>(scheduler: &Scheduler<N>, event: Event) {
    if let Err(err) = scheduler.post(event) {
        warn!("tick dropped {:?}: {:?}", event, err);
    }
}
