//! The background loop that runs queued events.

use embedded_hal::delay::DelayNs;

use crate::{
    config::TICK_RATE_HZ,
    game::{
        Devices,
        GameContext,
        Outcome,
    },
    hal::{
        Keypad,
        Screen,
        TickTimer,
    },
    menu,
    scheduler::Scheduler,
};

/// Play one game from the opening scene to the end screen.
///
/// Installs the tick timer, then runs queued events one at a time until the
/// game is decided and the queue is empty, idling on the scheduler in
/// between. Draws the end screen once and stops the timer before returning.
pub async fn play<S, K, D, T, const N: usize>(
    io: &mut Devices<S, K, D>,
    scheduler: &Scheduler<N>,
    timer: &mut T,
) -> Outcome
where
    S: Screen,
    K: Keypad,
    D: DelayNs,
    T: TickTimer,
{
    let mut game = GameContext::new();
    game.start(io);
    timer.install(TICK_RATE_HZ);

    let outcome = loop {
        while let Some(event) = scheduler.next() {
            game.handle(event, io, scheduler);
        }

        if let Some(outcome) = game.outcome() {
            break outcome;
        }

        scheduler.idle().await;
    };

    menu::draw_outcome(&mut io.screen, outcome);
    timer.uninstall();

    let dropped = scheduler.queue().dropped();
    if dropped > 0 {
        warn!("{} events were dropped on a full queue", dropped);
    }
    outcome
}
