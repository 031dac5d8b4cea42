//! Game state and the event handlers that drive it.
//!
//! All state lives in [`GameContext`] and only changes inside
//! [`GameContext::handle`], which the game loop calls for each queued event.
//! Handlers may queue follow-up events through the [`Scheduler`].

use embedded_hal::delay::DelayNs;

use crate::{
    config::{
        CRASH_HOLD_MS,
        RESCUES_TO_WIN,
        RESTORE_HOLD_MS,
        START_LIVES,
    },
    event::{
        Event,
        FallSlot,
    },
    hal::{
        Key,
        Keypad,
        Screen,
    },
    scheduler::Scheduler,
    sprite::{
        self,
        Art,
        COUNTER_AT,
        CRASH,
        DUMMY,
        FIREMEN,
        LIFE,
    },
};

/// Where a playthrough stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Idle,
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn has_won(self) -> bool {
        matches!(self, Self::Won)
    }

    pub const fn has_lost(self) -> bool {
        matches!(self, Self::Lost)
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Won,
    Lost,
}

/// The hardware a handler gets to use.
pub struct Devices<S, K, D> {
    pub screen: S,
    pub keypad: K,
    pub delay: D,
}

/// Everything that changes during one playthrough.
#[derive(Debug)]
pub struct GameContext {
    /// Place of the dummy on its path.
    dummy: usize,
    /// Place of the firemen (0 = left).
    catcher: usize,
    hearts: u8,
    rescued: u16,
    phase: Phase,
    /// Set by the first catcher move, which only reports readiness.
    catcher_ready: bool,
}

impl GameContext {
    pub const fn new() -> Self {
        Self {
            dummy: 0,
            catcher: 0,
            hearts: START_LIVES,
            rescued: 0,
            phase: Phase::Idle,
            catcher_ready: false,
        }
    }

    /// Paint the opening scene and enter [`Phase::Playing`].
    pub fn start<S, K, D>(&mut self, io: &mut Devices<S, K, D>)
    where
        S: Screen,
        K: Keypad,
    {
        *self = Self::new();

        io.screen.draw_background(Art::Landscape);
        FIREMEN.plot(&mut io.screen, self.catcher);
        self.draw_lives(&mut io.screen);
        DUMMY.plot(&mut io.screen, self.dummy);
        self.draw_counter(&mut io.screen);
        self.move_catcher(io);

        self.phase = Phase::Playing;
        info!("game started with {} lives", self.hearts);
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Won => Some(Outcome::Won),
            Phase::Lost => Some(Outcome::Lost),
            Phase::Idle | Phase::Playing => None,
        }
    }

    pub const fn hearts(&self) -> u8 {
        self.hearts
    }

    pub const fn rescued(&self) -> u16 {
        self.rescued
    }

    pub const fn dummy(&self) -> usize {
        self.dummy
    }

    pub const fn catcher(&self) -> usize {
        self.catcher
    }

    /// Run the handler for `event` to completion.
    ///
    /// Events arriving outside [`Phase::Playing`] are dropped, so nothing
    /// changes once the game is decided.
    pub fn handle<S, K, D, const N: usize>(
        &mut self,
        event: Event,
        io: &mut Devices<S, K, D>,
        scheduler: &Scheduler<N>,
    ) where
        S: Screen,
        K: Keypad,
        D: DelayNs,
    {
        if self.phase != Phase::Playing {
            trace!("ignoring {:?} in {:?}", event, self.phase);
            return;
        }

        match event {
            Event::AdvanceDummy => self.advance_dummy(&mut io.screen, scheduler),
            Event::MoveCatcher => self.move_catcher(io),
            Event::Rescue => self.rescue(&mut io.screen),
            Event::LoseLife(slot) => self.lose_life(&mut io.screen, slot),
            Event::PlayFallAnimation(slot) => self.play_fall_animation(io, slot),
        }
    }

    fn advance_dummy<const N: usize>(&mut self, screen: &mut impl Screen, scheduler: &Scheduler<N>) {
        DUMMY.clear(screen, self.dummy);

        if self.dummy == DUMMY.len() - 1 {
            self.dummy = 0;
            chain(scheduler, Event::Rescue);
        } else if let Some(slot) =
            sprite::checkpoint_at(self.dummy).filter(|slot| slot.index() != self.catcher)
        {
            debug!("dummy missed at slot {}", slot.index());
            self.dummy = 0;
            chain(scheduler, Event::PlayFallAnimation(slot));
            chain(scheduler, Event::LoseLife(slot));
        } else {
            self.dummy += 1;
        }

        DUMMY.plot(screen, self.dummy);
    }

    /// Left stops at the first place; right wraps from the last place back
    /// to the first.
    fn move_catcher<S, K, D>(&mut self, io: &mut Devices<S, K, D>)
    where
        S: Screen,
        K: Keypad,
    {
        if !self.catcher_ready {
            self.catcher_ready = true;
            info!("catcher ready");
            return;
        }

        if !io.keypad.is_pressed() {
            return;
        }

        let next = match io.keypad.read_code() {
            Ok(Key::Left) => self.catcher.saturating_sub(1),
            Ok(Key::Right) if self.catcher + 1 >= FIREMEN.len() => 0,
            Ok(Key::Right) => self.catcher + 1,
            Ok(_) => return,
            Err(err) => {
                debug!("skipping catcher move: {:?}", err);
                return;
            }
        };

        FIREMEN.clear(&mut io.screen, self.catcher);
        self.catcher = next;
        FIREMEN.plot(&mut io.screen, self.catcher);
    }

    fn rescue(&mut self, screen: &mut impl Screen) {
        self.rescued += 1;
        self.draw_counter(screen);
        info!("rescued {} of {}", self.rescued, RESCUES_TO_WIN);

        if self.rescued >= RESCUES_TO_WIN && self.hearts > 0 {
            self.phase = Phase::Won;
        }
    }

    fn lose_life(&mut self, screen: &mut impl Screen, slot: FallSlot) {
        debug_assert!(self.hearts > 0);
        self.hearts = self.hearts.saturating_sub(1);
        self.draw_lives(screen);
        info!("lost a life, {} left", self.hearts);

        if self.hearts > 0 {
            return;
        }

        DUMMY.clear(screen, self.dummy);
        match sprite::crash_for(slot) {
            Ok(crash) => CRASH.clear(screen, crash),
            Err(err) => warn!("crash sprite for slot {}: {:?}", slot.index(), err),
        }
        self.phase = Phase::Lost;
    }

    /// Blocks for the crash hold; consumer context only.
    fn play_fall_animation<S, K, D>(&mut self, io: &mut Devices<S, K, D>, slot: FallSlot)
    where
        S: Screen,
        D: DelayNs,
    {
        let crash = match sprite::crash_for(slot) {
            Ok(crash) => Some(crash),
            Err(err) => {
                warn!("crash sprite for slot {}: {:?}", slot.index(), err);
                None
            }
        };

        if let Some(crash) = crash {
            CRASH.plot(&mut io.screen, crash);
        }
        io.delay.delay_ms(CRASH_HOLD_MS);

        FIREMEN.clear(&mut io.screen, self.catcher);
        DUMMY.clear(&mut io.screen, self.dummy);
        if let Some(crash) = crash {
            CRASH.clear(&mut io.screen, crash);
        }
        io.delay.delay_ms(RESTORE_HOLD_MS);

        io.screen.draw_background(Art::Landscape);
        self.dummy = 0;
        self.catcher = 0;
        self.draw_lives(&mut io.screen);
        DUMMY.plot(&mut io.screen, self.dummy);
        FIREMEN.plot(&mut io.screen, self.catcher);
        self.draw_counter(&mut io.screen);
    }

    fn draw_lives(&self, screen: &mut impl Screen) {
        for pos in 0..LIFE.len() {
            LIFE.clear(screen, pos);
        }
        for pos in 0..usize::from(self.hearts).min(LIFE.len()) {
            LIFE.plot(screen, pos);
        }
    }

    fn draw_counter(&self, screen: &mut impl Screen) {
        screen.draw_integer(COUNTER_AT, self.rescued);
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new()
    }
}

fn chain<const N: usize>(scheduler: &Scheduler<N>, event: Event) {
    if let Err(err) = scheduler.post(event) {
        error!("could not chain {:?}: {:?}", event, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        self,
        FakeDevices,
        Op,
    };

    type TestScheduler = Scheduler<64>;

    fn started() -> (GameContext, FakeDevices, TestScheduler) {
        let mut io = testing::devices();
        let mut game = GameContext::new();
        game.start(&mut io);
        io.screen.ops.clear();
        (game, io, TestScheduler::new())
    }

    /// Dispatch until the queue is empty, returning what was handled.
    fn pump(game: &mut GameContext, io: &mut FakeDevices, scheduler: &TestScheduler) -> Vec<Event> {
        let mut handled = Vec::new();
        while let Some(event) = scheduler.next() {
            handled.push(event);
            game.handle(event, io, scheduler);
        }
        handled
    }

    fn advance(game: &mut GameContext, io: &mut FakeDevices, scheduler: &TestScheduler) {
        scheduler.post(Event::AdvanceDummy).unwrap();
        pump(game, io, scheduler);
    }

    /// Walk one dummy through its whole path with the firemen in place.
    fn rescue_one(game: &mut GameContext, io: &mut FakeDevices, scheduler: &TestScheduler) {
        for _ in 0..DUMMY.len() {
            if let Some(slot) = sprite::checkpoint_at(game.dummy) {
                game.catcher = slot.index();
            }
            advance(game, io, scheduler);
        }
    }

    /// Drop one dummy at the first checkpoint.
    fn miss_one(game: &mut GameContext, io: &mut FakeDevices, scheduler: &TestScheduler) {
        game.catcher = 1;
        for _ in 0..3 {
            advance(game, io, scheduler);
        }
    }

    #[test]
    fn test_start_paints_opening_scene() {
        let mut io = testing::devices();
        let mut game = GameContext::new();
        assert_eq!(game.phase(), Phase::Idle);

        game.start(&mut io);

        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.hearts(), 3);
        assert_eq!(game.rescued(), 0);
        let ops = &io.screen.ops;
        assert_eq!(ops[0], Op::Background(Art::Landscape));
        assert!(ops.contains(&Op::Sprite(Art::Firemen, FIREMEN.area(0))));
        assert!(ops.contains(&Op::Sprite(Art::Life, LIFE.area(2))));
        assert!(ops.contains(&Op::Integer(COUNTER_AT, 0)));
    }

    #[test]
    fn test_first_catcher_move_only_reports_ready() {
        let mut io = testing::devices();
        io.keypad.press(Key::Right);
        let mut game = GameContext::new();
        let scheduler = TestScheduler::new();

        game.start(&mut io);
        assert_eq!(game.catcher(), 0);
        assert_eq!(io.keypad.reads.len(), 1);

        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        assert_eq!(game.catcher(), 1);
    }

    #[test]
    fn test_catcher_clamps_left_and_wraps_right() {
        let (mut game, mut io, scheduler) = started();

        io.keypad.press(Key::Left);
        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        assert_eq!(game.catcher(), 0);

        for expected in [1, 2, 0] {
            io.keypad.press(Key::Right);
            game.handle(Event::MoveCatcher, &mut io, &scheduler);
            assert_eq!(game.catcher(), expected);
        }

        io.keypad.press(Key::Right);
        io.keypad.press(Key::Left);
        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        assert_eq!(game.catcher(), 0);
    }

    #[test]
    fn test_catcher_skips_failed_and_unknown_reads() {
        let (mut game, mut io, scheduler) = started();

        io.keypad.fail();
        io.keypad.press(Key::Play);
        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        assert_eq!(game.catcher(), 0);
        assert!(io.screen.ops.is_empty());

        game.handle(Event::MoveCatcher, &mut io, &scheduler);
        assert!(io.screen.ops.is_empty());
    }

    #[test]
    fn test_dummy_advances_and_redraws() {
        let (mut game, mut io, scheduler) = started();

        advance(&mut game, &mut io, &scheduler);

        assert_eq!(game.dummy(), 1);
        assert_eq!(
            io.screen.ops,
            [
                Op::Clear(DUMMY.area(0)),
                Op::Sprite(DUMMY.plots[1].art, DUMMY.area(1)),
            ]
        );
    }

    #[test]
    fn test_catch_at_checkpoint_keeps_going() {
        let (mut game, mut io, scheduler) = started();

        for _ in 0..3 {
            advance(&mut game, &mut io, &scheduler);
        }
        assert_eq!(game.dummy(), 3);
        assert_eq!(game.hearts(), 3);
    }

    #[test]
    fn test_miss_at_first_checkpoint() {
        let (mut game, mut io, scheduler) = started();
        game.catcher = 2;

        advance(&mut game, &mut io, &scheduler);
        advance(&mut game, &mut io, &scheduler);
        assert_eq!(game.dummy(), 2);

        scheduler.post(Event::AdvanceDummy).unwrap();
        let handled = pump(&mut game, &mut io, &scheduler);
        let slot = FallSlot::new(0).unwrap();
        assert_eq!(
            handled,
            [
                Event::AdvanceDummy,
                Event::PlayFallAnimation(slot),
                Event::LoseLife(slot),
            ]
        );

        assert_eq!(game.hearts(), 2);
        assert_eq!(game.dummy(), 0);
        assert_eq!(game.catcher(), 0);
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(io.delay.waits_ms, [CRASH_HOLD_MS, RESTORE_HOLD_MS]);
        assert!(io.screen.ops.contains(&Op::Sprite(Art::Crash, CRASH.area(0))));
    }

    #[test]
    fn test_fall_animation_resets_scene() {
        let (mut game, mut io, scheduler) = started();
        game.catcher = 2;
        game.dummy = 5;

        let slot = FallSlot::new(1).unwrap();
        game.handle(Event::PlayFallAnimation(slot), &mut io, &scheduler);

        assert_eq!(game.dummy(), 0);
        assert_eq!(game.catcher(), 0);
        let ops = &io.screen.ops;
        assert_eq!(ops[0], Op::Sprite(Art::Crash, CRASH.area(1)));
        assert!(ops.contains(&Op::Clear(FIREMEN.area(2))));
        assert!(ops.contains(&Op::Clear(DUMMY.area(5))));
        assert!(ops.contains(&Op::Clear(CRASH.area(1))));
        assert!(ops.contains(&Op::Background(Art::Landscape)));
        assert_eq!(ops.last(), Some(&Op::Integer(COUNTER_AT, 0)));
        assert!(scheduler.queue().is_empty());
    }

    #[test]
    fn test_nine_rescues_win() {
        let (mut game, mut io, scheduler) = started();

        for round in 1..=9 {
            rescue_one(&mut game, &mut io, &scheduler);
            assert_eq!(game.rescued(), round);
        }

        assert_eq!(game.phase(), Phase::Won);
        assert!(game.phase().has_won());
        assert!(!game.phase().has_lost());
        assert_eq!(game.outcome(), Some(Outcome::Won));
        assert_eq!(game.hearts(), 3);
        assert!(io.screen.ops.contains(&Op::Integer(COUNTER_AT, 9)));
    }

    #[test]
    fn test_nothing_changes_after_win() {
        let (mut game, mut io, scheduler) = started();
        for _ in 0..9 {
            rescue_one(&mut game, &mut io, &scheduler);
        }
        io.screen.ops.clear();
        let dummy = game.dummy();

        io.keypad.press(Key::Right);
        for event in [
            Event::AdvanceDummy,
            Event::MoveCatcher,
            Event::Rescue,
            Event::LoseLife(FallSlot::new(0).unwrap()),
        ] {
            game.handle(event, &mut io, &scheduler);
        }

        assert_eq!(game.phase(), Phase::Won);
        assert_eq!(game.rescued(), 9);
        assert_eq!(game.hearts(), 3);
        assert_eq!(game.dummy(), dummy);
        assert!(io.screen.ops.is_empty());
        assert!(scheduler.queue().is_empty());
    }

    #[test]
    fn test_three_misses_lose() {
        let (mut game, mut io, scheduler) = started();
        rescue_one(&mut game, &mut io, &scheduler);

        miss_one(&mut game, &mut io, &scheduler);
        miss_one(&mut game, &mut io, &scheduler);
        assert_eq!(game.hearts(), 1);
        assert_eq!(game.phase(), Phase::Playing);

        io.screen.ops.clear();
        miss_one(&mut game, &mut io, &scheduler);

        assert_eq!(game.hearts(), 0);
        assert_eq!(game.phase(), Phase::Lost);
        assert!(!game.phase().has_won());
        assert_eq!(game.outcome(), Some(Outcome::Lost));
        assert_eq!(game.rescued(), 1);
        assert_eq!(io.screen.ops.last(), Some(&Op::Clear(CRASH.area(0))));
    }

    #[test]
    fn test_idle_game_ignores_events() {
        let mut io = testing::devices();
        let mut game = GameContext::new();
        let scheduler = TestScheduler::new();

        game.handle(Event::AdvanceDummy, &mut io, &scheduler);
        game.handle(Event::Rescue, &mut io, &scheduler);

        assert_eq!(game.dummy(), 0);
        assert_eq!(game.rescued(), 0);
        assert!(io.screen.ops.is_empty());
    }
}
