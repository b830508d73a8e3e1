use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

/// Smallest and largest distance the catch button may slip away, in pixels.
const EVADE_MIN_REACH: f64 = 35.0;
const EVADE_MAX_REACH: f64 = 240.0;
const EVADE_VIEWPORT_SHARE: f64 = 0.28;

/// Random horizontal displacement for the catch button, bounded by the viewport width.
pub fn evade_offset<R: Rng + ?Sized>(rng: &mut R, viewport_width: f64) -> f64 {
    let reach = (viewport_width * EVADE_VIEWPORT_SHARE)
        .min(EVADE_MAX_REACH)
        .max(EVADE_MIN_REACH);
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    direction * rng.random_range(0.0..reach)
}

struct Armed<H> {
    ticket: u64,
    _handle: H,
}

struct Timers<H> {
    reveal: Option<Armed<H>>,
    shuffle: Option<Armed<H>>,
    celebration: Option<Armed<H>>,
    compliment: Option<Armed<H>>,
    fun_message: Option<Armed<H>>,
}

impl<H> Timers<H> {
    fn slot(&mut self, kind: TimerKind) -> &mut Option<Armed<H>> {
        use TimerKind::*;
        match kind {
            Reveal => &mut self.reveal,
            ShuffleTick => &mut self.shuffle,
            Celebration => &mut self.celebration,
            Compliment => &mut self.compliment,
            FunMessage => &mut self.fun_message,
        }
    }

    fn clear(&mut self) {
        self.reveal = None;
        self.shuffle = None;
        self.celebration = None;
        self.compliment = None;
        self.fun_message = None;
    }
}

impl<H> Default for Timers<H> {
    fn default() -> Self {
        Self {
            reveal: None,
            shuffle: None,
            celebration: None,
            compliment: None,
            fun_message: None,
        }
    }
}

/// Drives a [`QuestState`] through user input and timers.
///
/// Randomness comes from a seeded [`SmallRng`], timers from `S`. Each timer purpose has one slot; arming a
/// slot drops whatever it held, and leaving the shuffle stage (or resetting) empties the shuffle slots before
/// the next state is installed.
pub struct QuestController<S: Scheduler> {
    state: QuestState,
    rng: SmallRng,
    scheduler: S,
    next_ticket: u64,
    timers: Timers<S::Handle>,
}

impl<S: Scheduler> QuestController<S> {
    pub fn new(config: QuestConfig, seed: u64, scheduler: S) -> Self {
        let mut controller = Self {
            state: QuestState::new(config),
            rng: SmallRng::seed_from_u64(seed),
            scheduler,
            next_ticket: 0,
            timers: Timers::default(),
        };
        controller.sync_fun_ticker();
        controller
    }

    pub fn state(&self) -> &QuestState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn config(&self) -> &QuestConfig {
        self.state.config()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        let Timers {
            reveal,
            shuffle,
            celebration,
            compliment,
            fun_message,
        } = &self.timers;
        match kind {
            TimerKind::Reveal => reveal.is_some(),
            TimerKind::ShuffleTick => shuffle.is_some(),
            TimerKind::Celebration => celebration.is_some(),
            TimerKind::Compliment => compliment.is_some(),
            TimerKind::FunMessage => fun_message.is_some(),
        }
    }

    pub fn set_surrendered(&mut self, surrendered: bool) -> StepOutcome {
        let (next, outcome) = self.state.set_surrendered(surrendered);
        self.commit(next);
        outcome
    }

    /// Handles a press on the catch button. Without surrendering the button slips away, otherwise a new deck
    /// is dealt and the memorize window starts.
    pub fn catch_button(&mut self, viewport_width: f64) -> CatchOutcome {
        if self.state.stage() != Stage::Button {
            log::trace!("catch ignored in {:?}", self.state.stage());
            return CatchOutcome::NoChange;
        }

        if !self.state.surrendered() {
            let offset = evade_offset(&mut self.rng, viewport_width);
            let (next, outcome) = self.state.evade(offset);
            self.commit(next);
            return outcome;
        }

        let deck = match Deck::generate(self.config().total_cards, &mut self.rng) {
            Ok(deck) => deck,
            Err(err) => {
                log::error!("could not deal a deck: {}", err);
                return CatchOutcome::NoChange;
            }
        };
        let (next, outcome) = self.state.unlock(deck);
        self.commit(next);
        if outcome == CatchOutcome::Unlocked {
            let delay = self.config().reveal_delay;
            self.arm_once(TimerKind::Reveal, delay);
        }
        outcome
    }

    pub fn pick_card(&mut self, id: CardId) -> PickOutcome {
        let (next, outcome) = self.state.pick_card(id);
        self.commit(next);
        match outcome {
            PickOutcome::Found => {
                log::debug!("gift found under card {}", id);
                let duration = self.config().win_celebration;
                self.arm_once(TimerKind::Celebration, duration);
            }
            PickOutcome::Wrong => log::debug!("card {} has no gift", id),
            PickOutcome::Ignored => log::trace!("pick on card {} ignored", id),
        }
        outcome
    }

    /// Back to the button stage with a fresh round. Every pending timer is dropped before the new state is
    /// installed, so this is safe to call at any point, repeatedly.
    pub fn play_again(&mut self) -> StepOutcome {
        self.timers.clear();
        let next = self.state.reset();
        let outcome = if next == self.state {
            StepOutcome::NoChange
        } else {
            StepOutcome::Changed
        };
        self.state = next;
        self.sync_fun_ticker();
        outcome
    }

    pub fn toggle_party_mode(&mut self) -> StepOutcome {
        let (next, outcome) = self.state.toggle_party_mode();
        self.commit(next);
        outcome
    }

    pub fn party_burst(&mut self) -> StepOutcome {
        let (next, outcome) = self.state.start_burst();
        self.commit(next);
        if outcome.has_update() {
            let duration = self.config().burst_celebration;
            self.arm_once(TimerKind::Celebration, duration);
        }
        outcome
    }

    pub fn reveal_compliment(&mut self) -> StepOutcome {
        if self.state.stage() != Stage::Win {
            return StepOutcome::NoChange;
        }
        let count = self.config().compliment_count;
        let index = self.rng.random_range(0..count);
        let (next, outcome) = self.state.show_compliment(index);
        self.commit(next);
        if outcome.has_update() {
            let duration = self.config().compliment_duration;
            self.arm_once(TimerKind::Compliment, duration);
        }
        outcome
    }

    pub fn reroll_charm(&mut self) -> StepOutcome {
        let count = self.config().charm_count;
        let index = self.rng.random_range(0..count);
        let (next, outcome) = self.state.set_lucky_charm(index);
        self.commit(next);
        outcome
    }

    /// Applies a fired timer. Returns whether the state changed; events from timers that were replaced or
    /// dropped in the meantime are ignored.
    pub fn on_timer(&mut self, event: TimerEvent) -> bool {
        let current = self.timers.slot(event.kind).as_ref().map(|armed| armed.ticket);
        if current != Some(event.ticket) {
            log::trace!("stale timer {:?} ignored", event);
            return false;
        }

        match event.kind {
            TimerKind::Reveal => {
                self.timers.reveal = None;
                let (next, outcome) = self.state.end_reveal();
                self.commit(next);
                if outcome.has_update() {
                    let period = self.config().shuffle_interval;
                    self.arm_repeating(TimerKind::ShuffleTick, period);
                }
                outcome.has_update()
            }
            TimerKind::ShuffleTick => {
                let mut shuffled = self.state.deck().clone();
                shuffled.shuffle(&mut self.rng);
                let (next, outcome) = self.state.shuffle_tick(shuffled);
                log::trace!("shuffle tick {}", next.shuffle_ticks());
                self.commit(next);
                outcome.has_update()
            }
            TimerKind::Celebration => {
                self.timers.celebration = None;
                let (next, outcome) = self.state.end_celebration();
                self.commit(next);
                outcome.has_update()
            }
            TimerKind::Compliment => {
                self.timers.compliment = None;
                let (next, outcome) = self.state.clear_compliment();
                self.commit(next);
                outcome.has_update()
            }
            TimerKind::FunMessage => {
                let (next, outcome) = self.state.advance_fun_message();
                self.commit(next);
                outcome.has_update()
            }
        }
    }

    fn commit(&mut self, next: QuestState) {
        let from = self.state.stage();
        let to = next.stage();
        if from != to {
            log::debug!("stage {:?} -> {:?}", from, to);
            if from == Stage::Shuffle {
                self.timers.reveal = None;
                self.timers.shuffle = None;
            }
        }
        self.state = next;
        self.sync_fun_ticker();
    }

    fn sync_fun_ticker(&mut self) {
        let wanted = self.state.party().party_mode && self.state.stage().is_party_stage();
        match (wanted, self.timers.fun_message.is_some()) {
            (true, false) => {
                let period = self.config().fun_message_interval;
                self.arm_repeating(TimerKind::FunMessage, period);
            }
            (false, true) => self.timers.fun_message = None,
            _ => {}
        }
    }

    fn take_ticket(&mut self, kind: TimerKind) -> TimerEvent {
        self.next_ticket += 1;
        TimerEvent {
            kind,
            ticket: self.next_ticket,
        }
    }

    fn arm_once(&mut self, kind: TimerKind, delay: Millis) {
        *self.timers.slot(kind) = None;
        let event = self.take_ticket(kind);
        let handle = self.scheduler.schedule_once(delay, event);
        *self.timers.slot(kind) = Some(Armed {
            ticket: event.ticket,
            _handle: handle,
        });
    }

    fn arm_repeating(&mut self, kind: TimerKind, period: Millis) {
        *self.timers.slot(kind) = None;
        let event = self.take_ticket(kind);
        let handle = self.scheduler.schedule_repeating(period, event);
        *self.timers.slot(kind) = Some(Armed {
            ticket: event.ticket,
            _handle: handle,
        });
    }
}

impl QuestController<ManualScheduler> {
    /// Moves the virtual clock forward by `millis`, delivering due timers one at a time. Returns how many
    /// events were delivered.
    pub fn advance(&mut self, millis: u64) -> usize {
        let until = self.scheduler.now() + millis;
        let mut delivered = 0;
        while let Some(event) = self.scheduler.fire_next(until) {
            self.on_timer(event);
            delivered += 1;
        }
        self.scheduler.settle(until);
        delivered
    }
}
