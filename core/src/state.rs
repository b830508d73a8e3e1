use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::*;

/// Extras layered on top of the card game: the rotating fun message, compliments and the lucky charm.
///
/// Only indices are tracked; the text behind them belongs to the view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyState {
    pub party_mode: bool,
    pub fun_message: u8,
    pub compliment: Option<u8>,
    pub lucky_charm: u8,
}

impl Default for PartyState {
    fn default() -> Self {
        Self {
            party_mode: true,
            fun_message: 0,
            compliment: None,
            lucky_charm: 0,
        }
    }
}

/// What the view needs to draw one card.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub id: CardId,
    pub has_gift: bool,
    pub is_wrong: bool,
    pub show_gift: bool,
}

/// Complete quest state. Transitions never mutate in place, each one returns the next state together with an
/// outcome telling whether anything changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestState {
    config: QuestConfig,
    stage: Stage,
    deck: Deck,
    wrong_guesses: BTreeSet<CardId>,
    reveal_gift: bool,
    surrendered: bool,
    button_offset: f64,
    shuffle_ticks: u8,
    status: Option<StatusMessage>,
    celebrating: bool,
    party: PartyState,
}

impl QuestState {
    pub fn new(config: QuestConfig) -> Self {
        Self {
            config: config.sanitized(),
            stage: Stage::Button,
            deck: Deck::default(),
            wrong_guesses: BTreeSet::new(),
            reveal_gift: true,
            surrendered: false,
            button_offset: 0.0,
            shuffle_ticks: 0,
            status: None,
            celebrating: false,
            party: PartyState::default(),
        }
    }

    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn wrong_guesses(&self) -> &BTreeSet<CardId> {
        &self.wrong_guesses
    }

    pub fn reveal_gift(&self) -> bool {
        self.reveal_gift
    }

    pub fn surrendered(&self) -> bool {
        self.surrendered
    }

    pub fn button_offset(&self) -> f64 {
        self.button_offset
    }

    pub fn shuffle_ticks(&self) -> u8 {
        self.shuffle_ticks
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.status
    }

    pub fn celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn party(&self) -> PartyState {
        self.party
    }

    pub fn stats(&self) -> QuestStats {
        QuestStats::new(
            self.stage,
            usize::from(self.config.total_cards),
            self.wrong_guesses.len(),
        )
    }

    pub fn win_badge(&self) -> Option<WinBadge> {
        matches!(self.stage, Stage::Win).then(|| WinBadge::from_attempts(self.wrong_guesses.len()))
    }

    pub fn card_views(&self) -> impl Iterator<Item = CardView> + '_ {
        self.deck.iter().map(|card| CardView {
            id: card.id,
            has_gift: card.has_gift,
            is_wrong: self.wrong_guesses.contains(&card.id),
            show_gift: card.has_gift && self.reveal_gift,
        })
    }

    fn with(&self, update: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        update(&mut next);
        next
    }

    fn unchanged<O>(&self, outcome: O) -> (Self, O) {
        (self.clone(), outcome)
    }

    pub fn set_surrendered(&self, surrendered: bool) -> (Self, StepOutcome) {
        if self.stage != Stage::Button || self.surrendered == surrendered {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.surrendered = surrendered),
            StepOutcome::Changed,
        )
    }

    /// The catch button slips away to `offset` instead of being caught.
    pub fn evade(&self, offset: f64) -> (Self, CatchOutcome) {
        if self.stage != Stage::Button || self.surrendered {
            return self.unchanged(CatchOutcome::NoChange);
        }
        (
            self.with(|next| next.button_offset = offset),
            CatchOutcome::Evaded,
        )
    }

    /// Deals `deck` and enters the memorize window of the shuffle stage.
    pub fn unlock(&self, deck: Deck) -> (Self, CatchOutcome) {
        if self.stage != Stage::Button || !self.surrendered {
            return self.unchanged(CatchOutcome::NoChange);
        }
        let next = self.with(|next| {
            next.stage = Stage::Shuffle;
            next.deck = deck;
            next.wrong_guesses.clear();
            next.reveal_gift = true;
            next.shuffle_ticks = 0;
            next.status = Some(StatusMessage::GameStarted);
        });
        (next, CatchOutcome::Unlocked)
    }

    pub fn end_reveal(&self) -> (Self, StepOutcome) {
        if self.stage != Stage::Shuffle || !self.reveal_gift {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.reveal_gift = false),
            StepOutcome::Changed,
        )
    }

    /// Lays out `shuffled` as the new visual order, moving on to the cards stage after the last tick.
    pub fn shuffle_tick(&self, shuffled: Deck) -> (Self, ShuffleOutcome) {
        if self.stage != Stage::Shuffle || self.reveal_gift {
            return self.unchanged(ShuffleOutcome::NoChange);
        }
        let ticks = self.shuffle_ticks.saturating_add(1);
        let finished = ticks >= self.config.shuffle_ticks;
        let next = self.with(|next| {
            next.deck = shuffled;
            next.shuffle_ticks = ticks;
            if finished {
                next.stage = Stage::Cards;
            }
        });
        let outcome = if finished {
            ShuffleOutcome::Finished
        } else {
            ShuffleOutcome::Shuffled
        };
        (next, outcome)
    }

    pub fn pick_card(&self, id: CardId) -> (Self, PickOutcome) {
        if self.stage != Stage::Cards || self.wrong_guesses.contains(&id) {
            return self.unchanged(PickOutcome::Ignored);
        }
        let Some(card) = self.deck.get(id) else {
            return self.unchanged(PickOutcome::Ignored);
        };

        if card.has_gift {
            let next = self.with(|next| {
                next.stage = Stage::Win;
                next.celebrating = true;
                next.status = Some(StatusMessage::FoundGift);
            });
            (next, PickOutcome::Found)
        } else {
            let next = self.with(|next| {
                next.wrong_guesses.insert(id);
                next.status = Some(StatusMessage::WrongPick);
            });
            (next, PickOutcome::Wrong)
        }
    }

    pub fn start_burst(&self) -> (Self, StepOutcome) {
        if self.stage != Stage::Win {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.celebrating = true),
            StepOutcome::Changed,
        )
    }

    pub fn end_celebration(&self) -> (Self, StepOutcome) {
        if !self.celebrating {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.celebrating = false),
            StepOutcome::Changed,
        )
    }

    pub fn toggle_party_mode(&self) -> (Self, StepOutcome) {
        (
            self.with(|next| next.party.party_mode = !next.party.party_mode),
            StepOutcome::Changed,
        )
    }

    pub fn advance_fun_message(&self) -> (Self, StepOutcome) {
        if !self.party.party_mode || !self.stage.is_party_stage() {
            return self.unchanged(StepOutcome::NoChange);
        }
        let count = self.config.fun_message_count;
        (
            self.with(|next| next.party.fun_message = (next.party.fun_message + 1) % count),
            StepOutcome::Changed,
        )
    }

    pub fn show_compliment(&self, index: u8) -> (Self, StepOutcome) {
        if self.stage != Stage::Win || index >= self.config.compliment_count {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.party.compliment = Some(index)),
            StepOutcome::Changed,
        )
    }

    pub fn clear_compliment(&self) -> (Self, StepOutcome) {
        if self.party.compliment.is_none() {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.party.compliment = None),
            StepOutcome::Changed,
        )
    }

    pub fn set_lucky_charm(&self, index: u8) -> (Self, StepOutcome) {
        if index >= self.config.charm_count || index == self.party.lucky_charm {
            return self.unchanged(StepOutcome::NoChange);
        }
        (
            self.with(|next| next.party.lucky_charm = index),
            StepOutcome::Changed,
        )
    }

    /// Fresh round back on the button stage. Party mode is a viewer preference and survives.
    pub fn reset(&self) -> Self {
        let mut next = Self::new(self.config);
        next.party.party_mode = self.party.party_mode;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards_stage(gift: CardId) -> QuestState {
        let state = QuestState::new(QuestConfig::default());
        let (state, _) = state.set_surrendered(true);
        let (state, _) = state.unlock(Deck::with_gift_at(6, gift).unwrap());
        let (mut state, _) = state.end_reveal();
        for _ in 0..6 {
            let deck = state.deck().clone();
            state = state.shuffle_tick(deck).0;
        }
        assert_eq!(state.stage(), Stage::Cards);
        state
    }

    #[test]
    fn catch_evades_until_surrendered() {
        let state = QuestState::new(QuestConfig::default());

        let (state, outcome) = state.evade(-42.5);
        assert_eq!(outcome, CatchOutcome::Evaded);
        assert_eq!(state.button_offset(), -42.5);
        assert_eq!(state.stage(), Stage::Button);

        let deck = Deck::with_gift_at(6, 0).unwrap();
        let (state, outcome) = state.unlock(deck.clone());
        assert_eq!(outcome, CatchOutcome::NoChange);

        let (state, _) = state.set_surrendered(true);
        let (after_evade, outcome) = state.evade(10.0);
        assert_eq!(outcome, CatchOutcome::NoChange);
        assert_eq!(after_evade, state);

        let (state, outcome) = state.unlock(deck);
        assert_eq!(outcome, CatchOutcome::Unlocked);
        assert_eq!(state.stage(), Stage::Shuffle);
        assert!(state.reveal_gift());
        assert_eq!(state.status(), Some(StatusMessage::GameStarted));
    }

    #[test]
    fn transitions_leave_the_source_state_untouched() {
        let state = cards_stage(3);
        let before = state.clone();

        let (next, outcome) = state.pick_card(0);

        assert_eq!(outcome, PickOutcome::Wrong);
        assert_eq!(state, before);
        assert_ne!(next, before);
    }

    #[test]
    fn shuffle_needs_reveal_to_end_first() {
        let state = QuestState::new(QuestConfig::default());
        let (state, _) = state.set_surrendered(true);
        let (state, _) = state.unlock(Deck::with_gift_at(6, 2).unwrap());

        let deck = state.deck().clone();
        let (same, outcome) = state.shuffle_tick(deck);
        assert_eq!(outcome, ShuffleOutcome::NoChange);
        assert_eq!(same.shuffle_ticks(), 0);
    }

    #[test]
    fn picking_gift_wins_after_any_number_of_misses() {
        for misses in 0..5u8 {
            let mut state = cards_stage(5);
            for id in 0..misses {
                state = state.pick_card(id).0;
            }
            let (state, outcome) = state.pick_card(5);
            assert_eq!(outcome, PickOutcome::Found);
            assert_eq!(state.stage(), Stage::Win);
            assert!(state.celebrating());
            assert!(!state.wrong_guesses().contains(&5));
        }
    }

    #[test]
    fn wrong_pick_is_recorded_once() {
        let state = cards_stage(3);

        let (state, outcome) = state.pick_card(1);
        assert_eq!(outcome, PickOutcome::Wrong);
        let (state, outcome) = state.pick_card(1);
        assert_eq!(outcome, PickOutcome::Ignored);

        assert_eq!(state.wrong_guesses().len(), 1);
        assert_eq!(state.stage(), Stage::Cards);
    }

    #[test]
    fn unknown_card_is_ignored() {
        let state = cards_stage(3);
        let (next, outcome) = state.pick_card(17);
        assert_eq!(outcome, PickOutcome::Ignored);
        assert_eq!(next, state);
    }

    #[test]
    fn card_views_flag_wrong_and_hidden_gift() {
        let state = cards_stage(3).pick_card(0).0;
        let views: alloc::vec::Vec<CardView> = state.card_views().collect();

        assert_eq!(views.len(), 6);
        assert!(views.iter().any(|view| view.id == 0 && view.is_wrong));
        assert!(views.iter().all(|view| !view.show_gift));
        assert_eq!(views.iter().filter(|view| view.has_gift).count(), 1);
    }

    #[test]
    fn compliment_and_burst_only_on_win() {
        let state = cards_stage(2);
        assert_eq!(state.start_burst().1, StepOutcome::NoChange);
        assert_eq!(state.show_compliment(1).1, StepOutcome::NoChange);

        let state = state.pick_card(2).0.end_celebration().0;
        let (state, outcome) = state.start_burst();
        assert_eq!(outcome, StepOutcome::Changed);
        assert!(state.celebrating());

        let (state, _) = state.show_compliment(4);
        assert_eq!(state.party().compliment, Some(4));
        assert_eq!(state.show_compliment(6).1, StepOutcome::NoChange);
    }

    #[test]
    fn fun_message_wraps_and_respects_party_mode() {
        let mut state = cards_stage(0);
        for _ in 0..5 {
            state = state.advance_fun_message().0;
        }
        assert_eq!(state.party().fun_message, 0);

        let (state, _) = state.toggle_party_mode();
        assert_eq!(state.advance_fun_message().1, StepOutcome::NoChange);
    }

    #[test]
    fn reset_keeps_party_preference_only() {
        let state = cards_stage(1).pick_card(0).0;
        let (state, _) = state.toggle_party_mode();
        let (state, _) = state.set_lucky_charm(3);

        let fresh = state.reset();

        assert_eq!(fresh.stage(), Stage::Button);
        assert!(fresh.deck().is_empty());
        assert!(fresh.wrong_guesses().is_empty());
        assert!(!fresh.party().party_mode);
        assert_eq!(fresh.party().lucky_charm, 0);
        assert_eq!(fresh.status(), None);
        assert_eq!(fresh.reset(), fresh);
    }
}
