#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use controller::*;
pub use deck::*;
pub use error::*;
pub use schedule::*;
pub use state::*;
pub use types::*;

mod controller;
mod deck;
mod error;
mod schedule;
mod state;
mod types;

/// Tunables for one quest. Every duration is in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestConfig {
    pub total_cards: CardId,
    pub reveal_delay: Millis,
    pub shuffle_interval: Millis,
    pub shuffle_ticks: u8,
    pub win_celebration: Millis,
    pub burst_celebration: Millis,
    pub compliment_duration: Millis,
    pub fun_message_interval: Millis,
    pub fun_message_count: u8,
    pub compliment_count: u8,
    pub charm_count: u8,
}

impl QuestConfig {
    pub const MAX_CARDS: CardId = 24;

    pub const DEFAULT: Self = Self {
        total_cards: 6,
        reveal_delay: 1800,
        shuffle_interval: 650,
        shuffle_ticks: 6,
        win_celebration: 15_000,
        burst_celebration: 4500,
        compliment_duration: 2800,
        fun_message_interval: 2200,
        fun_message_count: 5,
        compliment_count: 6,
        charm_count: 7,
    };

    pub fn new(total_cards: CardId) -> Self {
        Self {
            total_cards,
            ..Self::DEFAULT
        }
        .sanitized()
    }

    /// Clamps every field into a range the controller can run with: a deck of at least two cards, and
    /// non-zero delays and table sizes. A zero reveal delay would let the first shuffle tick race the end of
    /// the memorize window.
    pub fn sanitized(self) -> Self {
        let total_cards = self.total_cards.clamp(Deck::MIN_SIZE, Self::MAX_CARDS);
        if total_cards != self.total_cards {
            log::warn!(
                "Deck size {} out of range, using {}",
                self.total_cards,
                total_cards
            );
        }

        Self {
            total_cards,
            reveal_delay: self.reveal_delay.max(1),
            shuffle_interval: self.shuffle_interval.max(1),
            shuffle_ticks: self.shuffle_ticks.max(1),
            win_celebration: self.win_celebration.max(1),
            burst_celebration: self.burst_celebration.max(1),
            compliment_duration: self.compliment_duration.max(1),
            fun_message_interval: self.fun_message_interval.max(1),
            fun_message_count: self.fun_message_count.max(1),
            compliment_count: self.compliment_count.max(1),
            charm_count: self.charm_count.max(1),
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    NoChange,
    Changed,
}

impl StepOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CatchOutcome {
    NoChange,
    Evaded,
    Unlocked,
}

impl CatchOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShuffleOutcome {
    NoChange,
    Shuffled,
    Finished,
}

impl ShuffleOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PickOutcome {
    Ignored,
    Wrong,
    Found,
}

impl PickOutcome {
    pub const fn has_update(self) -> bool {
        use PickOutcome::*;
        match self {
            Ignored => false,
            Wrong => true,
            Found => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_deck_and_delays() {
        let config = QuestConfig {
            total_cards: 1,
            reveal_delay: 0,
            shuffle_ticks: 0,
            ..QuestConfig::DEFAULT
        }
        .sanitized();

        assert_eq!(config.total_cards, 2);
        assert_eq!(config.reveal_delay, 1);
        assert_eq!(config.shuffle_ticks, 1);
        assert_eq!(QuestConfig::new(200).total_cards, QuestConfig::MAX_CARDS);
    }

    #[test]
    fn default_matches_the_card_game_timing() {
        let config = QuestConfig::default();
        assert_eq!(config, config.sanitized());
        assert_eq!(config.total_cards, 6);
        assert_eq!(config.reveal_delay, 1800);
        assert_eq!(config.shuffle_interval, 650);
        assert_eq!(config.shuffle_ticks, 6);
    }
}
