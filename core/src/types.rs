use serde::{Deserialize, Serialize};

/// Identifier of a card within a single deck, in `0..total_cards`.
pub type CardId = u8;

/// Millisecond duration used for every timer in the quest.
pub type Millis = u32;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    Button,
    Shuffle,
    Cards,
    Win,
}

impl Stage {
    /// Fixed presentation order, used for the progress indicator.
    pub const ORDER: [Stage; 4] = [Stage::Button, Stage::Shuffle, Stage::Cards, Stage::Win];

    pub const fn index(self) -> usize {
        match self {
            Self::Button => 0,
            Self::Shuffle => 1,
            Self::Cards => 2,
            Self::Win => 3,
        }
    }

    /// Stages where the party ticker is allowed to rotate messages.
    pub const fn is_party_stage(self) -> bool {
        matches!(self, Self::Cards | Self::Win)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    GameStarted,
    WrongPick,
    FoundGift,
}

impl StatusMessage {
    pub const fn text(self) -> &'static str {
        match self {
            Self::GameStarted => "Game started. Watch the gift carefully.",
            Self::WrongPick => "Not this one. Try another card.",
            Self::FoundGift => "Perfect pick. You found it.",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinBadge {
    LegendaryLuck,
    SharpMemory,
    PersistentWinner,
}

impl WinBadge {
    pub const fn from_attempts(attempts_used: usize) -> Self {
        match attempts_used {
            0 => Self::LegendaryLuck,
            1..=2 => Self::SharpMemory,
            _ => Self::PersistentWinner,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LegendaryLuck => "Legendary Luck",
            Self::SharpMemory => "Sharp Memory",
            Self::PersistentWinner => "Persistent Winner",
        }
    }
}

/// Read-only numbers derived from the quest state on demand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct QuestStats {
    pub attempts_used: usize,
    pub cards_remaining: usize,
    pub next_pick_odds: u8,
    pub step: usize,
    pub total_steps: usize,
}

impl QuestStats {
    pub fn new(stage: Stage, total_cards: usize, attempts_used: usize) -> Self {
        let cards_remaining = total_cards.saturating_sub(attempts_used).max(1);
        Self {
            attempts_used,
            cards_remaining,
            next_pick_odds: rounded_percent(cards_remaining),
            step: stage.index() + 1,
            total_steps: Stage::ORDER.len(),
        }
    }

    pub fn progress_percent(&self) -> u8 {
        (self.step * 100 / self.total_steps) as u8
    }
}

/// `round(100 / n)` with halves rounded up, for `n >= 1`.
const fn rounded_percent(n: usize) -> u8 {
    ((100 + n / 2) / n) as u8
}
