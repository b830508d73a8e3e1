use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuestError {
    #[error("Deck needs at least two cards")]
    InvalidDeckSize,
    #[error("Gift position is outside of the deck")]
    GiftOutOfRange,
}

pub type Result<T> = core::result::Result<T, QuestError>;
