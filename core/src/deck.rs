use alloc::vec::Vec;
use rand::seq::SliceRandom;
use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

use crate::*;

/// Redraws allowed when a shuffle lands on the order it started from.
const MAX_SHUFFLE_REDRAWS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub has_gift: bool,
}

/// Ordered cards on the table, exactly one of which hides the gift.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const MIN_SIZE: CardId = 2;

    pub fn with_gift_at(size: CardId, gift: CardId) -> Result<Self> {
        if size < Self::MIN_SIZE {
            return Err(QuestError::InvalidDeckSize);
        }
        if gift >= size {
            return Err(QuestError::GiftOutOfRange);
        }

        let cards = (0..size)
            .map(|id| Card {
                id,
                has_gift: id == gift,
            })
            .collect();
        Ok(Self { cards })
    }

    /// Deals a fresh deck with the gift at a uniformly random position.
    pub fn generate<R: Rng + ?Sized>(size: CardId, rng: &mut R) -> Result<Self> {
        if size < Self::MIN_SIZE {
            return Err(QuestError::InvalidDeckSize);
        }
        let gift = rng.random_range(0..size);
        log::trace!("gift placed under card {}", gift);
        Self::with_gift_at(size, gift)
    }

    /// Scrambles the visual order so that every call ends on a different arrangement than it
    /// started from. Two cards can only trade places; larger decks redraw a few times and fall
    /// back to swapping two random positions.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.cards.len();
        if len < 2 {
            return;
        }
        if len == 2 {
            self.cards.swap(0, 1);
            return;
        }

        let previous = self.cards.clone();
        for _ in 0..MAX_SHUFFLE_REDRAWS {
            self.cards.shuffle(rng);
            if self.cards != previous {
                return;
            }
        }

        let first = rng.random_range(0..len);
        let second = (first + rng.random_range(1..len)) % len;
        log::trace!("shuffle kept the previous order, swapping {first} and {second}");
        self.cards.swap(first, second);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<Card> {
        self.cards.iter().copied().find(|card| card.id == id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.get(id).is_some()
    }

    pub fn gift(&self) -> Option<Card> {
        self.cards.iter().copied().find(|card| card.has_gift)
    }

    pub fn gift_count(&self) -> usize {
        self.cards.iter().filter(|card| card.has_gift).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().map(|card| card.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn generated_decks_have_exactly_one_gift() {
        let mut rng = SmallRng::seed_from_u64(7);
        for size in 2..=24 {
            for _ in 0..32 {
                let deck = Deck::generate(size, &mut rng).unwrap();
                assert_eq!(deck.len(), usize::from(size));
                assert_eq!(deck.gift_count(), 1);
            }
        }
    }

    #[test]
    fn gift_position_covers_whole_deck() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut seen = [false; 6];
        for _ in 0..500 {
            let deck = Deck::generate(6, &mut rng).unwrap();
            seen[usize::from(deck.gift().unwrap().id)] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn checked_constructor_rejects_bad_shapes() {
        assert_eq!(Deck::with_gift_at(1, 0), Err(QuestError::InvalidDeckSize));
        assert_eq!(Deck::with_gift_at(6, 6), Err(QuestError::GiftOutOfRange));
        assert_eq!(Deck::generate(0, &mut SmallRng::seed_from_u64(0)), Err(QuestError::InvalidDeckSize));
    }

    #[test]
    fn shuffle_keeps_cards_and_changes_order() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut deck = Deck::with_gift_at(6, 3).unwrap();

        for _ in 0..20 {
            let before: Vec<CardId> = deck.ids().collect();
            deck.shuffle(&mut rng);
            let after: Vec<CardId> = deck.ids().collect();

            assert_ne!(before, after);
            let mut sorted = after.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3, 4, 5]);
            assert_eq!(deck.gift().unwrap().id, 3);
        }
    }

    #[test]
    fn small_decks_never_repeat_their_order() {
        let mut rng = SmallRng::seed_from_u64(13);
        for size in [2, 3] {
            let mut deck = Deck::with_gift_at(size, 0).unwrap();
            for _ in 0..20_000 {
                let before: Vec<CardId> = deck.ids().collect();
                deck.shuffle(&mut rng);
                assert_ne!(deck.ids().collect::<Vec<_>>(), before);
                assert_eq!(deck.gift_count(), 1);
            }
        }
    }

    #[test]
    fn lookup_by_id_ignores_position() {
        let mut deck = Deck::with_gift_at(4, 1).unwrap();
        deck.shuffle(&mut SmallRng::seed_from_u64(5));

        assert_eq!(deck.get(1), Some(Card { id: 1, has_gift: true }));
        assert_eq!(deck.get(2), Some(Card { id: 2, has_gift: false }));
        assert_eq!(deck.get(4), None);
        assert!(!deck.contains(9));
    }
}
