//! The 52-card deck a game deals from.

extern crate alloc;

use alloc::vec::Vec;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::card::{Card, DECK_SIZE, Suit};
use crate::error::DeckExhausted;

/// A single deck of playing cards.
///
/// Cards are drawn from the end of the underlying vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Returns the 52 cards in canonical order (suit by suit, ace to king).
    #[must_use]
    pub fn ordered() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);

        for suit in Suit::ALL {
            for rank in 1..=13 {
                cards.push(Card::new(suit, rank));
            }
        }

        Self { cards }
    }

    /// Creates a full deck and shuffles it with the given generator.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::ordered();
        deck.cards.shuffle(rng);
        deck
    }

    /// Creates a deck holding exactly `cards`.
    ///
    /// The last card of the slice is drawn first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Removes and returns the top card.
    ///
    /// # Errors
    ///
    /// Returns [`DeckExhausted`] if no cards are left.
    pub fn draw(&mut self) -> Result<Card, DeckExhausted> {
        self.cards.pop().ok_or(DeckExhausted)
    }

    /// Returns the remaining cards, bottom first.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the number of cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
