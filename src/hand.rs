//! Hand scoring.

use crate::card::Card;

/// Highest score that does not bust.
pub const TWENTY_ONE: u8 = 21;

fn evaluate_cards(cards: &[Card]) -> (u8, bool) {
    let mut value: u32 = 0;
    let mut aces: u32 = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        value += u32::from(card.value());
    }

    while value > u32::from(TWENTY_ONE) && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= u32::from(TWENTY_ONE);
    (u8::try_from(value).unwrap_or(u8::MAX), is_soft)
}

/// Scores a hand.
///
/// Every ace starts at 11; while the total is over 21 and an ace is still
/// counted high, one ace drops to 1.
///
/// ```
/// use twentyone::{Card, Suit, hand};
///
/// let aces = [Card::new(Suit::Hearts, 1), Card::new(Suit::Spades, 1)];
/// assert_eq!(hand::score(&aces), 12);
/// ```
#[must_use]
pub fn score(cards: &[Card]) -> u8 {
    evaluate_cards(cards).0
}

/// Returns whether the hand still counts an ace as 11.
#[must_use]
pub fn is_soft(cards: &[Card]) -> bool {
    evaluate_cards(cards).1
}

/// Returns whether the score is over 21.
#[must_use]
pub const fn is_bust(score: u8) -> bool {
    score > TWENTY_ONE
}
