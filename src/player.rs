//! Table participants.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::error::BetError;
use crate::hand;

/// User id reserved for the dealer.
pub const DEALER_ID: i64 = -1;

/// Smallest stake accepted at the table.
pub const MIN_BET: u64 = 10;

/// Player status within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Still playing this round.
    #[default]
    Active,
    /// Player has stood.
    Stand,
    /// Hand went over 21.
    Bust,
    /// Beat the dealer.
    Win,
    /// Lost to the dealer.
    Lose,
    /// Tied the dealer.
    Tie,
}

/// A seat at the table, or the dealer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// User id (`-1` for the dealer).
    pub user_id: i64,
    /// Display name.
    pub name: String,
    hand: Vec<Card>,
    score: u8,
    /// Current status.
    pub status: PlayerStatus,
    balance: u64,
    bet: u64,
    has_drawn: bool,
}

impl Player {
    /// Creates a player with an empty hand and the given balance.
    #[must_use]
    pub fn new(user_id: i64, name: impl Into<String>, balance: u64) -> Self {
        Self {
            user_id,
            name: name.into(),
            hand: Vec::new(),
            score: 0,
            status: PlayerStatus::Active,
            balance,
            bet: 0,
            has_drawn: false,
        }
    }

    /// Creates the dealer.
    #[must_use]
    pub fn dealer() -> Self {
        Self::new(DEALER_ID, "Dealer", 0)
    }

    /// Returns whether this is the dealer.
    #[must_use]
    pub const fn is_dealer(&self) -> bool {
        self.user_id == DEALER_ID
    }

    /// Adds a card and rescores the hand.
    pub fn add_card(&mut self, card: Card) {
        self.hand.push(card);
        self.score = hand::score(&self.hand);

        if hand::is_bust(self.score) {
            self.status = PlayerStatus::Bust;
        }
    }

    /// Stakes `amount` out of the balance.
    ///
    /// A stake already escrowed is returned to the balance first, so the
    /// player's total is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is below [`MIN_BET`] or above the
    /// balance.
    pub const fn place_bet(&mut self, amount: u64) -> Result<(), BetError> {
        if amount < MIN_BET {
            return Err(BetError::BelowMinimum);
        }
        if amount > self.balance {
            return Err(BetError::InsufficientFunds);
        }

        self.balance = self.balance - amount + self.bet;
        self.bet = amount;
        Ok(())
    }

    /// Revises the escrowed stake to `new_amount`.
    ///
    /// The current stake counts towards what the player can afford.
    ///
    /// # Errors
    ///
    /// Returns an error if `new_amount` is below [`MIN_BET`] or above
    /// `balance + bet`.
    pub const fn adjust_bet(&mut self, new_amount: u64) -> Result<(), BetError> {
        if new_amount < MIN_BET {
            return Err(BetError::BelowMinimum);
        }
        let total = self.balance + self.bet;
        if new_amount > total {
            return Err(BetError::InsufficientFunds);
        }

        self.balance = total - new_amount;
        self.bet = new_amount;
        Ok(())
    }

    /// Credits settlement winnings.
    pub const fn add_winnings(&mut self, amount: u64) {
        self.balance += amount;
    }

    /// Clears the hand for a fresh deal. Balance and bet are kept.
    pub fn reset_round(&mut self) {
        self.hand.clear();
        self.score = 0;
        self.status = PlayerStatus::Active;
        self.has_drawn = false;
    }

    pub(crate) const fn mark_drawn(&mut self) {
        self.has_drawn = true;
    }

    /// Returns the cards in hand.
    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    /// Returns the hand score.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Returns whether the hand is soft.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        hand::is_soft(&self.hand)
    }

    /// Returns the uncommitted balance.
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Returns the escrowed stake.
    #[must_use]
    pub const fn bet(&self) -> u64 {
        self.bet
    }

    /// Returns whether the player drew a card this round.
    #[must_use]
    pub const fn has_drawn(&self) -> bool {
        self.has_drawn
    }
}
