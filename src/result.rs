//! Settlement result types.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Final result of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Player beat the dealer or the dealer busted.
    Win,
    /// Player busted or scored below the dealer.
    Lose,
    /// Player matched the dealer's score.
    Tie,
}

/// Settlement for a single player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// The player's user id.
    pub user_id: i64,
    /// The outcome of the hand.
    pub outcome: Outcome,
    /// The escrowed stake.
    pub bet: u64,
    /// Amount credited back to the balance.
    pub payout: u64,
    /// The player's final score.
    pub score: u8,
}

impl PlayerResult {
    /// Net result (positive = profit, negative = loss).
    #[must_use]
    #[expect(clippy::cast_possible_wrap, reason = "chip amounts fit in i64")]
    pub const fn net(&self) -> i64 {
        self.payout as i64 - self.bet as i64
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Results in turn order.
    pub players: Vec<PlayerResult>,
    /// The dealer's final score.
    pub dealer_score: u8,
    /// Whether the dealer busted.
    pub dealer_bust: bool,
    /// Sum of the losing stakes.
    pub losing_pool: u64,
    /// Bonus paid to each winner on top of their doubled stake.
    pub winner_bonus: u64,
}

impl Settlement {
    /// Total credited back to all players.
    #[must_use]
    pub fn total_payout(&self) -> u64 {
        self.players.iter().map(|p| p.payout).sum()
    }

    /// Total staked by all players.
    #[must_use]
    pub fn total_staked(&self) -> u64 {
        self.players.iter().map(|p| p.bet).sum()
    }

    /// Returns the players who won.
    pub fn winners(&self) -> impl Iterator<Item = &PlayerResult> {
        self.players.iter().filter(|p| p.outcome == Outcome::Win)
    }
}
