//! Game state types.

use serde::{Deserialize, Serialize};

/// Game state.
///
/// States only move forward; a rematch is a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Waiting for players to join.
    Waiting,
    /// Players take turns setting their stakes.
    Betting,
    /// Cards are dealt and players take turns acting.
    Playing,
    /// Dealer has played and the game is settled.
    Finished,
}

/// A stake revision during the betting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetAction {
    /// Double the stake.
    Double,
    /// Raise the stake by 10.
    PlusTen,
    /// Lower the stake by 10, not below the minimum.
    MinusTen,
    /// Halve the stake, not below the minimum.
    Half,
    /// Accept the current stake and pass the turn.
    Push,
}
