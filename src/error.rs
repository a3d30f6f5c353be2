//! Error types for table and session operations.

extern crate alloc;

use alloc::string::String;

use thiserror::Error;

/// The deck ran out of cards while a draw was required.
///
/// This never happens with a deck-safe roster and is treated as an integrity
/// failure rather than a rejected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deck exhausted")]
pub struct DeckExhausted;

/// Errors that can occur when staking or revising a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// Stake is below the table minimum.
    #[error("bet is below the minimum stake")]
    BelowMinimum,
    /// Balance cannot cover the stake.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Errors that can occur when acting on a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Invalid game state for this action.
    #[error("invalid game state for this action")]
    InvalidState,
    /// Not this player's turn.
    #[error("not this player's turn")]
    NotYourTurn,
    /// Player not found.
    #[error("player not found")]
    PlayerNotFound,
    /// Player is already seated at this table.
    #[error("player already joined")]
    AlreadyJoined,
    /// The roster is full.
    #[error("table is full")]
    TableFull,
    /// Not enough players to start.
    #[error("not enough players to start")]
    NotEnoughPlayers,
    /// Only the creator may start the game.
    #[error("only the creator can start the game")]
    NotCreator,
    /// Cannot double after drawing a card.
    #[error("cannot double after drawing")]
    AlreadyDrawn,
    /// The stake was rejected.
    #[error(transparent)]
    Bet(#[from] BetError),
    /// The deck ran out mid-action.
    #[error(transparent)]
    DeckExhausted(#[from] DeckExhausted),
}

impl ActionError {
    /// Returns whether this error signals a broken game rather than a
    /// rejected move.
    ///
    /// ```
    /// use twentyone::{ActionError, DeckExhausted};
    ///
    /// assert!(ActionError::from(DeckExhausted).is_fatal());
    /// assert!(!ActionError::NotYourTurn.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DeckExhausted(_))
    }
}

/// Errors reported by a persistence backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend could not complete the request.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Errors returned by the session manager.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// No live or persisted game has this id.
    #[error("game {0} not found")]
    GameNotFound(String),
    /// The move was rejected; the game is unchanged.
    #[error("action rejected: {0}")]
    Rejected(ActionError),
    /// The game can no longer be played consistently.
    #[error("game integrity violated: {0}")]
    Integrity(ActionError),
    /// The persistence backend failed; the action was not applied.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A persisted record could not be decoded or encoded.
    #[error("corrupt game record {id}: {reason}")]
    Corrupt {
        /// Game id of the record.
        id: String,
        /// Codec error message.
        reason: String,
    },
}

impl From<ActionError> for ManagerError {
    fn from(err: ActionError) -> Self {
        if err.is_fatal() {
            Self::Integrity(err)
        } else {
            Self::Rejected(err)
        }
    }
}

impl ManagerError {
    /// Returns whether this is an ordinary rejected move.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
