//! Persistence contract for game records and the player ledger.
//!
//! The manager only ever talks to a [`GameStore`]. Game records are opaque
//! serialized strings; balances and statistics are keyed by user id.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::result::Outcome;

mod memory;

pub use memory::MemoryStore;

/// Balance granted to a user the first time the ledger sees them.
pub const DEFAULT_BALANCE: u64 = 200;

/// Lifetime statistics of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Number of rounds won.
    pub total_wins: u64,
    /// Largest stake ever settled.
    pub max_bet: u64,
    /// Longest winning streak.
    pub max_consecutive_wins: u64,
    /// Current winning streak.
    pub current_consecutive_wins: u64,
}

impl UserStats {
    /// Folds one settled round into the statistics.
    ///
    /// Any non-win (including a tie) breaks the streak.
    ///
    /// ```
    /// use twentyone::{Outcome, UserStats};
    ///
    /// let mut stats = UserStats::default();
    /// stats.record(Outcome::Win, 20);
    /// stats.record(Outcome::Win, 10);
    /// stats.record(Outcome::Tie, 40);
    ///
    /// assert_eq!(stats.total_wins, 2);
    /// assert_eq!(stats.max_consecutive_wins, 2);
    /// assert_eq!(stats.current_consecutive_wins, 0);
    /// assert_eq!(stats.max_bet, 40);
    /// ```
    pub fn record(&mut self, outcome: Outcome, bet: u64) {
        if outcome == Outcome::Win {
            self.total_wins += 1;
            self.current_consecutive_wins += 1;
            self.max_consecutive_wins = self
                .max_consecutive_wins
                .max(self.current_consecutive_wins);
        } else {
            self.current_consecutive_wins = 0;
        }
        self.max_bet = self.max_bet.max(bet);
    }
}

/// Balance and statistics of one user, as read from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub user_id: i64,
    /// Persisted balance.
    pub balance: u64,
    /// Lifetime statistics.
    pub stats: UserStats,
}

/// Durable storage behind the session manager.
///
/// Implementations must be safe to share between threads; the manager calls
/// them while holding a per-game lock, never a global one.
pub trait GameStore: Send + Sync {
    /// Loads the serialized record of a game.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn load_game(&self, game_id: &str) -> Result<Option<String>, StoreError>;

    /// Inserts or replaces the serialized record of a game.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn save_game(
        &self,
        game_id: &str,
        scope: i64,
        creator_id: i64,
        record: &str,
    ) -> Result<(), StoreError>;

    /// Removes a game record. Removing a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete_game(&self, game_id: &str) -> Result<(), StoreError>;

    /// Lists the ids of every game bound to a chat scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn games_in_scope(&self, scope: i64) -> Result<Vec<String>, StoreError>;

    /// Returns the balance of a user, opening an account with
    /// [`DEFAULT_BALANCE`] on first access.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn user_balance(&self, user_id: i64) -> Result<u64, StoreError>;

    /// Overwrites the balance of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn save_user_balance(&self, user_id: i64, balance: u64) -> Result<(), StoreError>;

    /// Returns the statistics of a user; all zero for unknown users.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError>;

    /// Overwrites the statistics of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn save_user_stats(&self, user_id: i64, stats: &UserStats) -> Result<(), StoreError>;

    /// Remembers the display name a user last joined with.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn save_display_name(&self, user_id: i64, name: &str) -> Result<(), StoreError>;
}

/// A shared store, so several managers can sit on one backend.
impl<S: GameStore + ?Sized> GameStore for Arc<S> {
    fn load_game(&self, game_id: &str) -> Result<Option<String>, StoreError> {
        (**self).load_game(game_id)
    }

    fn save_game(
        &self,
        game_id: &str,
        scope: i64,
        creator_id: i64,
        record: &str,
    ) -> Result<(), StoreError> {
        (**self).save_game(game_id, scope, creator_id, record)
    }

    fn delete_game(&self, game_id: &str) -> Result<(), StoreError> {
        (**self).delete_game(game_id)
    }

    fn games_in_scope(&self, scope: i64) -> Result<Vec<String>, StoreError> {
        (**self).games_in_scope(scope)
    }

    fn user_balance(&self, user_id: i64) -> Result<u64, StoreError> {
        (**self).user_balance(user_id)
    }

    fn save_user_balance(&self, user_id: i64, balance: u64) -> Result<(), StoreError> {
        (**self).save_user_balance(user_id, balance)
    }

    fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError> {
        (**self).user_stats(user_id)
    }

    fn save_user_stats(&self, user_id: i64, stats: &UserStats) -> Result<(), StoreError> {
        (**self).save_user_stats(user_id, stats)
    }

    fn save_display_name(&self, user_id: i64, name: &str) -> Result<(), StoreError> {
        (**self).save_display_name(user_id, name)
    }
}
