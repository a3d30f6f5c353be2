extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(all(not(feature = "std"), feature = "alloc"))]
use hashbrown::HashMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::error::StoreError;
use crate::sync::Mutex;

use super::{DEFAULT_BALANCE, GameStore, UserStats};

#[derive(Debug, Clone)]
struct GameRecord {
    scope: i64,
    record: String,
}

/// In-process [`GameStore`] backed by hash maps.
///
/// Suitable for embedding and tests; nothing survives the process.
///
/// ```
/// use twentyone::{GameStore, MemoryStore};
///
/// let store = MemoryStore::new().with_starting_balance(500);
/// assert_eq!(store.user_balance(1).unwrap(), 500);
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    starting_balance: u64,
    games: Mutex<HashMap<String, GameRecord>>,
    balances: Mutex<HashMap<i64, u64>>,
    stats: Mutex<HashMap<i64, UserStats>>,
    names: Mutex<HashMap<i64, String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store granting [`DEFAULT_BALANCE`] to new users.
    #[must_use]
    pub fn new() -> Self {
        Self {
            starting_balance: DEFAULT_BALANCE,
            games: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            stats: Mutex::new(HashMap::new()),
            names: Mutex::new(HashMap::new()),
        }
    }

    /// Sets the balance granted to users on first access.
    #[must_use]
    pub const fn with_starting_balance(mut self, balance: u64) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Returns the number of stored game records.
    #[must_use]
    pub fn game_count(&self) -> usize {
        self.games.lock().len()
    }

    /// Returns the display name a user last joined with.
    #[must_use]
    pub fn display_name(&self, user_id: i64) -> Option<String> {
        self.names.lock().get(&user_id).cloned()
    }
}

impl GameStore for MemoryStore {
    fn load_game(&self, game_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .games
            .lock()
            .get(game_id)
            .map(|game| game.record.clone()))
    }

    fn save_game(
        &self,
        game_id: &str,
        scope: i64,
        _creator_id: i64,
        record: &str,
    ) -> Result<(), StoreError> {
        self.games.lock().insert(
            game_id.to_string(),
            GameRecord {
                scope,
                record: record.to_string(),
            },
        );
        Ok(())
    }

    fn delete_game(&self, game_id: &str) -> Result<(), StoreError> {
        self.games.lock().remove(game_id);
        Ok(())
    }

    fn games_in_scope(&self, scope: i64) -> Result<Vec<String>, StoreError> {
        let mut ids: Vec<String> = self
            .games
            .lock()
            .iter()
            .filter(|(_, game)| game.scope == scope)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn user_balance(&self, user_id: i64) -> Result<u64, StoreError> {
        Ok(*self
            .balances
            .lock()
            .entry(user_id)
            .or_insert(self.starting_balance))
    }

    fn save_user_balance(&self, user_id: i64, balance: u64) -> Result<(), StoreError> {
        self.balances.lock().insert(user_id, balance);
        Ok(())
    }

    fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError> {
        Ok(self
            .stats
            .lock()
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }

    fn save_user_stats(&self, user_id: i64, stats: &UserStats) -> Result<(), StoreError> {
        self.stats.lock().insert(user_id, *stats);
        Ok(())
    }

    fn save_display_name(&self, user_id: i64, name: &str) -> Result<(), StoreError> {
        self.names.lock().insert(user_id, name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_balance_access_opens_account() {
        let store = MemoryStore::new();
        assert_eq!(store.user_balance(7).unwrap(), DEFAULT_BALANCE);

        store.save_user_balance(7, 35).unwrap();
        assert_eq!(store.user_balance(7).unwrap(), 35);
    }

    #[test]
    fn scope_listing_filters_and_sorts() {
        let store = MemoryStore::new();
        store.save_game("b", 5, 1, "{}").unwrap();
        store.save_game("a", 5, 1, "{}").unwrap();
        store.save_game("c", 6, 1, "{}").unwrap();

        assert_eq!(store.games_in_scope(5).unwrap(), ["a", "b"]);
        store.delete_game("a").unwrap();
        store.delete_game("missing").unwrap();
        assert_eq!(store.games_in_scope(5).unwrap(), ["b"]);
        assert_eq!(store.game_count(), 2);
    }

    #[test]
    fn unknown_user_has_empty_stats() {
        let store = MemoryStore::new();
        assert_eq!(store.user_stats(3).unwrap(), UserStats::default());
    }
}
