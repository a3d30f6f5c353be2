//! Session registry between live games and durable storage.
//!
//! Every cached game sits behind its own lock. An action locks its game,
//! runs on a working copy, persists the copy and only then replaces the live
//! game, so a rejected move or a failed write leaves the table untouched.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::error::{ActionError, ManagerError};
use crate::game::{BetAction, Game};
use crate::options::TableOptions;
use crate::player::Player;
use crate::store::{GameStore, UserProfile};
use crate::sync::{Mutex, shared};

mod cache;

use cache::{Session, SessionCache};

const LOG_TARGET: &str = "twentyone::manager";

/// Number of live games kept in memory by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Creates, caches and persists games, and settles them into the ledger.
///
/// # Example
///
/// ```
/// use twentyone::{GameManager, GameState, MemoryStore, TableOptions};
///
/// let manager = GameManager::new(MemoryStore::new(), TableOptions::default());
/// let game = manager.create_game(1, 0).unwrap();
/// manager.add_player_to_game(&game.game_id, 1, "alice").unwrap();
/// manager.add_player_to_game(&game.game_id, 2, "bob").unwrap();
///
/// let game = manager.start_game(&game.game_id, 1).unwrap();
/// assert_eq!(game.state(), GameState::Betting);
/// ```
#[derive(Debug)]
pub struct GameManager<S> {
    store: S,
    options: TableOptions,
    sessions: Mutex<SessionCache>,
    rng: Mutex<ChaCha8Rng>,
}

impl<S: GameStore> GameManager<S> {
    /// Creates a manager over `store`, seeded from the operating system.
    ///
    /// New tables use `options`.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn new(store: S, options: TableOptions) -> Self {
        Self::from_rng(store, options, ChaCha8Rng::from_os_rng())
    }

    /// Creates a manager whose game ids and shuffles replay from `seed`.
    ///
    /// Ids that already exist in the store are skipped, so reusing a seed
    /// over the same store never overwrites a game.
    #[must_use]
    pub fn with_seed(store: S, options: TableOptions, seed: u64) -> Self {
        Self::from_rng(store, options, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(store: S, options: TableOptions, rng: ChaCha8Rng) -> Self {
        Self {
            store,
            options,
            sessions: Mutex::new(SessionCache::new(DEFAULT_CACHE_CAPACITY)),
            rng: Mutex::new(rng),
        }
    }

    /// Sets how many games stay live in memory.
    ///
    /// Evicted games are reloaded from the store on their next use.
    #[must_use]
    pub fn with_cache_capacity(self, capacity: usize) -> Self {
        Self {
            sessions: Mutex::new(SessionCache::new(capacity)),
            ..self
        }
    }

    /// Returns the persistence backend.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the options new tables are created with.
    #[must_use]
    pub const fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Returns the number of games currently live in memory.
    #[must_use]
    pub fn cached_games(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Draws a game id unused in the store, and the seed for that game.
    fn next_identity(&self) -> Result<(String, u64), ManagerError> {
        loop {
            let (game_id, seed) = {
                let mut rng = self.rng.lock();
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                let game_id = uuid::Builder::from_random_bytes(bytes)
                    .into_uuid()
                    .to_string();
                (game_id, rng.next_u64())
            };

            if self.store.load_game(&game_id)?.is_none() {
                return Ok((game_id, seed));
            }
            warn!(target: LOG_TARGET, game_id, "game id already taken");
        }
    }

    /// Creates an empty table, persists it and keeps it live.
    ///
    /// # Errors
    ///
    /// Returns an error if the game cannot be persisted.
    pub fn create_game(&self, creator_id: i64, scope: i64) -> Result<Game, ManagerError> {
        let (game_id, seed) = self.next_identity()?;
        let game = Game::new(game_id, creator_id, scope, self.options, seed);

        self.persist(&game)?;
        self.admit(game.clone());

        info!(
            target: LOG_TARGET,
            game_id = %game.game_id,
            creator_id,
            scope,
            "game created"
        );
        Ok(game)
    }

    /// Returns a snapshot of a game, loading it from the store if it is not
    /// live.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the record cannot be decoded.
    pub fn get_game(&self, game_id: &str) -> Result<Option<Game>, ManagerError> {
        match self.with_game(game_id, |game| Ok(game.clone())) {
            Ok(game) => Ok(Some(game)),
            Err(ManagerError::GameNotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Seats a user at a waiting table with their persisted balance.
    ///
    /// The display name is remembered on a best-effort basis; failing to
    /// store it does not undo the seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the seat is refused, or the
    /// store fails.
    pub fn add_player_to_game(
        &self,
        game_id: &str,
        user_id: i64,
        name: &str,
    ) -> Result<Game, ManagerError> {
        let balance = self.store.user_balance(user_id)?;
        let game = self.mutate(game_id, |game| game.add_player(user_id, name, balance))?;
        self.remember_name(user_id, name);
        Ok(game)
    }

    /// Starts the betting phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the start is refused, or the
    /// store fails.
    pub fn start_game(&self, game_id: &str, caller_id: i64) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.start_game(caller_id))
    }

    /// Stakes an exact amount for the current bettor and passes the turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the stake is refused, or the
    /// store fails.
    pub fn place_bet(
        &self,
        game_id: &str,
        user_id: i64,
        amount: u64,
    ) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.place_bet(user_id, amount))
    }

    /// Applies a betting-phase action for the current bettor.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the action is refused, or
    /// the store fails.
    pub fn bet(
        &self,
        game_id: &str,
        user_id: i64,
        action: BetAction,
    ) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.bet(user_id, action))
    }

    /// Draws a card for the current player.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the move is refused, or the
    /// store fails.
    pub fn hit(&self, game_id: &str, user_id: i64) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.hit(user_id).map(|_| ()))
    }

    /// Ends the current player's turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the move is refused, or the
    /// store fails.
    pub fn stand(&self, game_id: &str, user_id: i64) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.stand(user_id))
    }

    /// Doubles the current player's stake and draws their last card.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing, the move is refused, or the
    /// store fails.
    pub fn double(&self, game_id: &str, user_id: i64) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.double(user_id).map(|_| ()))
    }

    /// Writes a finished game's balances and statistics to the ledger.
    ///
    /// Actions that finish a game already do this; calling it again is a
    /// no-op once the settlement is recorded. Seats written by an earlier,
    /// interrupted attempt are not written again.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing or not finished, or the store
    /// fails.
    pub fn apply_settlement(&self, game_id: &str) -> Result<Game, ManagerError> {
        self.with_game(game_id, |live| {
            if !live.is_finished() {
                return Err(ActionError::InvalidState.into());
            }
            if !live.settlement_recorded() {
                self.record_settlement(live)?;
            }
            Ok(live.clone())
        })
    }

    /// Opens a new table in the finished game's scope with the caller seated
    /// at their current balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing or not finished, the caller
    /// cannot be seated, or the store fails.
    pub fn rematch(&self, game_id: &str, caller_id: i64, name: &str) -> Result<Game, ManagerError> {
        let mut game = self.with_game(game_id, |previous| {
            if previous.is_finished() && !previous.settlement_recorded() {
                self.record_settlement(previous)?;
            }
            if !previous.is_finished() {
                return Err(ActionError::InvalidState.into());
            }
            let (next_id, seed) = self.next_identity()?;
            Ok(previous.rematch(next_id, caller_id, seed)?)
        })?;

        let balance = self.store.user_balance(caller_id)?;
        game.add_player(caller_id, name, balance)?;
        self.persist(&game)?;
        self.admit(game.clone());
        self.remember_name(caller_id, name);

        info!(
            target: LOG_TARGET,
            game_id = %game.game_id,
            previous = game_id,
            caller_id,
            "rematch created"
        );
        Ok(game)
    }

    /// Binds an unbound table to a chat scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing or already bound, or the store
    /// fails.
    pub fn bind_scope(&self, game_id: &str, scope: i64) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| game.bind_scope(scope))
    }

    /// Records the message that renders this table.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is missing or the store fails.
    pub fn set_message_ref(&self, game_id: &str, message_ref: i64) -> Result<Game, ManagerError> {
        self.mutate(game_id, |game| {
            game.message_ref = Some(message_ref);
            Ok(())
        })
    }

    /// Lists the ids of every persisted game in a chat scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn games_in_scope(&self, scope: i64) -> Result<Vec<String>, ManagerError> {
        Ok(self.store.games_in_scope(scope)?)
    }

    /// Removes a game from the store and from memory.
    ///
    /// Waits for any action in flight on the game; actions queued behind the
    /// delete see the game as missing. Deleting a missing game succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails; the live game is kept in that
    /// case.
    pub fn delete_game(&self, game_id: &str) -> Result<(), ManagerError> {
        let session = match self.session(game_id) {
            Ok(session) => session,
            Err(ManagerError::GameNotFound(_)) => return Ok(()),
            Err(ManagerError::Corrupt { .. }) => {
                self.store.delete_game(game_id)?;
                info!(target: LOG_TARGET, game_id, "corrupt game deleted");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let mut live = session.lock();
        if live.is_some() {
            self.store.delete_game(game_id)?;
            *live = None;
        }
        self.sessions.lock().remove(game_id);
        drop(live);

        info!(target: LOG_TARGET, game_id, "game deleted");
        Ok(())
    }

    /// Reads a user's persisted balance and statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn user_profile(&self, user_id: i64) -> Result<UserProfile, ManagerError> {
        Ok(UserProfile {
            user_id,
            balance: self.store.user_balance(user_id)?,
            stats: self.store.user_stats(user_id)?,
        })
    }

    /// Resolves a live game, rehydrating it from the store on a cache miss.
    ///
    /// The cache stays locked across the load so a game is never rehydrated
    /// twice.
    fn session(&self, game_id: &str) -> Result<Session, ManagerError> {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get(game_id) {
            return Ok(session);
        }

        let record = self
            .store
            .load_game(game_id)?
            .ok_or_else(|| ManagerError::GameNotFound(game_id.to_string()))?;
        let game: Game = serde_json::from_str(&record).map_err(|err| {
            warn!(target: LOG_TARGET, game_id, error = %err, "undecodable game record");
            ManagerError::Corrupt {
                id: game_id.to_string(),
                reason: err.to_string(),
            }
        })?;

        let session = shared(Some(game));
        if let Some(evicted) = sessions.insert(game_id.to_string(), session.clone()) {
            debug!(target: LOG_TARGET, game_id = %evicted, "game evicted");
        }
        debug!(target: LOG_TARGET, game_id, "game rehydrated");
        Ok(session)
    }

    /// Locks a live game and runs `f` on it.
    fn with_game<T, F>(&self, game_id: &str, f: F) -> Result<T, ManagerError>
    where
        F: FnOnce(&mut Game) -> Result<T, ManagerError>,
    {
        let session = self.session(game_id)?;
        let mut live = session.lock();
        let game = live
            .as_mut()
            .ok_or_else(|| ManagerError::GameNotFound(game_id.to_string()))?;
        f(game)
    }

    fn admit(&self, game: Game) {
        let game_id = game.game_id.clone();
        if let Some(evicted) = self.sessions.lock().insert(game_id, shared(Some(game))) {
            debug!(target: LOG_TARGET, game_id = %evicted, "game evicted");
        }
    }

    fn remember_name(&self, user_id: i64, name: &str) {
        if let Err(err) = self.store.save_display_name(user_id, name) {
            warn!(target: LOG_TARGET, user_id, error = %err, "display name not saved");
        }
    }

    /// Runs `action` on a working copy and commits it once persisted.
    ///
    /// A game finished by the action is settled into the ledger. A ledger
    /// failure does not undo the move; the snapshot then reports the
    /// settlement as unrecorded and [`Self::apply_settlement`] retries it.
    fn mutate<F>(&self, game_id: &str, action: F) -> Result<Game, ManagerError>
    where
        F: FnOnce(&mut Game) -> Result<(), ActionError>,
    {
        self.with_game(game_id, |live| {
            let mut working = live.clone();
            if let Err(err) = action(&mut working) {
                if err.is_fatal() {
                    warn!(target: LOG_TARGET, game_id, error = %err, "action aborted");
                } else {
                    debug!(target: LOG_TARGET, game_id, error = %err, "action rejected");
                }
                return Err(err.into());
            }

            self.persist(&working)?;
            *live = working;

            if live.is_finished() && !live.settlement_recorded() {
                if let Err(err) = self.record_settlement(live) {
                    warn!(target: LOG_TARGET, game_id, error = %err, "settlement not recorded");
                }
            }
            Ok(live.clone())
        })
    }

    /// Writes each seat's balance and statistics, marking the seat on the
    /// persisted game as soon as it is written.
    fn record_settlement(&self, live: &mut Game) -> Result<(), ManagerError> {
        let Some(settlement) = live.settlement().cloned() else {
            return Err(ActionError::InvalidState.into());
        };

        for result in &settlement.players {
            if live.seat_recorded(result.user_id) {
                continue;
            }
            let Some(balance) = live.player(result.user_id).map(Player::balance) else {
                continue;
            };

            self.store.save_user_balance(result.user_id, balance)?;
            let mut stats = self.store.user_stats(result.user_id)?;
            stats.record(result.outcome, result.bet);
            self.store.save_user_stats(result.user_id, &stats)?;

            let mut working = live.clone();
            working.mark_seat_recorded(result.user_id);
            self.persist(&working)?;
            *live = working;
        }

        let mut working = live.clone();
        working.mark_settlement_recorded();
        self.persist(&working)?;
        *live = working;

        info!(
            target: LOG_TARGET,
            game_id = %live.game_id,
            players = live.players().len(),
            "settlement recorded"
        );
        Ok(())
    }

    fn persist(&self, game: &Game) -> Result<(), ManagerError> {
        let record = serde_json::to_string(game).map_err(|err| ManagerError::Corrupt {
            id: game.game_id.clone(),
            reason: err.to_string(),
        })?;

        self.store
            .save_game(&game.game_id, game.scope, game.creator_id, &record)
            .map_err(|err| {
                warn!(target: LOG_TARGET, game_id = %game.game_id, error = %err, "persist failed");
                err.into()
            })
    }
}
