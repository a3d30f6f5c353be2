//! Game engine and state management.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::deck::Deck;
use crate::error::{ActionError, BetError};
use crate::options::TableOptions;
use crate::player::{MIN_BET, Player};
use crate::result::Settlement;

mod actions;
mod bet;
mod dealer;
pub mod state;
#[cfg(test)]
mod tests;

pub use bet::BET_STEP;
pub use state::{BetAction, GameState};

const LOG_TARGET: &str = "twentyone::game";

// Shuffle streams of the game seed: one for the table's opening deck, one
// for the deck the hands are dealt from.
const TABLE_STREAM: u64 = 0;
const DEAL_STREAM: u64 = 1;

/// Minimum number of players needed to start.
pub const MIN_PLAYERS: usize = 2;

/// A twenty-one table: roster, dealer, deck and turn pointers.
///
/// Every mutating method validates before touching any field, so a rejected
/// move leaves the game exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique game id.
    pub game_id: String,
    /// Chat scope the table lives in (0 while unbound).
    pub scope: i64,
    /// User who created the table.
    pub creator_id: i64,
    /// Reference to the message rendering this table, if any.
    pub message_ref: Option<i64>,
    /// Table rules.
    pub options: TableOptions,
    players: Vec<Player>,
    dealer: Player,
    deck: Deck,
    state: GameState,
    current_player_index: usize,
    current_betting_player_index: usize,
    seed: u64,
    settlement: Option<Settlement>,
    #[serde(default)]
    ledger_seats: Vec<i64>,
    settlement_recorded: bool,
}

impl Game {
    /// Creates an empty table in the [`GameState::Waiting`] state.
    ///
    /// The seed drives every shuffle of this game.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::{Game, GameState, TableOptions};
    ///
    /// let game = Game::new("table-1", 7, 0, TableOptions::default(), 42);
    /// assert_eq!(game.state(), GameState::Waiting);
    /// assert_eq!(game.cards_remaining(), 52);
    /// ```
    #[must_use]
    pub fn new(
        game_id: impl Into<String>,
        creator_id: i64,
        scope: i64,
        options: TableOptions,
        seed: u64,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            scope,
            creator_id,
            message_ref: None,
            options,
            players: Vec::new(),
            dealer: Player::dealer(),
            deck: Self::fresh_deck(seed, TABLE_STREAM),
            state: GameState::Waiting,
            current_player_index: 0,
            current_betting_player_index: 0,
            seed,
            settlement: None,
            ledger_seats: Vec::new(),
            settlement_recorded: false,
        }
    }

    fn fresh_deck(seed: u64, stream: u64) -> Deck {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Deck::shuffled(&mut rng)
    }

    /// Seats a player with the given balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not waiting for players, the roster is
    /// full, the user already joined, or the balance cannot cover the
    /// minimum stake.
    pub fn add_player(
        &mut self,
        user_id: i64,
        name: impl Into<String>,
        balance: u64,
    ) -> Result<(), ActionError> {
        if self.state != GameState::Waiting {
            return Err(ActionError::InvalidState);
        }
        if self.players.len() >= self.options.max_players() {
            return Err(ActionError::TableFull);
        }
        if self.player(user_id).is_some() {
            return Err(ActionError::AlreadyJoined);
        }
        if balance < MIN_BET {
            return Err(BetError::InsufficientFunds.into());
        }

        self.players.push(Player::new(user_id, name, balance));
        debug!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            user_id,
            seated = self.players.len(),
            "player joined"
        );
        Ok(())
    }

    /// Starts the betting phase.
    ///
    /// Only the creator may start, and only once at least two players are
    /// seated with the creator in the first seat. Every player is staked at
    /// the minimum bet.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not waiting, the caller is not the
    /// creator, or there are too few players.
    pub fn start_game(&mut self, caller_id: i64) -> Result<(), ActionError> {
        if self.state != GameState::Waiting {
            return Err(ActionError::InvalidState);
        }
        if caller_id != self.creator_id {
            return Err(ActionError::NotCreator);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(ActionError::NotEnoughPlayers);
        }
        if self.players[0].user_id != self.creator_id {
            return Err(ActionError::NotCreator);
        }
        if self
            .players
            .iter()
            .any(|p| p.balance() + p.bet() < MIN_BET)
        {
            return Err(BetError::InsufficientFunds.into());
        }

        for player in &mut self.players {
            player.adjust_bet(MIN_BET)?;
        }
        self.current_betting_player_index = 0;
        self.state = GameState::Betting;

        debug!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            players = self.players.len(),
            "betting started"
        );
        Ok(())
    }

    /// Binds an unbound table to a chat scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is already bound.
    pub const fn bind_scope(&mut self, scope: i64) -> Result<(), ActionError> {
        if self.scope != 0 {
            return Err(ActionError::InvalidState);
        }
        self.scope = scope;
        Ok(())
    }

    /// Creates the follow-up table for a finished game.
    ///
    /// The new game keeps the scope and rules but starts empty; balances are
    /// carried by the ledger, not by this game.
    ///
    /// # Errors
    ///
    /// Returns an error if this game has not finished.
    pub fn rematch(
        &self,
        game_id: impl Into<String>,
        creator_id: i64,
        seed: u64,
    ) -> Result<Self, ActionError> {
        if self.state != GameState::Finished {
            return Err(ActionError::InvalidState);
        }
        Ok(Self::new(game_id, creator_id, self.scope, self.options, seed))
    }

    /// Returns the current game state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Returns whether the game has been settled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == GameState::Finished
    }

    /// Returns the seated players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the seated player with this user id.
    #[must_use]
    pub fn player(&self, user_id: i64) -> Option<&Player> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    /// Returns the dealer.
    #[must_use]
    pub const fn dealer(&self) -> &Player {
        &self.dealer
    }

    /// Returns the number of cards left in the deck.
    ///
    /// The order of the deck and the seed behind it are never exposed.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Returns the index of the player to act while playing.
    #[must_use]
    pub const fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    /// Returns the index of the player to bet while betting.
    #[must_use]
    pub const fn current_betting_player_index(&self) -> usize {
        self.current_betting_player_index
    }

    /// Returns the player whose turn it is to act.
    ///
    /// Returns `None` outside the playing phase.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        if self.state != GameState::Playing {
            return None;
        }
        debug_assert!(self.current_player_index < self.players.len());
        self.players.get(self.current_player_index)
    }

    /// Returns the player whose turn it is to bet.
    ///
    /// Returns `None` outside the betting phase.
    #[must_use]
    pub fn current_bettor(&self) -> Option<&Player> {
        if self.state != GameState::Betting {
            return None;
        }
        debug_assert!(self.current_betting_player_index < self.players.len());
        self.players.get(self.current_betting_player_index)
    }

    /// Returns the settlement once the game has finished.
    #[must_use]
    pub const fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Returns whether the settlement was written to the ledger.
    #[must_use]
    pub const fn settlement_recorded(&self) -> bool {
        self.settlement_recorded
    }

    /// Returns whether this seat's result was already written to the ledger.
    #[must_use]
    pub fn seat_recorded(&self, user_id: i64) -> bool {
        self.ledger_seats.contains(&user_id)
    }

    pub(crate) fn mark_seat_recorded(&mut self, user_id: i64) {
        if !self.seat_recorded(user_id) {
            self.ledger_seats.push(user_id);
        }
    }

    pub(crate) const fn mark_settlement_recorded(&mut self) {
        self.settlement_recorded = true;
    }
}
