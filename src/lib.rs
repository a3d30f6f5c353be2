//! A multiplayer twenty-one table engine with optional `no_std` support.
//!
//! The crate provides a [`Game`] type that runs the round flow (seating,
//! betting turns, hit/stand/double, dealer play and settlement) and a
//! [`GameManager`] that keeps live games behind per-game locks, persists them
//! through a [`GameStore`] and writes settled balances and statistics back to
//! the ledger.
//!
//! # Example
//!
//! ```
//! use twentyone::{BetAction, GameManager, GameState, MemoryStore, TableOptions};
//!
//! let manager = GameManager::new(MemoryStore::new(), TableOptions::default());
//! let game = manager.create_game(1, 0).unwrap();
//! let id = game.game_id.clone();
//!
//! manager.add_player_to_game(&id, 1, "alice").unwrap();
//! manager.add_player_to_game(&id, 2, "bob").unwrap();
//! manager.start_game(&id, 1).unwrap();
//! manager.bet(&id, 1, BetAction::Push).unwrap();
//! let game = manager.bet(&id, 2, BetAction::Push).unwrap();
//!
//! assert_eq!(game.state(), GameState::Playing);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod manager;
pub mod options;
pub mod player;
pub mod result;
pub mod store;
mod sync;

// Re-export main types
pub use card::{Card, DECK_SIZE, Suit};
pub use deck::Deck;
pub use error::{ActionError, BetError, DeckExhausted, ManagerError, StoreError};
pub use game::{BET_STEP, BetAction, Game, GameState, MIN_PLAYERS};
pub use manager::{DEFAULT_CACHE_CAPACITY, GameManager};
pub use options::{
    DEALER_STANDS_ON, DECK_SAFE_MAX_PLAYERS, MAX_WINNER_BONUS_PERCENT, TableOptions,
};
pub use player::{DEALER_ID, MIN_BET, Player, PlayerStatus};
pub use result::{Outcome, PlayerResult, Settlement};
pub use store::{DEFAULT_BALANCE, GameStore, MemoryStore, UserProfile, UserStats};
