//! Table configuration options.

use serde::{Deserialize, Serialize};

/// Largest roster a single 52-card deck can always serve.
///
/// A hand that keeps drawing is at most hard 21 before its last card, so a
/// player holds at most 31 hard points and the dealer (who stops at 17) at
/// most 26. Ten players and the dealer use at most 336 of the deck's 340
/// hard points, so the deck cannot run out.
pub const DECK_SAFE_MAX_PLAYERS: usize = 10;

/// Score the dealer stands on, soft totals included.
pub const DEALER_STANDS_ON: u8 = 17;

/// Largest share of the losing stakes a winner can receive, in percent.
pub const MAX_WINNER_BONUS_PERCENT: u64 = 100;

/// Configuration options for a table.
///
/// Options travel with the game record, so a persisted game keeps the rules
/// it was created with. Use the builder pattern to customize options:
///
/// ```
/// use twentyone::TableOptions;
///
/// let options = TableOptions::default()
///     .with_max_players(6)
///     .with_winner_bonus_percent(10);
/// assert_eq!(options.max_players(), 6);
/// ```
///
/// The getters clamp as well, so a record decoded from storage cannot lift
/// the roster past [`DECK_SAFE_MAX_PLAYERS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableOptions {
    max_players: usize,
    winner_bonus_percent: u64,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            max_players: DECK_SAFE_MAX_PLAYERS,
            winner_bonus_percent: 20,
        }
    }
}

impl TableOptions {
    /// Sets the roster cap.
    ///
    /// Values above [`DECK_SAFE_MAX_PLAYERS`] are clamped to it.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::{TableOptions, DECK_SAFE_MAX_PLAYERS};
    ///
    /// let options = TableOptions::default().with_max_players(71);
    /// assert_eq!(options.max_players(), DECK_SAFE_MAX_PLAYERS);
    /// ```
    #[must_use]
    pub const fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self.max_players = self.max_players();
        self
    }

    /// Sets the winner bonus, in percent of the losing stakes.
    ///
    /// Values above [`MAX_WINNER_BONUS_PERCENT`] are clamped to it.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::TableOptions;
    ///
    /// let options = TableOptions::default().with_winner_bonus_percent(0);
    /// assert_eq!(options.winner_bonus_percent(), 0);
    /// ```
    #[must_use]
    pub const fn with_winner_bonus_percent(mut self, percent: u64) -> Self {
        self.winner_bonus_percent = percent;
        self.winner_bonus_percent = self.winner_bonus_percent();
        self
    }

    /// Returns the roster cap.
    #[must_use]
    pub const fn max_players(&self) -> usize {
        if self.max_players > DECK_SAFE_MAX_PLAYERS {
            DECK_SAFE_MAX_PLAYERS
        } else {
            self.max_players
        }
    }

    /// Returns the winner bonus, in percent of the losing stakes.
    #[must_use]
    pub const fn winner_bonus_percent(&self) -> u64 {
        if self.winner_bonus_percent > MAX_WINNER_BONUS_PERCENT {
            MAX_WINNER_BONUS_PERCENT
        } else {
            self.winner_bonus_percent
        }
    }

    /// Returns the bonus each winner receives from `losing_pool`.
    ///
    /// ```
    /// use twentyone::TableOptions;
    ///
    /// assert_eq!(TableOptions::default().winner_bonus(55), 11);
    /// assert_eq!(TableOptions::default().winner_bonus(4), 0);
    /// ```
    #[must_use]
    pub const fn winner_bonus(&self, losing_pool: u64) -> u64 {
        losing_pool.saturating_mul(self.winner_bonus_percent()) / 100
    }
}
