use tracing::debug;

use crate::deck::Deck;
use crate::error::{ActionError, DeckExhausted};
use crate::player::{MIN_BET, Player};

use super::state::BetAction;
use super::{DEAL_STREAM, Game, GameState, LOG_TARGET};

/// Amount added or removed by a single stake step.
pub const BET_STEP: u64 = 10;

impl Game {
    fn ensure_betting_turn(&self, user_id: i64) -> Result<usize, ActionError> {
        if self.state != GameState::Betting {
            return Err(ActionError::InvalidState);
        }

        match self.current_bettor() {
            Some(player) if player.user_id == user_id => Ok(self.current_betting_player_index),
            _ if self.player(user_id).is_none() => Err(ActionError::PlayerNotFound),
            _ => Err(ActionError::NotYourTurn),
        }
    }

    /// Revises the current bettor's stake, or passes the turn with
    /// [`BetAction::Push`].
    ///
    /// Lowering actions never go below the minimum stake and always succeed.
    /// When the last player pushes, the cards are dealt.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not betting, it is not this player's
    /// turn, or the player cannot afford the raised stake.
    pub fn bet(&mut self, user_id: i64, action: BetAction) -> Result<(), ActionError> {
        let index = self.ensure_betting_turn(user_id)?;

        let bet = self.players[index].bet();
        let amount = match action {
            BetAction::Push => return self.advance_betting(),
            BetAction::Double => bet * 2,
            BetAction::PlusTen => bet + BET_STEP,
            BetAction::MinusTen => bet.saturating_sub(BET_STEP).max(MIN_BET),
            BetAction::Half => (bet / 2).max(MIN_BET),
        };
        self.players[index].adjust_bet(amount)?;

        debug!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            user_id,
            ?action,
            bet = amount,
            "stake revised"
        );
        Ok(())
    }

    /// Sets the current bettor's stake to `amount` and passes the turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not betting, it is not this player's
    /// turn, or the amount is below the minimum or above what the player
    /// holds (balance plus current stake).
    pub fn place_bet(&mut self, user_id: i64, amount: u64) -> Result<(), ActionError> {
        let index = self.ensure_betting_turn(user_id)?;

        let mut staked = self.players[index].clone();
        staked.adjust_bet(amount)?;

        // Commit the stake only once the turn can move on.
        let previous = core::mem::replace(&mut self.players[index], staked);
        if let Err(err) = self.advance_betting() {
            self.players[index] = previous;
            return Err(err);
        }
        Ok(())
    }

    fn advance_betting(&mut self) -> Result<(), ActionError> {
        if self.current_betting_player_index + 1 >= self.players.len() {
            let deck = Self::fresh_deck(self.seed, DEAL_STREAM);
            self.deal_from(deck)?;
        }
        self.current_betting_player_index += 1;
        Ok(())
    }

    /// Deals two cards to every player, round-robin, then two to the dealer.
    pub(super) fn deal_from(&mut self, deck: Deck) -> Result<(), ActionError> {
        let cards_needed = (self.players.len() + 1) * 2;
        if deck.len() < cards_needed {
            return Err(DeckExhausted.into());
        }

        self.deck = deck;
        for player in &mut self.players {
            player.reset_round();
        }
        self.dealer = Player::dealer();

        for _ in 0..2 {
            for player in &mut self.players {
                player.add_card(self.deck.draw()?);
            }
        }
        for _ in 0..2 {
            self.dealer.add_card(self.deck.draw()?);
        }

        self.current_player_index = 0;
        self.state = GameState::Playing;

        debug!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            players = self.players.len(),
            remaining = self.deck.len(),
            "cards dealt"
        );
        Ok(())
    }
}
