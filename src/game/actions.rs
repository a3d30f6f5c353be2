use tracing::debug;

use crate::card::Card;
use crate::error::{ActionError, DeckExhausted};
use crate::player::PlayerStatus;

use super::{Game, GameState, LOG_TARGET};

impl Game {
    fn ensure_player_turn(&self, user_id: i64) -> Result<usize, ActionError> {
        if self.state != GameState::Playing {
            return Err(ActionError::InvalidState);
        }

        match self.current_player() {
            Some(player) if player.user_id == user_id => Ok(self.current_player_index),
            _ if self.player(user_id).is_none() => Err(ActionError::PlayerNotFound),
            _ => Err(ActionError::NotYourTurn),
        }
    }

    /// Passes the turn; after the last player the dealer plays.
    fn advance_player(&mut self) -> Result<(), ActionError> {
        self.current_player_index += 1;
        if self.current_player_index >= self.players.len() {
            self.dealer_play()?;
        }
        Ok(())
    }

    /// Player action: Hit (draw a card).
    ///
    /// A bust ends the player's turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not playing, it is not the player's
    /// turn, or the deck is exhausted.
    pub fn hit(&mut self, user_id: i64) -> Result<Card, ActionError> {
        let index = self.ensure_player_turn(user_id)?;

        let card = self.deck.draw()?;
        let player = &mut self.players[index];
        player.mark_drawn();
        player.add_card(card);

        let status = player.status;
        debug!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            user_id,
            %card,
            score = player.score(),
            "hit"
        );

        if status == PlayerStatus::Bust {
            self.advance_player()?;
        }

        Ok(card)
    }

    /// Player action: Stand (keep current hand).
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not playing or it is not the player's
    /// turn.
    pub fn stand(&mut self, user_id: i64) -> Result<(), ActionError> {
        let index = self.ensure_player_turn(user_id)?;

        self.players[index].status = PlayerStatus::Stand;
        debug!(target: LOG_TARGET, game_id = %self.game_id, user_id, "stand");

        self.advance_player()
    }

    /// Player action: Double (double the stake, take exactly one card, stand).
    ///
    /// The turn always ends, even if the card busts the hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is not playing, it is not the player's
    /// turn, the player already drew this round, the balance cannot cover the
    /// doubled stake, or the deck is exhausted.
    pub fn double(&mut self, user_id: i64) -> Result<Card, ActionError> {
        let index = self.ensure_player_turn(user_id)?;

        if self.players[index].has_drawn() {
            return Err(ActionError::AlreadyDrawn);
        }
        if self.deck.is_empty() {
            return Err(DeckExhausted.into());
        }

        let player = &mut self.players[index];
        player.adjust_bet(player.bet() * 2)?;
        let card = self.deck.draw()?;
        player.mark_drawn();
        player.add_card(card);
        player.status = PlayerStatus::Stand;

        debug!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            user_id,
            %card,
            bet = player.bet(),
            score = player.score(),
            "double"
        );

        self.advance_player()?;
        Ok(card)
    }
}
