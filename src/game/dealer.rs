extern crate alloc;

use alloc::vec::Vec;

use tracing::info;

use crate::error::ActionError;
use crate::hand;
use crate::options::DEALER_STANDS_ON;
use crate::player::PlayerStatus;
use crate::result::{Outcome, PlayerResult, Settlement};

use super::{Game, GameState, LOG_TARGET};

impl Game {
    /// Dealer draws to 17 or more, then the game settles.
    ///
    /// Soft 17 stands.
    pub(super) fn dealer_play(&mut self) -> Result<(), ActionError> {
        while self.dealer.score() < DEALER_STANDS_ON {
            let card = self.deck.draw()?;
            self.dealer.add_card(card);
        }

        self.settle();
        self.state = GameState::Finished;
        Ok(())
    }

    /// Scores every seat against the dealer and pays out.
    ///
    /// Winners get back twice their stake plus a flat bonus taken from the
    /// losing stakes; every winner receives the full bonus. Ties get their
    /// stake back.
    fn settle(&mut self) {
        let dealer_score = self.dealer.score();
        let dealer_bust = hand::is_bust(dealer_score);

        let outcomes: Vec<Outcome> = self
            .players
            .iter()
            .map(|player| {
                let score = player.score();
                if hand::is_bust(score) {
                    Outcome::Lose
                } else if dealer_bust || score > dealer_score {
                    Outcome::Win
                } else if score == dealer_score {
                    Outcome::Tie
                } else {
                    Outcome::Lose
                }
            })
            .collect();

        let losing_pool: u64 = self
            .players
            .iter()
            .zip(&outcomes)
            .filter(|(_, outcome)| **outcome == Outcome::Lose)
            .map(|(player, _)| player.bet())
            .sum();
        let winner_bonus = self.options.winner_bonus(losing_pool);

        let mut results = Vec::with_capacity(self.players.len());
        for (player, outcome) in self.players.iter_mut().zip(outcomes) {
            let bet = player.bet();
            let (status, payout) = match outcome {
                Outcome::Win => (PlayerStatus::Win, bet * 2 + winner_bonus),
                Outcome::Tie => (PlayerStatus::Tie, bet),
                Outcome::Lose => (PlayerStatus::Lose, 0),
            };

            player.status = status;
            player.add_winnings(payout);

            results.push(PlayerResult {
                user_id: player.user_id,
                outcome,
                bet,
                payout,
                score: player.score(),
            });
        }

        let settlement = Settlement {
            players: results,
            dealer_score,
            dealer_bust,
            losing_pool,
            winner_bonus,
        };

        info!(
            target: LOG_TARGET,
            game_id = %self.game_id,
            dealer_score,
            winners = settlement.winners().count(),
            paid = settlement.total_payout(),
            staked = settlement.total_staked(),
            "game settled"
        );

        self.settlement = Some(settlement);
    }
}
