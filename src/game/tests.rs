extern crate alloc;

use alloc::vec::Vec;

use super::*;
use crate::card::{Card, Suit};
use crate::error::DeckExhausted;
use crate::player::PlayerStatus;
use crate::result::Outcome;

const fn c(rank: u8) -> Card {
    Card::new(Suit::Spades, rank)
}

/// Builds a deck whose cards come out in the given order.
fn draws(cards: &[u8]) -> Deck {
    let mut deck: Vec<Card> = cards.iter().map(|&rank| c(rank)).collect();
    deck.reverse();
    Deck::from_cards(deck)
}

fn seated(balances: &[u64]) -> Game {
    let mut game = Game::new("g-1", 1, 0, TableOptions::default(), 9);
    for (i, &balance) in balances.iter().enumerate() {
        let id = i as i64 + 1;
        game.add_player(id, alloc::format!("p{id}"), balance).unwrap();
    }
    game.start_game(1).unwrap();
    game
}

fn dealt(balances: &[u64], order: &[u8]) -> Game {
    let mut game = seated(balances);
    game.current_betting_player_index = balances.len();
    game.deal_from(draws(order)).unwrap();
    game
}

#[test]
fn two_stand_dealer_nineteen() {
    // p1: K K, p2: 10 8, dealer: 10 9
    let mut game = dealt(&[100, 100], &[13, 10, 13, 8, 10, 9]);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.players()[0].score(), 20);
    assert_eq!(game.players()[1].score(), 18);
    assert_eq!(game.dealer().score(), 19);

    game.stand(1).unwrap();
    assert_eq!(game.current_player_index(), 1);
    game.stand(2).unwrap();

    assert_eq!(game.state(), GameState::Finished);
    assert_eq!(game.players()[0].status, PlayerStatus::Win);
    assert_eq!(game.players()[1].status, PlayerStatus::Lose);
    assert_eq!(game.players()[0].balance(), 90 + 20 + 2);
    assert_eq!(game.players()[1].balance(), 90);

    let settlement = game.settlement().unwrap();
    assert_eq!(settlement.losing_pool, 10);
    assert_eq!(settlement.winner_bonus, 2);
    assert_eq!(settlement.players[0].payout, 22);
    assert_eq!(settlement.players[0].net(), 12);
    assert_eq!(settlement.players[1].net(), -10);
}

#[test]
fn double_after_hit_is_rejected() {
    let mut game = dealt(&[100, 100], &[2, 10, 3, 10, 10, 7, 4]);

    game.hit(1).unwrap();
    let before = game.clone();

    assert_eq!(game.double(1), Err(ActionError::AlreadyDrawn));
    assert_eq!(game, before);
    assert_eq!(game.players()[0].bet(), 10);
    assert_eq!(game.players()[0].hand().len(), 3);
}

#[test]
fn bust_ends_turn() {
    let mut game = dealt(&[100, 100], &[13, 10, 12, 9, 10, 7, 5]);

    let card = game.hit(1).unwrap();
    assert_eq!(card, c(5));
    assert_eq!(game.players()[0].status, PlayerStatus::Bust);
    assert_eq!(game.current_player_index(), 1);
    assert_eq!(game.current_player().map(|p| p.user_id), Some(2));
}

#[test]
fn hit_below_twenty_one_keeps_turn() {
    let mut game = dealt(&[100, 100], &[2, 10, 3, 10, 10, 7, 4]);

    game.hit(1).unwrap();
    assert_eq!(game.players()[0].score(), 9);
    assert!(game.players()[0].has_drawn());
    assert_eq!(game.current_player_index(), 0);
}

#[test]
fn double_stakes_draws_once_and_stands() {
    let mut game = dealt(&[100, 100], &[5, 10, 6, 9, 10, 7, 10]);

    let card = game.double(1).unwrap();
    assert_eq!(card, c(10));

    let player = &game.players()[0];
    assert_eq!(player.bet(), 20);
    assert_eq!(player.balance(), 80);
    assert_eq!(player.score(), 21);
    assert_eq!(player.status, PlayerStatus::Stand);
    assert_eq!(game.current_player_index(), 1);
}

#[test]
fn double_ends_turn_even_on_bust() {
    let mut game = dealt(&[100, 100], &[10, 10, 6, 9, 10, 7, 10]);

    game.double(1).unwrap();
    assert_eq!(game.players()[0].score(), 26);
    assert_eq!(game.current_player_index(), 1);

    game.stand(2).unwrap();
    assert_eq!(game.players()[0].status, PlayerStatus::Lose);
    assert_eq!(game.players()[0].balance(), 80);
}

#[test]
fn double_without_funds_is_rejected() {
    let mut game = dealt(&[10, 100], &[5, 10, 6, 9, 10, 7, 10]);
    let before = game.clone();

    assert_eq!(
        game.double(1),
        Err(ActionError::Bet(BetError::InsufficientFunds))
    );
    assert_eq!(game, before);
}

#[test]
fn only_current_player_may_act() {
    let mut game = dealt(&[100, 100], &[5, 10, 6, 9, 10, 7, 10]);
    let before = game.clone();

    assert_eq!(game.hit(2), Err(ActionError::NotYourTurn));
    assert_eq!(game.stand(2), Err(ActionError::NotYourTurn));
    assert_eq!(game.double(2), Err(ActionError::NotYourTurn));
    assert_eq!(game.hit(77), Err(ActionError::PlayerNotFound));
    assert_eq!(game.bet(1, BetAction::Push), Err(ActionError::InvalidState));
    assert_eq!(game, before);
}

#[test]
fn dealer_draws_to_seventeen() {
    let mut game = dealt(&[100, 100], &[10, 10, 9, 8, 2, 3, 4, 5, 6]);

    game.stand(1).unwrap();
    game.stand(2).unwrap();

    assert_eq!(game.dealer().hand().len(), 5);
    assert_eq!(game.dealer().score(), 20);
    assert!(game.players().iter().all(|p| p.status == PlayerStatus::Lose));
}

#[test]
fn dealer_stands_on_soft_seventeen() {
    let mut game = dealt(&[100, 100], &[10, 10, 9, 8, 1, 6]);

    game.stand(1).unwrap();
    game.stand(2).unwrap();

    assert_eq!(game.dealer().hand().len(), 2);
    assert_eq!(game.dealer().score(), 17);
    assert!(game.dealer().is_soft());

    let settlement = game.settlement().unwrap();
    assert_eq!(settlement.winner_bonus, 0);
    assert_eq!(game.players()[0].balance(), 110);
    assert_eq!(game.players()[1].balance(), 110);
}

#[test]
fn dealer_bust_pays_standing_players() {
    let mut game = dealt(&[100, 100], &[13, 10, 12, 9, 10, 6, 5, 10]);

    game.hit(1).unwrap();
    game.stand(2).unwrap();

    assert_eq!(game.dealer().score(), 26);
    let settlement = game.settlement().unwrap();
    assert!(settlement.dealer_bust);
    assert_eq!(settlement.players[0].outcome, Outcome::Lose);
    assert_eq!(settlement.players[1].outcome, Outcome::Win);
    assert_eq!(game.players()[0].balance(), 90);
    assert_eq!(game.players()[1].balance(), 112);
}

#[test]
fn tie_returns_stake() {
    let mut game = dealt(&[100, 100], &[10, 10, 9, 7, 10, 9]);

    game.stand(1).unwrap();
    game.stand(2).unwrap();

    assert_eq!(game.players()[0].status, PlayerStatus::Tie);
    assert_eq!(game.players()[0].balance(), 100);
    assert_eq!(game.players()[1].balance(), 90);
}

#[test]
fn every_winner_receives_full_bonus() {
    let mut game = seated(&[100, 100, 100]);
    game.players[2].adjust_bet(50).unwrap();
    game.current_betting_player_index = 3;
    // p1 20, p2 19, p3 17, dealer 18
    game.deal_from(draws(&[10, 10, 10, 10, 9, 7, 10, 8])).unwrap();

    for id in 1..=3 {
        game.stand(id).unwrap();
    }

    let settlement = game.settlement().unwrap();
    assert_eq!(settlement.losing_pool, 50);
    assert_eq!(settlement.winner_bonus, 10);
    assert_eq!(game.players()[0].balance(), 120);
    assert_eq!(game.players()[1].balance(), 120);
    assert_eq!(game.players()[2].balance(), 50);

    let winner_stakes: u64 = settlement.winners().map(|p| p.bet).sum();
    let winners = settlement.winners().count() as u64;
    assert_eq!(
        settlement.total_payout(),
        winner_stakes * 2 + winners * settlement.winner_bonus
    );
    assert!(settlement.winner_bonus <= settlement.losing_pool);
}

#[test]
fn betting_turns_and_deal() {
    let mut game = seated(&[100, 100]);
    assert_eq!(game.state(), GameState::Betting);
    assert!(game.players().iter().all(|p| p.bet() == 10));

    assert_eq!(game.bet(2, BetAction::PlusTen), Err(ActionError::NotYourTurn));

    game.bet(1, BetAction::PlusTen).unwrap();
    assert_eq!(game.players()[0].bet(), 20);
    game.bet(1, BetAction::Double).unwrap();
    assert_eq!(game.players()[0].bet(), 40);
    game.bet(1, BetAction::Half).unwrap();
    assert_eq!(game.players()[0].bet(), 20);
    game.bet(1, BetAction::MinusTen).unwrap();
    game.bet(1, BetAction::MinusTen).unwrap();
    assert_eq!(game.players()[0].bet(), 10);
    assert_eq!(game.players()[0].balance(), 90);

    game.bet(1, BetAction::Push).unwrap();
    assert_eq!(game.current_betting_player_index(), 1);
    assert_eq!(game.current_bettor().map(|p| p.user_id), Some(2));

    assert_eq!(
        game.place_bet(2, 5),
        Err(ActionError::Bet(BetError::BelowMinimum))
    );
    assert_eq!(game.players()[1].balance(), 90);

    game.place_bet(2, 30).unwrap();
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.players()[1].bet(), 30);
    assert_eq!(game.players()[1].balance(), 70);
    assert_eq!(game.current_player_index(), 0);
    assert!(game.players().iter().all(|p| p.hand().len() == 2));
    assert_eq!(game.dealer().hand().len(), 2);
    assert_eq!(game.cards_remaining(), 52 - 6);
}

#[test]
fn betting_raise_beyond_funds_is_rejected() {
    let mut game = seated(&[10, 100]);

    assert_eq!(
        game.bet(1, BetAction::Double),
        Err(ActionError::Bet(BetError::InsufficientFunds))
    );
    assert_eq!(game.players()[0].bet(), 10);
    assert_eq!(game.players()[0].balance(), 0);
}

#[test]
fn short_deck_is_fatal_and_leaves_table_untouched() {
    let mut game = seated(&[100, 100]);
    let before = game.clone();

    let err = game.deal_from(draws(&[2, 2, 2, 2, 2])).unwrap_err();
    assert_eq!(err, ActionError::DeckExhausted(DeckExhausted));
    assert!(err.is_fatal());
    assert_eq!(game, before);
}

#[test]
fn empty_deck_on_hit_is_fatal() {
    let mut game = dealt(&[100, 100], &[10, 10, 2, 3, 10, 7]);
    assert_eq!(game.cards_remaining(), 0);

    let err = game.hit(1).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(game.players()[0].hand().len(), 2);

    let err = game.double(1).unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(game.players()[0].bet(), 10);
}

#[test]
fn start_requires_creator_and_two_players() {
    let mut game = Game::new("g-2", 1, 0, TableOptions::default(), 1);
    game.add_player(1, "one", 100).unwrap();
    assert_eq!(game.start_game(1), Err(ActionError::NotEnoughPlayers));

    game.add_player(2, "two", 100).unwrap();
    assert_eq!(game.start_game(2), Err(ActionError::NotCreator));
    assert_eq!(game.state(), GameState::Waiting);
    assert!(game.players().iter().all(|p| p.bet() == 0));

    game.start_game(1).unwrap();
    assert_eq!(game.start_game(1), Err(ActionError::InvalidState));

    let mut late = Game::new("g-3", 5, 0, TableOptions::default(), 1);
    late.add_player(6, "six", 100).unwrap();
    late.add_player(5, "five", 100).unwrap();
    assert_eq!(late.start_game(5), Err(ActionError::NotCreator));
}

#[test]
fn roster_rules() {
    let options = TableOptions::default().with_max_players(2);
    let mut game = Game::new("g-4", 1, 0, options, 1);

    game.add_player(1, "one", 100).unwrap();
    assert_eq!(game.add_player(1, "again", 100), Err(ActionError::AlreadyJoined));
    assert_eq!(
        game.add_player(3, "poor", 5),
        Err(ActionError::Bet(BetError::InsufficientFunds))
    );
    game.add_player(2, "two", 100).unwrap();
    assert_eq!(game.add_player(3, "three", 100), Err(ActionError::TableFull));
    assert_eq!(game.players().len(), 2);

    game.start_game(1).unwrap();
    assert_eq!(game.add_player(4, "four", 100), Err(ActionError::InvalidState));
}

#[test]
fn rematch_keeps_scope_and_rules() {
    let mut game = dealt(&[100, 100], &[10, 10, 9, 7, 10, 9]);
    game.bind_scope(42).unwrap();
    assert_eq!(game.bind_scope(43), Err(ActionError::InvalidState));
    assert_eq!(game.rematch("g-5", 1, 2).unwrap_err(), ActionError::InvalidState);

    game.stand(1).unwrap();
    game.stand(2).unwrap();

    let next = game.rematch("g-5", 2, 2).unwrap();
    assert_eq!(next.scope, 42);
    assert_eq!(next.creator_id, 2);
    assert_eq!(next.state(), GameState::Waiting);
    assert!(next.players().is_empty());
}

#[test]
fn record_round_trips_mid_play() {
    let mut game = dealt(&[100, 100], &[2, 10, 3, 10, 10, 7, 4]);
    game.hit(1).unwrap();
    game.message_ref = Some(99);

    let json = serde_json::to_string(&game).unwrap();
    assert!(json.contains("\"state\":\"playing\""));

    let restored: Game = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, game);
    assert!(restored.players()[0].has_drawn());
    assert_eq!(restored.current_player_index(), 0);
}

#[test]
fn dealt_deck_is_not_the_opening_deck() {
    let mut game = seated(&[100, 100]);
    let opening = game.deck.clone();

    game.bet(1, BetAction::Push).unwrap();
    game.bet(2, BetAction::Push).unwrap();

    assert_eq!(game.cards_remaining(), 46);
    assert_ne!(game.deck.cards(), &opening.cards()[..46]);
}

#[test]
fn decoded_options_keep_roster_cap() {
    let options: TableOptions =
        serde_json::from_str(r#"{"max_players":64,"winner_bonus_percent":20}"#).unwrap();
    let mut game = Game::new("g-6", 1, 0, options, 1);

    for id in 1..=10 {
        game.add_player(id, "p", 100).unwrap();
    }
    assert_eq!(game.add_player(11, "p", 100), Err(ActionError::TableFull));
}
