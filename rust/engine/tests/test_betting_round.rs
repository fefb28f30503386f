use holdem_engine::betting::BettingRound;
use holdem_engine::errors::GameError;
use holdem_engine::player::{ActionKind, Player, PlayerAction as A, PlayerStatus};
use holdem_engine::pot::PotManager;
use holdem_engine::rules::Street;

/// Seats players, posts the blinds and opens preflop.
fn preflop(
    stacks: &[u32],
    button: usize,
    sb: usize,
    bb: usize,
) -> (Vec<Player>, PotManager, BettingRound) {
    let mut players: Vec<Player> = stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| Player::new(i, s))
        .collect();
    let mut pot = PotManager::new(players.len(), button);
    let sb_amount = 10.min(players[sb].stack());
    pot.commit(&mut players[sb], sb_amount).unwrap();
    let bb_amount = 20.min(players[bb].stack());
    pot.commit(&mut players[bb], bb_amount).unwrap();
    let round = BettingRound::open(Street::Preflop, &players, bb, 20);
    (players, pot, round)
}

#[test]
fn heads_up_button_acts_first_preflop() {
    let (players, _pot, round) = preflop(&[1000, 1000], 0, 0, 1);
    assert_eq!(round.to_act(), Some(0));
    assert_eq!(round.bet_to_call(), 20);
    assert_eq!(round.last_raise_size(), 20);
    let legal = round.legal_actions(&players).unwrap();
    assert_eq!(legal.call, Some(10));
}

#[test]
fn out_of_turn_action_is_refused() {
    let (mut players, mut pot, mut round) = preflop(&[1000, 1000], 0, 0, 1);
    let err = round
        .apply(1, A::Call, &mut players, &mut pot)
        .unwrap_err();
    assert_eq!(
        err,
        GameError::ActionOutOfTurn {
            expected: Some(0),
            actual: 1
        }
    );
    assert!(!err.is_recoverable());
}

#[test]
fn illegal_check_changes_nothing() {
    let (mut players, mut pot, mut round) = preflop(&[1000, 1000], 0, 0, 1);
    let err = round
        .apply(0, A::Check, &mut players, &mut pot)
        .unwrap_err();
    assert!(matches!(err, GameError::IllegalAction { seat: 0, .. }));
    assert_eq!(players[0].stack(), 990);
    assert_eq!(players[1].stack(), 980);
    assert_eq!(pot.total(), 30);
    assert_eq!(round.to_act(), Some(0));
}

#[test]
fn call_then_check_closes_preflop() {
    let (mut players, mut pot, mut round) = preflop(&[1000, 1000], 0, 0, 1);

    let call = round.apply(0, A::Call, &mut players, &mut pot).unwrap();
    assert_eq!(call.kind, ActionKind::Call);
    assert_eq!(call.amount, 10);
    assert_eq!(call.street, Street::Preflop);
    assert_eq!(call.resulting_street, Street::Preflop);
    assert!(!call.all_in);
    assert_eq!(round.to_act(), Some(1));

    // the big blind keeps its option
    let check = round.apply(1, A::Check, &mut players, &mut pot).unwrap();
    assert_eq!(check.resulting_street, Street::Flop);
    assert!(round.is_complete());
    assert_eq!(round.next_street(&players), Street::Flop);
    assert_eq!(pot.total(), 40);
}

#[test]
fn full_raise_reopens_action() {
    let (mut players, mut pot, mut round) = preflop(&[1000, 1000], 0, 0, 1);
    round.apply(0, A::Raise(60), &mut players, &mut pot).unwrap();
    assert_eq!(round.bet_to_call(), 60);
    assert_eq!(round.last_raise_size(), 40);
    assert_eq!(round.last_aggressor(), Some(0));
    assert_eq!(round.to_act(), Some(1));

    let legal = round.legal_actions(&players).unwrap();
    assert_eq!(legal.raise.map(|r| r.min), Some(100));

    round.apply(1, A::Raise(100), &mut players, &mut pot).unwrap();
    assert_eq!(round.to_act(), Some(0));
    round.apply(0, A::Call, &mut players, &mut pot).unwrap();
    assert!(round.is_complete());
    assert_eq!(players[0].street_contribution(), 100);
    assert_eq!(pot.total(), 200);
}

#[test]
fn short_all_in_raise_does_not_reopen_raising() {
    // button 0, small blind 1, big blind 2 with only 150 behind
    let (mut players, mut pot, mut round) = preflop(&[1000, 1000, 150], 0, 1, 2);
    assert_eq!(round.to_act(), Some(0));

    round.apply(0, A::Raise(100), &mut players, &mut pot).unwrap();
    assert_eq!(round.last_raise_size(), 80);
    round.apply(1, A::Call, &mut players, &mut pot).unwrap();

    // 150 is only 50 more than 100: a short raise
    let shove = round.apply(2, A::Raise(150), &mut players, &mut pot).unwrap();
    assert!(shove.all_in);
    assert_eq!(players[2].status(), PlayerStatus::AllIn);
    assert_eq!(round.bet_to_call(), 150);
    assert_eq!(round.last_raise_size(), 80);

    assert_eq!(round.to_act(), Some(0));
    let legal = round.legal_actions(&players).unwrap();
    assert_eq!(legal.raise, None);
    assert_eq!(legal.call, Some(50));
    assert!(round
        .apply(0, A::Raise(300), &mut players, &mut pot)
        .is_err());

    round.apply(0, A::Call, &mut players, &mut pot).unwrap();
    round.apply(1, A::Call, &mut players, &mut pot).unwrap();
    assert!(round.is_complete());
    assert_eq!(round.next_street(&players), Street::Flop);
    assert_eq!(pot.total(), 450);
}

#[test]
fn fold_to_one_player_ends_hand() {
    let (mut players, mut pot, mut round) = preflop(&[1000, 1000], 0, 0, 1);
    let fold = round.apply(0, A::Fold, &mut players, &mut pot).unwrap();
    assert_eq!(fold.resulting_street, Street::Showdown);
    assert!(round.is_complete());
    assert_eq!(players[0].status(), PlayerStatus::Folded);
    assert_eq!(round.next_street(&players), Street::Showdown);
}

#[test]
fn lone_actor_only_calls_the_shortfall() {
    // big blind only has 15
    let (mut players, mut pot, mut round) = preflop(&[1000, 15], 0, 0, 1);
    assert_eq!(players[1].status(), PlayerStatus::AllIn);
    assert_eq!(round.bet_to_call(), 15);
    assert_eq!(round.to_act(), Some(0));
    assert_eq!(round.legal_actions(&players).unwrap().call, Some(5));

    round.apply(0, A::Call, &mut players, &mut pot).unwrap();
    assert!(round.is_complete());
    assert_eq!(round.next_street(&players), Street::Showdown);
}

#[test]
fn matched_lone_actor_does_not_act() {
    let mut players = vec![Player::new(0, 1000), Player::new(1, 20)];
    let mut pot = PotManager::new(2, 0);
    pot.commit(&mut players[1], 20).unwrap();
    pot.commit(&mut players[0], 20).unwrap();
    let round = BettingRound::open(Street::Preflop, &players, 1, 20);
    assert!(round.is_complete());
}

#[test]
fn postflop_starts_left_of_button_with_no_bet() {
    let players = vec![Player::new(0, 900), Player::new(1, 900), Player::new(2, 900)];
    let round = BettingRound::open(Street::Flop, &players, 2, 20);
    assert_eq!(round.to_act(), Some(0));
    assert_eq!(round.bet_to_call(), 0);
    let legal = round.legal_actions(&players).unwrap();
    assert!(legal.check);
    assert_eq!(legal.call, None);
    assert_eq!(legal.raise.map(|r| r.min), Some(20));
}

#[test]
fn everyone_checks_through() {
    let mut players = vec![Player::new(0, 900), Player::new(1, 900), Player::new(2, 900)];
    let mut pot = PotManager::new(3, 0);
    let mut round = BettingRound::open(Street::Turn, &players, 0, 20);
    for seat in [1, 2, 0] {
        assert_eq!(round.to_act(), Some(seat));
        round.apply(seat, A::Check, &mut players, &mut pot).unwrap();
    }
    assert!(round.is_complete());
    assert_eq!(round.next_street(&players), Street::River);
    assert_eq!(pot.total(), 0);
}
