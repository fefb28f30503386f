use holdem_engine::errors::GameError;
use holdem_engine::player::PlayerAction as A;
use holdem_engine::rules::{
    legal_actions, validate_action, BetContext, RaiseRange, Street, ValidatedAction,
};

fn ctx(bet_to_call: u32, contribution: u32, stack: u32, last_raise_size: u32) -> BetContext {
    BetContext {
        bet_to_call,
        contribution,
        stack,
        last_raise_size,
        raise_closed: false,
    }
}

fn is_illegal(r: Result<ValidatedAction, GameError>) -> bool {
    matches!(r, Err(GameError::IllegalAction { .. }))
}

#[test]
fn legal_set_facing_big_blind() {
    let legal = legal_actions(0, &ctx(20, 10, 990, 20));
    assert!(legal.fold);
    assert!(!legal.check);
    assert_eq!(legal.call, Some(10));
    assert_eq!(legal.raise, Some(RaiseRange { min: 40, max: 1000 }));

    assert!(legal.allows(&A::Fold));
    assert!(!legal.allows(&A::Check));
    assert!(legal.allows(&A::Call));
    assert!(legal.allows(&A::Raise(40)));
    assert!(!legal.allows(&A::Raise(39)));
    assert!(legal.allows(&A::Raise(1000)));
    assert!(!legal.allows(&A::Raise(1001)));
}

#[test]
fn legal_set_with_nothing_owed() {
    let legal = legal_actions(1, &ctx(20, 20, 980, 20));
    assert!(legal.check);
    assert!(legal.fold);
    assert_eq!(legal.call, None);
    assert_eq!(legal.raise, Some(RaiseRange { min: 40, max: 1000 }));
}

#[test]
fn short_stack_raise_range_is_all_in_only() {
    let legal = legal_actions(2, &ctx(20, 0, 25, 20));
    assert_eq!(legal.raise, Some(RaiseRange { min: 25, max: 25 }));
    assert_eq!(legal.call, Some(20));
}

#[test]
fn covering_only_a_call_removes_raise() {
    let legal = legal_actions(2, &ctx(100, 20, 60, 80));
    assert_eq!(legal.raise, None);
    assert_eq!(legal.call, Some(60));
}

#[test]
fn check_only_when_matched() {
    assert!(is_illegal(validate_action(0, A::Check, &ctx(20, 10, 990, 20))));
    assert_eq!(
        validate_action(0, A::Check, &ctx(20, 20, 990, 20)),
        Ok(ValidatedAction::Check)
    );
}

#[test]
fn call_needs_something_owed() {
    assert!(is_illegal(validate_action(0, A::Call, &ctx(0, 0, 500, 20))));
    assert_eq!(
        validate_action(0, A::Call, &ctx(50, 0, 500, 20)),
        Ok(ValidatedAction::Call(50))
    );
}

#[test]
fn short_call_goes_all_in() {
    assert_eq!(
        validate_action(0, A::Call, &ctx(200, 0, 75, 20)),
        Ok(ValidatedAction::Call(75))
    );
}

#[test]
fn fold_is_always_legal() {
    assert_eq!(
        validate_action(0, A::Fold, &ctx(0, 0, 500, 20)),
        Ok(ValidatedAction::Fold)
    );
    assert_eq!(
        validate_action(0, A::Fold, &ctx(20, 10, 990, 20)),
        Ok(ValidatedAction::Fold)
    );
}

#[test]
fn min_raise_is_enforced() {
    let c = ctx(20, 10, 990, 20);
    assert!(is_illegal(validate_action(0, A::Raise(30), &c)));
    assert_eq!(
        validate_action(0, A::Raise(40), &c),
        Ok(ValidatedAction::Raise {
            to: 40,
            commit: 30,
            full: true
        })
    );
    assert!(is_illegal(validate_action(0, A::Raise(20), &c)));
}

#[test]
fn raise_cannot_exceed_stack() {
    let c = ctx(20, 10, 990, 20);
    let err = validate_action(0, A::Raise(1001), &c).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction { seat: 0, .. }));
    assert!(err.is_recoverable());
}

#[test]
fn short_all_in_raise_is_allowed_but_not_full() {
    // last full raise was 100: 300 -> 400
    let c = ctx(400, 0, 450, 100);
    assert_eq!(
        validate_action(3, A::Raise(450), &c),
        Ok(ValidatedAction::Raise {
            to: 450,
            commit: 450,
            full: false
        })
    );
    assert!(is_illegal(validate_action(3, A::Raise(440), &c)));
}

#[test]
fn opening_bet_is_a_raise_from_zero() {
    let c = ctx(0, 0, 500, 20);
    assert!(is_illegal(validate_action(0, A::Raise(10), &c)));
    assert_eq!(
        validate_action(0, A::Raise(20), &c),
        Ok(ValidatedAction::Raise {
            to: 20,
            commit: 20,
            full: true
        })
    );
}

#[test]
fn closed_raising_only_allows_call_or_fold() {
    let c = BetContext {
        raise_closed: true,
        ..ctx(150, 100, 900, 80)
    };
    let legal = legal_actions(0, &c);
    assert_eq!(legal.raise, None);
    assert_eq!(legal.call, Some(50));
    assert!(is_illegal(validate_action(0, A::Raise(300), &c)));
    assert_eq!(
        validate_action(0, A::Call, &c),
        Ok(ValidatedAction::Call(50))
    );
}

#[test]
fn streets_advance_in_order() {
    assert_eq!(Street::Preflop.next(), Street::Flop);
    assert_eq!(Street::Flop.next(), Street::Turn);
    assert_eq!(Street::Turn.next(), Street::River);
    assert_eq!(Street::River.next(), Street::Showdown);
    assert_eq!(Street::Showdown.next(), Street::Showdown);
    assert_eq!(Street::Flop.cards_to_deal(), 3);
    assert_eq!(Street::Turn.cards_to_deal(), 1);
    assert_eq!(Street::Preflop.cards_to_deal(), 0);
}

#[test]
fn huge_bets_cap_the_minimum_raise_at_all_in() {
    let big = ctx(3_000_000_000, 2_000_000_000, 1_200_000_000, 2_999_999_980);
    let legal = legal_actions(1, &big);
    assert_eq!(
        legal.raise,
        Some(RaiseRange {
            min: 3_200_000_000,
            max: 3_200_000_000
        })
    );
    assert!(is_illegal(validate_action(1, A::Raise(3_100_000_000), &big)));
    assert!(validate_action(1, A::Raise(3_200_000_000), &big).is_ok());
}
