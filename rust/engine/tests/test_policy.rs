use holdem_engine::config::TableConfig;
use holdem_engine::engine::Engine;
use holdem_engine::game::Seat;
use holdem_engine::player::{ActionKind, Player, PlayerAction, PlayerStatus};
use holdem_engine::policy::{AbortHand, DecisionPolicy, DecisionRequest, PassivePolicy, TableView};
use holdem_engine::rules::{legal_actions, BetContext, Street};

fn view() -> TableView {
    TableView {
        street: Street::Flop,
        board: Vec::new(),
        pot: 40,
        bet_to_call: 0,
        last_raise_size: 20,
        button: 0,
        seats: Vec::new(),
    }
}

fn fold_everything(_: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand> {
    Ok(PlayerAction::Fold)
}

/// Records every request it sees, then checks or calls.
#[derive(Default)]
struct Recorder {
    seen: Vec<(usize, Street, u32, bool)>,
}

impl DecisionPolicy for Recorder {
    fn decide(&mut self, request: &DecisionRequest<'_>) -> Result<PlayerAction, AbortHand> {
        self.seen.push((
            request.seat,
            request.view.street,
            request.view.pot,
            request.hole_cards.is_some(),
        ));
        PassivePolicy.decide(request)
    }
}

#[test]
fn passive_policy_checks_or_calls() {
    let view = view();
    let open = legal_actions(1, &BetContext {
        bet_to_call: 0,
        contribution: 0,
        stack: 500,
        last_raise_size: 20,
        raise_closed: false,
    });
    let request = DecisionRequest {
        seat: 1,
        legal: &open,
        view: &view,
        hole_cards: None,
    };
    assert_eq!(PassivePolicy.decide(&request), Ok(PlayerAction::Check));

    let facing = legal_actions(1, &BetContext {
        bet_to_call: 40,
        contribution: 0,
        stack: 500,
        last_raise_size: 40,
        raise_closed: false,
    });
    let request = DecisionRequest {
        legal: &facing,
        ..request
    };
    assert_eq!(PassivePolicy.decide(&request), Ok(PlayerAction::Call));
}

#[test]
fn plain_functions_are_policies() {
    let engine = Engine::new(TableConfig::with_blinds(10, 20)).unwrap();
    let seats = [Seat::new(1000), Seat::new(1000)];
    let record = engine
        .play_hand(&seats, 0, 1, &mut fold_everything)
        .unwrap();
    assert_eq!(record.final_stacks, vec![990, 1010]);
}

#[test]
fn policy_sees_its_own_cards_and_the_pot() {
    let engine = Engine::new(TableConfig::with_blinds(10, 20)).unwrap();
    let seats = [Seat::new(1000), Seat::new(1000)];
    let mut recorder = Recorder::default();
    engine.play_hand(&seats, 0, 1, &mut recorder).unwrap();

    assert_eq!(recorder.seen.len(), 8);
    assert!(recorder.seen.iter().all(|s| s.3));
    assert_eq!(recorder.seen[0], (0, Street::Preflop, 30, true));
    assert_eq!(recorder.seen[1], (1, Street::Preflop, 40, true));
    assert_eq!(recorder.seen[2], (1, Street::Flop, 40, true));
}

#[test]
fn actions_serialize_in_snake_case() {
    assert_eq!(serde_json::to_string(&PlayerAction::Check).unwrap(), "\"check\"");
    assert_eq!(
        serde_json::to_string(&PlayerAction::Raise(60)).unwrap(),
        "{\"raise\":60}"
    );
    assert_eq!(serde_json::to_string(&ActionKind::Fold).unwrap(), "\"fold\"");
    assert_eq!(PlayerAction::Raise(60).to_string(), "raise to 60");
    assert_eq!(PlayerAction::Raise(60).kind(), ActionKind::Raise);
}

#[test]
fn new_player_is_active_without_cards() {
    let p = Player::new(3, 250);
    assert_eq!(p.seat(), 3);
    assert_eq!(p.stack(), 250);
    assert_eq!(p.status(), PlayerStatus::Active);
    assert!(p.hole_cards().is_none());
    assert!(p.in_hand());
    assert!(p.can_act());

    let out = Player::sitting_out(4, 250);
    assert_eq!(out.status(), PlayerStatus::SittingOut);
    assert!(!out.in_hand());
    assert!(!out.can_act());
}
