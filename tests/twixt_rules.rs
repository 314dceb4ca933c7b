//! Game rule scenarios and randomized invariants over reachable positions

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use twixt::{
    Error,
    evaluator::Evaluator,
    twixt::{ConnectionRule, Game, GameOutcome, GameState, Move, Player},
};

fn play_all(state: &mut GameState, moves: &[(usize, usize)]) {
    for &(row, col) in moves {
        state.apply_move(Move::new(row, col)).unwrap();
    }
}

#[test]
fn diagonal_chain_wins_for_first_player() {
    let mut state = GameState::new();
    let x_moves = [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4), (5, 5)];
    let o_moves = [(0, 3), (0, 4), (0, 5), (1, 4), (1, 5)];

    for (i, &(row, col)) in x_moves.iter().enumerate() {
        assert!(!state.is_terminal());
        assert_eq!(state.to_move(), Player::X);
        state.apply_move(Move::new(row, col)).unwrap();
        if let Some(&(row, col)) = o_moves.get(i) {
            assert!(!state.is_terminal(), "game ended early after X pin {i}");
            state.apply_move(Move::new(row, col)).unwrap();
        }
    }

    assert!(state.is_terminal());
    assert_eq!(state.winner(), Some(Player::X));
    assert_eq!(state.outcome(), Some(GameOutcome::Win(Player::X)));
    assert!(matches!(
        state.apply_move(Move::new(2, 0)),
        Err(Error::GameOver)
    ));
}

#[test]
fn breaking_the_chain_removes_the_win() {
    // Same diagonal with (3,3) left out: no win yet.
    let mut state = GameState::new();
    play_all(
        &mut state,
        &[
            (0, 0),
            (0, 3),
            (1, 1),
            (0, 4),
            (2, 2),
            (0, 5),
            (4, 4),
            (1, 4),
            (5, 5),
        ],
    );
    assert!(!state.is_terminal());
    assert_eq!(state.winner(), None);
    assert_eq!(state.to_move(), Player::O);
}

#[test]
fn second_player_connects_left_to_right() {
    let mut state = GameState::with_rules(4, ConnectionRule::Adjacency).unwrap();
    play_all(
        &mut state,
        &[(0, 0), (2, 0), (0, 2), (2, 1), (3, 3), (1, 2), (3, 1), (1, 3)],
    );
    assert_eq!(state.winner(), Some(Player::O));
}

#[test]
fn knight_bridges_win_under_bridge_rule_only() {
    // X pins at (0,1), (2,2), (4,3): knight-linked, not 8-adjacent.
    let moves = [(0, 1), (0, 4), (2, 2), (1, 4), (4, 3)];
    let to_moves: Vec<Move> = moves.iter().map(|&(r, c)| Move::new(r, c)).collect();

    let bridge = GameState::from_moves(5, ConnectionRule::Bridge, &to_moves).unwrap();
    assert_eq!(bridge.winner(), Some(Player::X));
    assert_eq!(bridge.links().len(Player::X), 2);

    let adjacency = GameState::from_moves(5, ConnectionRule::Adjacency, &to_moves).unwrap();
    assert_eq!(adjacency.winner(), None);
    assert!(adjacency.links().is_empty());
}

#[test]
fn draw_on_full_board() {
    // Final position:
    // X X X
    // X O X
    // O O O
    // X never reaches row 2 and no O pins are knight-linked.
    let mut state = GameState::with_rules(3, ConnectionRule::Bridge).unwrap();
    play_all(
        &mut state,
        &[
            (0, 0),
            (1, 1),
            (0, 1),
            (2, 0),
            (0, 2),
            (2, 1),
            (1, 0),
            (2, 2),
        ],
    );
    assert!(!state.is_terminal());
    state.apply_move(Move::new(1, 2)).unwrap();

    assert!(state.is_terminal());
    assert_eq!(state.outcome(), Some(GameOutcome::Draw));
    assert_eq!(state.winner(), None);
    assert!(state.legal_moves().is_empty());
    assert!(state.links().links(Player::O).is_empty());
}

#[test]
fn game_record_replays_to_same_state() {
    let mut game = Game::new(4, ConnectionRule::Bridge).unwrap();
    let mut state = GameState::with_rules(4, ConnectionRule::Bridge).unwrap();
    for mv in [Move::new(0, 0), Move::new(3, 3), Move::new(2, 1)] {
        game.play(mv).unwrap();
        state.apply_move(mv).unwrap();
    }
    assert_eq!(game.current_state().unwrap(), state);
    assert_eq!(game.len(), 3);
}

#[test]
fn evaluator_sentinels_on_terminal_states() {
    let evaluator = Evaluator::default();
    let empty = GameState::new();
    assert!(evaluator.score(&empty).is_finite());

    let x_win = GameState::from_moves(
        2,
        ConnectionRule::Adjacency,
        &[Move::new(0, 0), Move::new(0, 1), Move::new(1, 0)],
    )
    .unwrap();
    assert_eq!(evaluator.score(&x_win), f64::INFINITY);

    let o_win = GameState::from_moves(
        3,
        ConnectionRule::Adjacency,
        &[
            Move::new(0, 0),
            Move::new(1, 0),
            Move::new(2, 2),
            Move::new(1, 1),
            Move::new(0, 2),
            Move::new(1, 2),
        ],
    )
    .unwrap();
    assert_eq!(o_win.winner(), Some(Player::O));
    assert_eq!(evaluator.score(&o_win), f64::NEG_INFINITY);
}

// =============================================================================
// Strategies
// =============================================================================

fn arb_rule() -> impl Strategy<Value = ConnectionRule> {
    prop_oneof![Just(ConnectionRule::Adjacency), Just(ConnectionRule::Bridge)]
}

/// A reachable position: size, rule, and up to `size²` random legal moves
fn arb_position() -> impl Strategy<Value = GameState> {
    (3usize..=7, arb_rule(), any::<u64>(), 0usize..=49).prop_map(
        |(size, rule, seed, plies)| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = GameState::with_rules(size, rule).unwrap();
            for _ in 0..plies {
                let Some(&mv) = state.legal_moves().choose(&mut rng) else {
                    break;
                };
                state.apply_move(mv).unwrap();
            }
            state
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_illegal_moves_leave_state_unchanged(state in arb_position(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = state.size();
        let occupied: Vec<Move> = state
            .board()
            .positions()
            .filter(|&pos| !state.board().is_empty(pos))
            .collect();

        let mut candidates = vec![
            Move::new(size, 0),
            Move::new(0, size),
            Move::new(rng.random_range(size..size * 2), rng.random_range(0..size)),
        ];
        candidates.extend(occupied.choose(&mut rng));

        for mv in candidates {
            let mut copy = state.clone();
            prop_assert!(!copy.is_valid_move(mv));
            prop_assert!(copy.apply_move(mv).is_err());
            prop_assert_eq!(&copy, &state);
        }
    }

    #[test]
    fn prop_turn_and_terminal_consistency(state in arb_position()) {
        let board = state.board();
        let x = board.pins(Player::X).len();
        let o = board.pins(Player::O).len();

        if state.is_terminal() {
            prop_assert!(state.winner().is_some() || board.is_full());
            prop_assert!(state.legal_moves().is_empty());
        } else {
            prop_assert!(state.winner().is_none());
            prop_assert!(!board.is_full());
            prop_assert_eq!(state.legal_moves(), board.empty_positions());
            let expected = if x == o { Player::X } else { Player::O };
            prop_assert_eq!(state.to_move(), expected);
        }
        prop_assert!(x == o || x == o + 1);
    }

    #[test]
    fn prop_links_join_same_player_pins(state in arb_position()) {
        for player in [Player::X, Player::O] {
            for link in state.links().links(player) {
                let (a, b) = link.ends();
                prop_assert!(state.board().is_owned_by(a, player));
                prop_assert!(state.board().is_owned_by(b, player));
            }
        }
        if state.rule() == ConnectionRule::Adjacency {
            prop_assert!(state.links().is_empty());
        }
    }

    #[test]
    fn prop_successor_preserves_links(state in arb_position(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        if let Some(&mv) = state.legal_moves().choose(&mut rng) {
            let next = state.successor(mv).unwrap();
            for player in [Player::X, Player::O] {
                prop_assert!(state.links().links(player).is_subset(next.links().links(player)));
            }
        }
    }
}
