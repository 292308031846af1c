//! Integration tests for othello-rust
//!
//! Fixed scenarios from the opening, plus property checks over positions
//! collected from seeded random games: legality against a brute-force flank
//! scan, flip counts, undo, terminal detection, pruning equivalence and
//! stability bounds.

use pretty_assertions::assert_eq;

use othello_rust::eval::{
    EvalConfig, corner_score, evaluate, mobility_score, seed_stable, stability_score, stable_disks,
    stone_parity,
};
use othello_rust::position::on_board;
use othello_rust::{
    MoveError, PassPolicy, Player, SearchParams, Searcher, apply_move, compute_move, legal_moves,
    new_game,
};
use othello_rust::{Move, Position, Side};

// =============================================================================
// Helper functions
// =============================================================================

/// Every position reached in `games` random games, including the start and
/// the final position of each game. Passes are played when forced.
fn random_positions(seed: u64, games: usize) -> Vec<(Position, Side)> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut out = Vec::new();
    for _ in 0..games {
        let mut pos = new_game();
        let mut side = Side::Black;
        out.push((pos, side));
        while !pos.is_done() {
            let moves = legal_moves(&pos, side);
            if !moves.is_empty() {
                let mv = moves[rng.usize(..moves.len())];
                pos.apply_checked(mv, side).unwrap();
            }
            side = side.opponent();
            out.push((pos, side));
        }
    }
    out
}

/// Flipped squares found by walking each direction with coordinate queries.
fn brute_force_flips(pos: &Position, x: i32, y: i32, side: Side) -> Vec<(i32, i32)> {
    if !on_board(x, y) || pos.occupied(x, y) {
        return Vec::new();
    }
    let mut flips = Vec::new();
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let mut run = Vec::new();
            let (mut cx, mut cy) = (x + dx, y + dy);
            while pos.color_at(side.opponent(), cx, cy) {
                run.push((cx, cy));
                cx += dx;
                cy += dy;
            }
            if !run.is_empty() && pos.color_at(side, cx, cy) {
                flips.extend(run);
            }
        }
    }
    flips.sort();
    flips
}

fn changed_squares(before: &Position, after: &Position) -> Vec<(i32, i32)> {
    let mut squares = Vec::new();
    for x in 0..8 {
        for y in 0..8 {
            if before.get(x, y) != after.get(x, y) {
                squares.push((x, y));
            }
        }
    }
    squares.sort();
    squares
}

fn params(depth: u32, pruning: bool, pass_policy: PassPolicy) -> SearchParams {
    SearchParams {
        depth,
        pruning,
        pass_policy,
        ..SearchParams::default()
    }
}

// =============================================================================
// Opening scenarios
// =============================================================================

#[test]
fn test_opening_legal_moves_black() {
    let pos = new_game();
    let mut moves = legal_moves(&pos, Side::Black);
    moves.sort_by_key(|mv| (mv.x, mv.y));
    assert_eq!(
        moves,
        vec![
            Move::new(2, 3),
            Move::new(3, 2),
            Move::new(4, 5),
            Move::new(5, 4)
        ]
    );
}

#[test]
fn test_opening_move_flips_one_disk() {
    let mut pos = new_game();
    let undo = pos.apply_checked(Move::new(2, 3), Side::Black).unwrap();
    assert_eq!(undo.flipped_squares().collect::<Vec<_>>(), vec![Move::new(3, 3)]);
    assert_eq!(pos.count_black(), 4);
    assert_eq!(pos.count_white(), 1);
    assert_eq!(pos.count_empty(), 59);
}

#[test]
fn test_blocked_side_has_no_moves_and_passes() {
    // White corner at a1 shields the black disk at b1 from being flanked
    let pos: Position = "
        wb......
        ........
        ........
        ........
        ........
        ........
        ........
        ........"
        .parse()
        .unwrap();
    assert!(legal_moves(&pos, Side::Black).is_empty());
    assert!(!legal_moves(&pos, Side::White).is_empty());
    assert!(!pos.is_done());
    assert_eq!(compute_move(&pos, Side::Black, 4), None);
}

#[test]
fn test_parity_forty_to_twenty() {
    let pos = Position::from_masks((1u64 << 60) - 1, (1u64 << 40) - 1);
    assert_eq!(pos.count_black(), 40);
    assert_eq!(pos.count_white(), 20);
    assert_eq!(stone_parity(&pos, Side::Black), 3333);
}

#[test]
fn test_apply_move_errors() {
    let mut pos = new_game();
    assert_eq!(
        apply_move(&mut pos, Move::new(-1, 4), Side::Black),
        Err(MoveError::OutOfBounds { x: -1, y: 4 })
    );
    assert_eq!(
        apply_move(&mut pos, Move::new(3, 3), Side::Black),
        Err(MoveError::Illegal {
            mv: Move::new(3, 3),
            side: Side::Black
        })
    );
    assert_eq!(pos, new_game());
    assert_eq!(apply_move(&mut pos, Move::new(3, 2), Side::Black), Ok(()));
}

#[test]
fn test_error_messages() {
    let err = MoveError::Illegal {
        mv: Move::new(0, 0),
        side: Side::White,
    };
    assert_eq!(err.to_string(), "illegal move: a1 for white");
    let err = MoveError::OutOfBounds { x: 8, y: 0 };
    assert_eq!(err.to_string(), "illegal move: (8, 0) is off the board");
}

// =============================================================================
// Move engine properties
// =============================================================================

#[test]
fn test_legality_matches_brute_force() {
    for (pos, _) in random_positions(11, 4) {
        for side in [Side::Black, Side::White] {
            for x in -1..=8 {
                for y in -1..=8 {
                    let expected = !brute_force_flips(&pos, x, y, side).is_empty();
                    assert_eq!(
                        pos.is_legal(Move::new(x, y), side),
                        expected,
                        "({x}, {y}) for {side} on\n{pos}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_flips_are_exact_and_counted() {
    for (pos, side) in random_positions(23, 4) {
        for mv in legal_moves(&pos, side) {
            let mut after = pos;
            let undo = after.apply_checked(mv, side).unwrap();
            let flipped = brute_force_flips(&pos, mv.x, mv.y, side);
            let total = flipped.len() as u32;

            // Exactly the flanked runs change, plus the placed square
            let mut expected = flipped.clone();
            expected.push((mv.x, mv.y));
            expected.sort();
            assert_eq!(changed_squares(&pos, &after), expected);

            assert_eq!(undo.flipped_count(), total);
            assert_eq!(after.count(side), pos.count(side) + 1 + total);
            assert_eq!(after.count(side.opponent()), pos.count(side.opponent()) - total);
        }
    }
}

#[test]
fn test_undo_is_bit_identical() {
    for (pos, side) in random_positions(37, 4) {
        for mv in legal_moves(&pos, side) {
            let mut work = pos.copy();
            let undo = work.apply_unchecked(mv, side);
            work.undo(undo);
            assert_eq!(work, pos, "undo of {mv} for {side} differs");
            assert_eq!(work.occupied_mask(), pos.occupied_mask());
            assert_eq!(work.side_mask(Side::Black), pos.side_mask(Side::Black));
        }
    }
}

#[test]
fn test_nested_undo_restores_in_reverse_order() {
    let mut rng = fastrand::Rng::with_seed(5);
    let start = new_game();
    let mut pos = start;
    let mut side = Side::Black;
    let mut stack = Vec::new();
    for _ in 0..20 {
        let moves = legal_moves(&pos, side);
        if moves.is_empty() {
            break;
        }
        stack.push((pos, pos.apply_unchecked(moves[rng.usize(..moves.len())], side)));
        side = side.opponent();
    }
    while let Some((before, undo)) = stack.pop() {
        pos.undo(undo);
        assert_eq!(pos, before);
    }
    assert_eq!(pos, start);
}

#[test]
fn test_terminal_detection() {
    for (pos, _) in random_positions(41, 6) {
        let expected = pos.count_empty() == 0
            || (legal_moves(&pos, Side::Black).is_empty()
                && legal_moves(&pos, Side::White).is_empty());
        assert_eq!(pos.is_done(), expected, "\n{pos}");
        for side in [Side::Black, Side::White] {
            assert_eq!(pos.has_moves(side), !legal_moves(&pos, side).is_empty());
        }
    }
}

#[test]
fn test_board_text_roundtrip_through_cells() {
    for (pos, _) in random_positions(3, 1) {
        let cells: String = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .map(|(x, y)| match pos.get(x, y) {
                Some(Side::Black) => 'b',
                Some(Side::White) => 'w',
                None => '.',
            })
            .collect();
        assert_eq!(cells.parse::<Position>(), Ok(pos));
    }
}

// =============================================================================
// Evaluation properties
// =============================================================================

#[test]
fn test_scores_are_antisymmetric_and_bounded() {
    let config = EvalConfig {
        mobility: true,
        ..EvalConfig::default()
    };
    for (pos, _) in random_positions(53, 3) {
        let terms: [fn(&Position, Side) -> i32; 4] =
            [stone_parity, mobility_score, corner_score, stability_score];
        for term in terms {
            let black = term(&pos, Side::Black);
            assert_eq!(black, -term(&pos, Side::White));
            assert!((-10_000..=10_000).contains(&black));
        }
        assert_eq!(
            evaluate(&pos, Side::Black, &config),
            -evaluate(&pos, Side::White, &config)
        );
    }
}

#[test]
fn test_stability_bounds() {
    for (pos, _) in random_positions(67, 4) {
        let seed = seed_stable(&pos);
        let stable = stable_disks(&pos);

        // Propagation only adds, and never leaves the disks of each color
        assert_eq!(seed.black & !stable.black, 0);
        assert_eq!(seed.white & !stable.white, 0);
        assert_eq!(stable.black & !pos.side_mask(Side::Black), 0);
        assert_eq!(stable.white & !pos.side_mask(Side::White), 0);
        assert!(stable.passes >= 1 && stable.passes <= 64);

        // Corners are always stable once taken
        for (x, y) in [(0, 0), (7, 0), (0, 7), (7, 7)] {
            if let Some(side) = pos.get(x, y) {
                assert_ne!(stable.mask(side) & Move::new(x, y).bit(), 0);
            }
        }
    }
}

#[test]
fn test_final_positions_full_board_all_stable() {
    for (pos, _) in random_positions(71, 3) {
        if pos.count_empty() == 0 {
            let stable = stable_disks(&pos);
            assert_eq!(stable.black | stable.white, u64::MAX);
        }
    }
}

// =============================================================================
// Search properties
// =============================================================================

#[test]
fn test_alpha_beta_matches_minimax() {
    let positions = random_positions(89, 2);
    for (i, (pos, side)) in positions.iter().enumerate().filter(|(i, _)| i % 6 == 0) {
        let max_depth = if i % 12 == 0 { 4 } else { 3 };
        for depth in 1..=max_depth {
            for policy in [PassPolicy::Evaluate, PassPolicy::Recurse] {
                let mut work = *pos;
                let pruned = Searcher::new(params(depth, true, policy)).search(&mut work, *side);
                let full = Searcher::new(params(depth, false, policy)).search(&mut work, *side);
                assert_eq!(
                    (pruned.best, pruned.score),
                    (full.best, full.score),
                    "depth {depth} {policy:?} for {side} on\n{pos}"
                );
                assert!(pruned.nodes <= full.nodes);
                assert_eq!(work, *pos);
            }
        }
    }
}

#[test]
fn test_search_returns_legal_move_or_pass() {
    for (pos, side) in random_positions(97, 2).into_iter().step_by(5) {
        let best = compute_move(&pos, side, 3);
        match best {
            Some(mv) => assert!(pos.is_legal(mv, side)),
            None => assert!(!pos.has_moves(side)),
        }
    }
}

#[test]
fn test_search_takes_free_corner() {
    // d2 flips one disk; h8 takes a corner and the whole c3-g7 diagonal
    let pos: Position = "
        ........
        .bw.....
        ..w.....
        ...w....
        ....w...
        .....w..
        ......w.
        ........"
        .parse()
        .unwrap();
    assert_eq!(
        legal_moves(&pos, Side::Black),
        vec![Move::new(3, 1), Move::new(7, 7)]
    );
    assert_eq!(compute_move(&pos, Side::Black, 1), Some(Move::new(7, 7)));
}

#[test]
fn test_players_agree_over_full_game() {
    let fast = SearchParams {
        depth: 2,
        ..SearchParams::default()
    };
    let mut black = Player::with_params(Side::Black, fast);
    let mut white = Player::with_params(Side::White, fast);
    let mut last = None;
    let mut side = Side::Black;
    let mut passes = 0;
    while passes < 2 {
        let player = if side == Side::Black { &mut black } else { &mut white };
        let mv = player.do_move(last, 5_000).unwrap();
        passes = if mv.is_some() { 0 } else { passes + 1 };
        last = mv;
        side = side.opponent();
    }
    assert_eq!(black.board(), white.board());
    assert!(black.board().is_done());
}
