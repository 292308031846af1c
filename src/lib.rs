//! Othello-Rust: an Othello (Reversi) engine with alpha-beta search.
//!
//! The engine keeps an 8x8 position in two bitboards, generates and applies
//! moves with O(1) undo, and picks moves by depth-limited minimax with
//! alpha-beta pruning over a configurable heuristic evaluation.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, evaluation scale, precomputed tables
//! - [`position`] - Board state, legality, move application and undo
//! - [`movegen`] - Legal move enumeration
//! - [`eval`] - Parity, mobility, corner and stability heuristics
//! - [`search`] - Minimax with alpha-beta pruning
//! - [`player`] - Turn-by-turn interface for a game harness
//! - [`protocol`] - Text protocol for GUIs and scripts
//!
//! ## Example
//!
//! ```
//! use othello_rust::{compute_move, legal_moves, new_game, score, Move, Side};
//!
//! let mut pos = new_game();
//! assert_eq!(legal_moves(&pos, Side::Black).len(), 4);
//!
//! // Play c4 for black: it flips d4
//! pos.apply_checked(Move::new(2, 3), Side::Black).unwrap();
//! assert_eq!((pos.count_black(), pos.count_white()), (4, 1));
//!
//! // Search a reply for white
//! let reply = compute_move(&pos, Side::White, 3).expect("white can move");
//! assert!(pos.is_legal(reply, Side::White));
//! assert!(score(&pos, Side::Black) > 0);
//! ```

pub mod constants;
pub mod eval;
pub mod movegen;
pub mod player;
pub mod position;
pub mod protocol;
pub mod search;

pub use eval::{EvalConfig, Evaluator, score};
pub use movegen::legal_moves;
pub use player::Player;
pub use position::{Move, MoveError, ParseError, Position, Side, UndoRecord, apply_move};
pub use search::{PassPolicy, SearchParams, SearchResult, Searcher, compute_move};

/// A new game in the standard starting position.
pub fn new_game() -> Position {
    Position::new()
}
