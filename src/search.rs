//! Depth-limited minimax search with alpha-beta pruning.
//!
//! The searcher explores a single mutable [`Position`]: each candidate is
//! applied with [`Position::apply_unchecked`], searched, and taken back with
//! [`Position::undo`] before the next sibling, so the caller's position is
//! unchanged when a search returns.
//!
//! Scores are always from the root side's perspective. Maximizing nodes
//! belong to the root side, minimizing nodes to its opponent. Among equal
//! scores the first move in generation order wins.

use log::debug;

use crate::constants::DEFAULT_DEPTH;
use crate::eval::{EvalConfig, Evaluator};
use crate::movegen::legal_moves;
use crate::position::{Move, Position, Side};

/// What to do at an interior node whose side to move has no legal move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PassPolicy {
    /// Score the position immediately.
    #[default]
    Evaluate,
    /// Let the other side move at the same remaining depth; score only if
    /// neither side can move.
    Recurse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Lookahead in plies
    pub depth: u32,
    /// Cut off siblings once `beta <= alpha`; disabling gives plain minimax
    pub pruning: bool,
    pub pass_policy: PassPolicy,
    pub eval: EvalConfig,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            pruning: true,
            pass_policy: PassPolicy::default(),
            eval: EvalConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move, or `None` when the root side must pass
    pub best: Option<Move>,
    pub score: i32,
    /// Nodes visited, leaves included
    pub nodes: u64,
}

pub struct Searcher {
    params: SearchParams,
    evaluator: Evaluator,
    root_side: Side,
    nodes: u64,
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchParams::default())
    }
}

impl Searcher {
    pub fn new(params: SearchParams) -> Self {
        Self {
            params,
            evaluator: Evaluator::new(params.eval),
            root_side: Side::Black,
            nodes: 0,
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.params.depth = depth;
    }

    /// Search `pos` for `side` at the configured depth.
    ///
    /// `pos` is mutated during the search and restored before returning.
    pub fn search(&mut self, pos: &mut Position, side: Side) -> SearchResult {
        self.root_side = side;
        self.nodes = 0;
        let (best, score) = self.alphabeta(pos, self.params.depth, i32::MIN, i32::MAX, true);
        debug!(
            "search {side} depth={} best={} score={score} nodes={}",
            self.params.depth,
            best.map_or_else(|| "pass".to_string(), |mv| mv.to_string()),
            self.nodes
        );
        SearchResult {
            best,
            score,
            nodes: self.nodes,
        }
    }

    #[inline]
    fn leaf(&mut self, pos: &Position) -> i32 {
        self.evaluator.score(pos, self.root_side)
    }

    fn alphabeta(
        &mut self,
        pos: &mut Position,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> (Option<Move>, i32) {
        self.nodes += 1;
        if depth == 0 {
            return (None, self.leaf(pos));
        }

        let side = if maximizing {
            self.root_side
        } else {
            self.root_side.opponent()
        };
        let moves = legal_moves(pos, side);
        if moves.is_empty() {
            return match self.params.pass_policy {
                PassPolicy::Recurse if pos.has_moves(side.opponent()) => {
                    let (_, score) = self.alphabeta(pos, depth, alpha, beta, !maximizing);
                    (None, score)
                }
                _ => (None, self.leaf(pos)),
            };
        }

        let mut best_move = None;
        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        for mv in moves {
            let undo = pos.apply_unchecked(mv, side);
            let (_, score) = self.alphabeta(pos, depth - 1, alpha, beta, !maximizing);
            pos.undo(undo);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }

            if self.params.pruning && beta <= alpha {
                break;
            }
        }
        (best_move, best_score)
    }
}

/// Best move for `side` at `depth` plies with the default evaluation, or
/// `None` if `side` has to pass.
pub fn compute_move(pos: &Position, side: Side, depth: u32) -> Option<Move> {
    let mut scratch = pos.copy();
    let params = SearchParams {
        depth,
        ..SearchParams::default()
    };
    Searcher::new(params).search(&mut scratch, side).best
}
