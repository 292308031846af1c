//! Turn-by-turn player for driving the engine from a game harness.
//!
//! A [`Player`] keeps its own copy of the board. Each turn the harness hands
//! it the opponent's last move (`None` when the opponent passed or on the
//! very first move) and the remaining clock, and gets back the player's own
//! move (`None` = pass). The player applies both moves to its board.

use log::info;

use crate::position::{Move, MoveError, Position, Side};
use crate::search::{SearchParams, Searcher};

pub struct Player {
    board: Position,
    side: Side,
    searcher: Searcher,
}

impl Player {
    /// A player for `side` with default search settings.
    pub fn new(side: Side) -> Self {
        Self::with_params(side, SearchParams::default())
    }

    pub fn with_params(side: Side, params: SearchParams) -> Self {
        Self {
            board: Position::new(),
            side,
            searcher: Searcher::new(params),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn board(&self) -> &Position {
        &self.board
    }

    /// Replace the tracked board, e.g. to start from a prepared position.
    pub fn set_board(&mut self, board: Position) {
        self.board = board;
    }

    /// Apply the opponent's move, then pick, apply and return our own.
    ///
    /// `ms_left` is the remaining game clock in milliseconds (-1 for no
    /// limit). It is recorded in the log only; the search depth is fixed.
    ///
    /// # Errors
    /// Returns the [`MoveError`] for an illegal opponent move; the board is
    /// left untouched in that case.
    pub fn do_move(
        &mut self,
        opponents_move: Option<Move>,
        ms_left: i64,
    ) -> Result<Option<Move>, MoveError> {
        if let Some(mv) = opponents_move {
            self.board.apply_checked(mv, self.side.opponent())?;
        }

        let result = self.searcher.search(&mut self.board, self.side);
        if let Some(mv) = result.best {
            self.board.apply_unchecked(mv, self.side);
        }
        info!(
            "{} plays {} (score {}, {} nodes, {ms_left} ms left)",
            self.side,
            result.best.map_or_else(|| "pass".to_string(), |mv| mv.to_string()),
            result.score,
            result.nodes
        );
        Ok(result.best)
    }
}

/// Play `black` against `white` until both pass in a row.
///
/// `on_move` sees each side's choice and the mover's board after it.
/// Returns the final position.
pub fn play_game(
    black: &mut Player,
    white: &mut Player,
    mut on_move: impl FnMut(Side, Option<Move>, &Position),
) -> Result<Position, MoveError> {
    let mut side = Side::Black;
    let mut last: Option<Move> = None;
    let mut passes = 0;
    let mut board = *black.board();

    while passes < 2 {
        let player = match side {
            Side::Black => &mut *black,
            Side::White => &mut *white,
        };
        let mv = player.do_move(last, -1)?;
        board = *player.board();
        on_move(side, mv, &board);

        passes = if mv.is_some() { 0 } else { passes + 1 };
        last = mv;
        side = side.opponent();
    }
    Ok(board)
}
