//! Othello position representation and move execution.
//!
//! This module provides the core game logic, including:
//! - Bitboard state: one mask of occupied squares, one of black disks
//! - Flank detection and legality testing
//! - Checked and unchecked move application
//! - O(1) undo from an [`UndoRecord`] so the search can explore and revert
//!   a single position instead of copying one per node
//!
//! The engine never switches turns on its own: every operation takes the
//! [`Side`] it acts for, and passing is the caller's business.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{DIRECTIONS, FULL_BOARD, N, NUM_SQUARES};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "black"),
            Side::White => write!(f, "white"),
        }
    }
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Side::Black),
            "w" | "white" => Ok(Side::White),
            _ => Err(ParseError::Side(s.to_string())),
        }
    }
}

/// A disk placement at `(x, y)`.
///
/// Coordinates are signed so that off-board moves can be represented and
/// rejected. Passing is not a `Move`; it is expressed as `Option::None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub x: i32,
    pub y: i32,
}

impl Move {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_on_board(&self) -> bool {
        on_board(self.x, self.y)
    }

    /// Bit index of the destination square, or `None` when off the board.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.is_on_board()
            .then(|| self.x as usize + N * self.y as usize)
    }

    /// Single-bit mask of the destination square (0 when off the board).
    #[inline]
    pub fn bit(&self) -> u64 {
        self.index().map_or(0, |sq| 1u64 << sq)
    }

    #[inline]
    pub(crate) fn from_index(sq: usize) -> Self {
        Self::new((sq % N) as i32, (sq / N) as i32)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            let col = (b'a' + self.x as u8) as char;
            write!(f, "{col}{}", self.y + 1)
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

impl FromStr for Move {
    type Err = ParseError;

    /// Parse a coordinate such as `"d3"` (column letter, row number).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::Coord(s.to_string()));
        }
        let col = bytes[0].to_ascii_lowercase();
        let row = bytes[1];
        if !(b'a'..b'a' + N as u8).contains(&col) || !(b'1'..b'1' + N as u8).contains(&row) {
            return Err(ParseError::Coord(s.to_string()));
        }
        Ok(Move::new((col - b'a') as i32, (row - b'1') as i32))
    }
}

/// True iff `0 <= x, y < 8`.
#[inline]
pub fn on_board(x: i32, y: i32) -> bool {
    (0..N as i32).contains(&x) && (0..N as i32).contains(&y)
}

/// Errors from the checked move path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The move's coordinates are outside `[0, 8)`.
    #[error("illegal move: ({x}, {y}) is off the board")]
    OutOfBounds { x: i32, y: i32 },
    /// The destination is occupied or flanks nothing.
    #[error("illegal move: {mv} for {side}")]
    Illegal { mv: Move, side: Side },
}

/// Errors from parsing coordinates, sides, and board text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid coordinate {0:?}")]
    Coord(String),
    #[error("invalid side {0:?}")]
    Side(String),
    #[error("invalid board cell {0:?}")]
    Cell(char),
    #[error("board has {0} cells, expected 64")]
    CellCount(usize),
}

/// Everything needed to take back one move: the placed square, the mover,
/// and the mask of disks it flipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UndoRecord {
    pub mv: Move,
    pub side: Side,
    pub flipped: u64,
}

impl UndoRecord {
    /// Number of opponent disks turned over by the move.
    pub fn flipped_count(&self) -> u32 {
        self.flipped.count_ones()
    }

    /// The flipped squares in bit-index order.
    pub fn flipped_squares(&self) -> impl Iterator<Item = Move> + '_ {
        (0..NUM_SQUARES)
            .filter(|&sq| self.flipped & (1u64 << sq) != 0)
            .map(Move::from_index)
    }
}

/// An Othello position.
///
/// `black` bits outside `occupied` are kept at zero so that two equal
/// positions are always bit-for-bit equal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Squares holding a disk of either color
    occupied: u64,
    /// Occupied squares whose disk is black
    black: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting position: white on d4 and e5, black on e4 and d5.
    pub fn new() -> Self {
        let d4 = Move::new(3, 3).bit();
        let e4 = Move::new(4, 3).bit();
        let d5 = Move::new(3, 4).bit();
        let e5 = Move::new(4, 4).bit();
        Self {
            occupied: d4 | e4 | d5 | e5,
            black: e4 | d5,
        }
    }

    /// A board with no disks at all.
    pub fn empty() -> Self {
        Self {
            occupied: 0,
            black: 0,
        }
    }

    /// Build a position from raw masks. Black bits outside `occupied` are dropped.
    pub fn from_masks(occupied: u64, black: u64) -> Self {
        Self {
            occupied,
            black: black & occupied,
        }
    }

    /// Independent value copy, free to mutate outside the undo protocol.
    #[inline]
    pub fn copy(&self) -> Position {
        *self
    }

    #[inline]
    pub fn occupied_mask(&self) -> u64 {
        self.occupied
    }

    /// Mask of the disks belonging to `side`.
    #[inline]
    pub fn side_mask(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.black,
            Side::White => self.occupied & !self.black,
        }
    }

    pub fn occupied(&self, x: i32, y: i32) -> bool {
        self.occupied & Move::new(x, y).bit() != 0
    }

    /// True iff `(x, y)` holds a disk of `side`.
    pub fn color_at(&self, side: Side, x: i32, y: i32) -> bool {
        self.side_mask(side) & Move::new(x, y).bit() != 0
    }

    /// The owner of `(x, y)`, if any.
    pub fn get(&self, x: i32, y: i32) -> Option<Side> {
        if self.color_at(Side::Black, x, y) {
            Some(Side::Black)
        } else if self.color_at(Side::White, x, y) {
            Some(Side::White)
        } else {
            None
        }
    }

    /// Disks that `side` would flip by playing `mv`.
    ///
    /// Returns 0 for off-board or occupied destinations, which is exactly
    /// the set of illegal moves.
    pub fn flips(&self, mv: Move, side: Side) -> u64 {
        let placed = mv.bit();
        if placed == 0 || self.occupied & placed != 0 {
            return 0;
        }
        let mine = self.side_mask(side);
        let theirs = self.side_mask(side.opponent());

        let mut flips = 0u64;
        for (dx, dy) in DIRECTIONS {
            let mut run = 0u64;
            let (mut x, mut y) = (mv.x + dx, mv.y + dy);
            while on_board(x, y) {
                let bit = Move::new(x, y).bit();
                if theirs & bit != 0 {
                    run |= bit;
                    x += dx;
                    y += dy;
                    continue;
                }
                // A run closed by our own disk is flanked; an empty square ends it
                if mine & bit != 0 {
                    flips |= run;
                }
                break;
            }
        }
        flips
    }

    /// A move is legal iff its destination is empty, on the board, and it
    /// flanks at least one run of opponent disks.
    #[inline]
    pub fn is_legal(&self, mv: Move, side: Side) -> bool {
        self.flips(mv, side) != 0
    }

    /// Play `mv` for `side` after validating it.
    ///
    /// # Errors
    /// - [`MoveError::OutOfBounds`] - if the coordinates are outside the board
    /// - [`MoveError::Illegal`] - if the destination is occupied or flanks nothing
    pub fn apply_checked(&mut self, mv: Move, side: Side) -> Result<UndoRecord, MoveError> {
        if !mv.is_on_board() {
            return Err(MoveError::OutOfBounds { x: mv.x, y: mv.y });
        }
        let flipped = self.flips(mv, side);
        if flipped == 0 {
            return Err(MoveError::Illegal { mv, side });
        }
        Ok(self.place(mv, side, flipped))
    }

    /// Play `mv` for `side` without validation.
    ///
    /// The caller guarantees legality (normally because the move came from
    /// the move generator). An illegal move leaves the position in an
    /// unspecified state.
    #[inline]
    pub fn apply_unchecked(&mut self, mv: Move, side: Side) -> UndoRecord {
        debug_assert!(mv.is_on_board(), "unchecked move {mv} is off the board");
        let flipped = self.flips(mv, side);
        self.place(mv, side, flipped)
    }

    fn place(&mut self, mv: Move, side: Side, flipped: u64) -> UndoRecord {
        let placed = mv.bit();
        self.occupied |= placed;
        match side {
            Side::Black => self.black |= placed | flipped,
            Side::White => self.black &= !(placed | flipped),
        }
        UndoRecord { mv, side, flipped }
    }

    /// Take back the move described by `undo`, restoring the exact prior state.
    #[inline]
    pub fn undo(&mut self, undo: UndoRecord) {
        let placed = undo.mv.bit();
        self.occupied &= !placed;
        match undo.side {
            Side::Black => self.black &= !(placed | undo.flipped),
            Side::White => self.black |= undo.flipped,
        }
    }

    /// True iff `side` has at least one legal move.
    pub fn has_moves(&self, side: Side) -> bool {
        let empty = !self.occupied;
        (0..NUM_SQUARES)
            .filter(|&sq| empty & (1u64 << sq) != 0)
            .any(|sq| self.flips(Move::from_index(sq), side) != 0)
    }

    /// True iff the board is full or neither side can move.
    pub fn is_done(&self) -> bool {
        self.occupied == FULL_BOARD || (!self.has_moves(Side::Black) && !self.has_moves(Side::White))
    }

    #[inline]
    pub fn count(&self, side: Side) -> u32 {
        self.side_mask(side).count_ones()
    }

    #[inline]
    pub fn count_black(&self) -> u32 {
        self.count(Side::Black)
    }

    #[inline]
    pub fn count_white(&self) -> u32 {
        self.count(Side::White)
    }

    #[inline]
    pub fn count_empty(&self) -> u32 {
        self.occupied.count_zeros()
    }
}

/// Validate and play `mv` for `side` on `pos`.
pub fn apply_move(pos: &mut Position, mv: Move, side: Side) -> Result<(), MoveError> {
    pos.apply_checked(mv, side).map(|_| ())
}

impl FromStr for Position {
    type Err = ParseError;

    /// Parse 64 cells in row order (`a1..h1`, then `a2..h2`, ...).
    ///
    /// `b`/`x` mark black, `w`/`o` mark white (either case), and `.`, `-` or
    /// `_` mark an empty square. Whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != NUM_SQUARES {
            return Err(ParseError::CellCount(cells.len()));
        }
        let mut occupied = 0u64;
        let mut black = 0u64;
        for (sq, &ch) in cells.iter().enumerate() {
            let bit = 1u64 << sq;
            match ch.to_ascii_lowercase() {
                'b' | 'x' => {
                    occupied |= bit;
                    black |= bit;
                }
                'w' | 'o' => occupied |= bit,
                '.' | '-' | '_' => {}
                _ => return Err(ParseError::Cell(ch)),
            }
        }
        Ok(Self::from_masks(occupied, black))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for x in 0..N {
            write!(f, " {}", (b'a' + x as u8) as char)?;
        }
        writeln!(f)?;
        for y in 0..N as i32 {
            write!(f, "{}", y + 1)?;
            for x in 0..N as i32 {
                let ch = match self.get(x, y) {
                    Some(Side::Black) => 'X',
                    Some(Side::White) => 'O',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
