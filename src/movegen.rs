//! Legal move generation.
//!
//! Moves are enumerated with `x` in the outer loop and `y` in the inner loop
//! (a1, a2, ..., a8, b1, ...). The search keeps the first move among equal
//! scores, so this order decides ties and must stay fixed.

use crate::constants::N;
use crate::position::{Move, Position, Side};

/// All legal moves for `side`, in generation order.
pub fn legal_moves(pos: &Position, side: Side) -> Vec<Move> {
    let mut moves = Vec::with_capacity(32);
    for x in 0..N as i32 {
        for y in 0..N as i32 {
            let mv = Move::new(x, y);
            if pos.is_legal(mv, side) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Legal destinations for `side` as a bitboard.
pub fn legal_mask(pos: &Position, side: Side) -> u64 {
    legal_moves(pos, side)
        .iter()
        .fold(0, |mask, mv| mask | mv.bit())
}

/// Number of legal moves for `side`.
pub fn mobility(pos: &Position, side: Side) -> u32 {
    legal_mask(pos, side).count_ones()
}
