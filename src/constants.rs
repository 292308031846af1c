//! Constants for board geometry, evaluation scale, and search defaults.
//!
//! Squares are addressed by `(x, y)` with both coordinates in `0..N`.
//! Bitboards use bit index `x + N * y`, so bit 0 is `(0, 0)` ("a1") and
//! bit 63 is `(7, 7)` ("h8").
//!
//! The line and neighbor tables used by the stability analysis are built at
//! compile time by `const fn`s, so the evaluator never recomputes geometry.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Only the standard 8x8 board is supported.
pub const N: usize = 8;

/// Number of squares on the board.
pub const NUM_SQUARES: usize = N * N;

/// Bitboard with every square set.
pub const FULL_BOARD: u64 = u64::MAX;

/// Bitboard of the four corner squares.
pub const CORNERS: u64 = 1 | (1 << 7) | (1 << 56) | (1 << 63);

/// The 8 compass directions as `(dx, dy)` steps, used for flank scanning.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The 4 axes through a square: row, column, and both diagonals.
/// Each axis is named by one of its two directions.
pub const AXES: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

// =============================================================================
// Evaluation and Search
// =============================================================================

/// Scale of every heuristic sub-score: each term lies in
/// `[-NORMALIZATION, NORMALIZATION]`.
pub const NORMALIZATION: i32 = 10_000;

/// Default lookahead depth in plies.
pub const DEFAULT_DEPTH: u32 = 6;

// =============================================================================
// Precomputed Axis Tables
// =============================================================================

/// `AXIS_LINES[a][sq]` is the full line through `sq` along axis `a`,
/// including `sq` itself.
pub const AXIS_LINES: [[u64; NUM_SQUARES]; 4] = build_axis_lines();

/// `AXIS_NEIGHBORS[a][sq]` holds the (up to two) squares adjacent to `sq`
/// along axis `a`. Fewer than two bits means `sq` sits on that axis' boundary.
pub const AXIS_NEIGHBORS: [[u64; NUM_SQUARES]; 4] = build_axis_neighbors();

const fn on_board(x: i32, y: i32) -> bool {
    x >= 0 && x < N as i32 && y >= 0 && y < N as i32
}

const fn build_axis_lines() -> [[u64; NUM_SQUARES]; 4] {
    let mut table = [[0u64; NUM_SQUARES]; 4];
    let mut a = 0;
    while a < AXES.len() {
        let (dx, dy) = AXES[a];
        let mut sq = 0;
        while sq < NUM_SQUARES {
            let x0 = (sq % N) as i32;
            let y0 = (sq / N) as i32;
            let mut mask = 1u64 << sq;
            let mut sign = -1;
            while sign <= 1 {
                let mut x = x0 + sign * dx;
                let mut y = y0 + sign * dy;
                while on_board(x, y) {
                    mask |= 1u64 << (x + N as i32 * y);
                    x += sign * dx;
                    y += sign * dy;
                }
                sign += 2;
            }
            table[a][sq] = mask;
            sq += 1;
        }
        a += 1;
    }
    table
}

const fn build_axis_neighbors() -> [[u64; NUM_SQUARES]; 4] {
    let mut table = [[0u64; NUM_SQUARES]; 4];
    let mut a = 0;
    while a < AXES.len() {
        let (dx, dy) = AXES[a];
        let mut sq = 0;
        while sq < NUM_SQUARES {
            let x = (sq % N) as i32;
            let y = (sq / N) as i32;
            let mut mask = 0u64;
            if on_board(x + dx, y + dy) {
                mask |= 1u64 << (x + dx + N as i32 * (y + dy));
            }
            if on_board(x - dx, y - dy) {
                mask |= 1u64 << (x - dx + N as i32 * (y - dy));
            }
            table[a][sq] = mask;
            sq += 1;
        }
        a += 1;
    }
    table
}
