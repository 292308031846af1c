//! Heuristic position evaluation.
//!
//! A score is the sum of independent sub-scores, each computed from one
//! side's perspective and scaled to `[-NORMALIZATION, NORMALIZATION]`:
//!
//! - **parity**: disk count difference over total disks
//! - **mobility**: legal move count difference over total legal moves
//! - **corners**: corner ownership difference over the 4 corners
//! - **stability**: difference in disks that can never be flipped, over 64
//!
//! [`EvalConfig`] selects which terms are summed. Positive means `side` is
//! ahead. The sum is a ranking signal only and is not renormalized.

use log::trace;

use crate::constants::{AXIS_LINES, AXIS_NEIGHBORS, CORNERS, NORMALIZATION, NUM_SQUARES};
use crate::movegen::mobility;
use crate::position::{Position, Side};

/// Which heuristic terms are active, plus optional evaluation noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub parity: bool,
    pub mobility: bool,
    pub corners: bool,
    pub stability: bool,
    /// Amplitude of uniform noise added to each score (0 = deterministic)
    pub noise: i32,
    /// Seed for the noise generator; `None` seeds from the environment
    pub seed: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            parity: true,
            mobility: false,
            corners: true,
            stability: true,
            noise: 0,
            seed: None,
        }
    }
}

/// Per-term scores for one side. Disabled terms are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub parity: i32,
    pub mobility: i32,
    pub corners: i32,
    pub stability: i32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.parity + self.mobility + self.corners + self.stability
    }
}

/// `NORMALIZATION * (mine - theirs) / denom`, or 0 when nobody scores.
#[inline]
fn normalized(mine: u32, theirs: u32, denom: u32) -> i32 {
    if mine + theirs == 0 {
        return 0;
    }
    NORMALIZATION * (mine as i32 - theirs as i32) / denom as i32
}

/// Disk count difference relative to all disks on the board.
pub fn stone_parity(pos: &Position, side: Side) -> i32 {
    let mine = pos.count(side);
    let theirs = pos.count(side.opponent());
    normalized(mine, theirs, mine + theirs)
}

/// Legal move count difference relative to all legal moves.
pub fn mobility_score(pos: &Position, side: Side) -> i32 {
    let mine = mobility(pos, side);
    let theirs = mobility(pos, side.opponent());
    normalized(mine, theirs, mine + theirs)
}

/// Corner ownership difference out of the four corners.
pub fn corner_score(pos: &Position, side: Side) -> i32 {
    let mine = (pos.side_mask(side) & CORNERS).count_ones();
    let theirs = (pos.side_mask(side.opponent()) & CORNERS).count_ones();
    normalized(mine, theirs, 4)
}

/// Stable disk difference out of all 64 squares.
pub fn stability_score(pos: &Position, side: Side) -> i32 {
    let stable = stable_disks(pos);
    normalized(stable.count(side), stable.count(side.opponent()), NUM_SQUARES as u32)
}

/// Compute every term, honoring the toggles in `config`.
pub fn breakdown(pos: &Position, side: Side, config: &EvalConfig) -> ScoreBreakdown {
    ScoreBreakdown {
        parity: if config.parity { stone_parity(pos, side) } else { 0 },
        mobility: if config.mobility { mobility_score(pos, side) } else { 0 },
        corners: if config.corners { corner_score(pos, side) } else { 0 },
        stability: if config.stability { stability_score(pos, side) } else { 0 },
    }
}

/// Deterministic score: the sum of the enabled terms (noise is not applied).
pub fn evaluate(pos: &Position, side: Side, config: &EvalConfig) -> i32 {
    breakdown(pos, side, config).total()
}

/// Score with the default term selection.
pub fn score(pos: &Position, side: Side) -> i32 {
    evaluate(pos, side, &EvalConfig::default())
}

/// Stateful evaluator owning the configuration and the noise generator.
pub struct Evaluator {
    config: EvalConfig,
    rng: fastrand::Rng,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

impl Evaluator {
    pub fn new(config: EvalConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Score `pos` for `side`, adding noise in `[-noise, noise]` if enabled.
    pub fn score(&mut self, pos: &Position, side: Side) -> i32 {
        let base = evaluate(pos, side, &self.config);
        if self.config.noise > 0 {
            base + self.rng.i32(-self.config.noise..=self.config.noise)
        } else {
            base
        }
    }
}

// =============================================================================
// Stability
// =============================================================================

/// Stable disks of each color, plus how many propagation passes were run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stability {
    pub black: u64,
    pub white: u64,
    /// Propagation passes, including the final pass that found nothing new
    pub passes: u32,
}

impl Stability {
    pub fn mask(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    pub fn count(&self, side: Side) -> u32 {
        self.mask(side).count_ones()
    }
}

/// A disk is settled along an axis if it sits on that axis' boundary, the
/// whole line is full, or a neighbor on the axis is in `stable_same`.
#[inline]
fn axis_settled(sq: usize, axis: usize, occupied: u64, stable_same: u64) -> bool {
    let neighbors = AXIS_NEIGHBORS[axis][sq];
    neighbors.count_ones() < 2
        || AXIS_LINES[axis][sq] & !occupied == 0
        || neighbors & stable_same != 0
}

#[inline]
fn settled(sq: usize, occupied: u64, stable_same: u64) -> bool {
    (0..AXIS_LINES.len()).all(|axis| axis_settled(sq, axis, occupied, stable_same))
}

/// Disks stable by the boundary and full-line rules alone.
pub fn seed_stable(pos: &Position) -> Stability {
    let occupied = pos.occupied_mask();
    let black = pos.side_mask(Side::Black);
    let mut stable = Stability::default();
    for sq in 0..NUM_SQUARES {
        let bit = 1u64 << sq;
        if occupied & bit == 0 || !settled(sq, occupied, 0) {
            continue;
        }
        if black & bit != 0 {
            stable.black |= bit;
        } else {
            stable.white |= bit;
        }
    }
    stable
}

/// All stable disks: the seed set grown to a fixed point by letting disks
/// lean on already-stable neighbors of their own color.
///
/// Each pass only adds disks, so the loop ends after at most 64 passes.
pub fn stable_disks(pos: &Position) -> Stability {
    let occupied = pos.occupied_mask();
    let black = pos.side_mask(Side::Black);
    let mut stable = seed_stable(pos);

    loop {
        stable.passes += 1;
        let mut added = 0u32;
        for sq in 0..NUM_SQUARES {
            let bit = 1u64 << sq;
            if occupied & bit == 0 || (stable.black | stable.white) & bit != 0 {
                continue;
            }
            let is_black = black & bit != 0;
            let same = if is_black { stable.black } else { stable.white };
            if settled(sq, occupied, same) {
                if is_black {
                    stable.black |= bit;
                } else {
                    stable.white |= bit;
                }
                added += 1;
            }
        }
        trace!(
            "stability pass {}: +{added} (black {}, white {})",
            stable.passes,
            stable.black.count_ones(),
            stable.white.count_ones()
        );
        if added == 0 {
            return stable;
        }
    }
}
