//! Score and depth arithmetic.
//!
//! Scores are centipawns from the perspective of one side, except near
//! the ends of the range where they encode mate distance: a score `s`
//! with `s >= MATE - MAX_MATE` means "mate in `MATE - s` plies for the
//! side to move", and symmetrically for losing scores. Alpha-beta keeps
//! every working value inside `[NEG_INFINITY, INFINITY]`, so the
//! arithmetic below never needs to saturate.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use chess_core::Move;
use serde::{Deserialize, Serialize};

/// The evaluation score for a chess position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Score(i16);

impl Score {
    pub const ZERO: Score = Score(0);
    /// Bound of the score range; only ever used as an alpha-beta window
    /// edge, never produced by evaluation or search.
    pub const INFINITY: Score = Score(32_000);
    pub const NEG_INFINITY: Score = Score(-32_000);
    /// Base of the mate encoding; `MATE - n` is "mate in `n` plies".
    pub const MATE: Score = Score(31_000);

    #[inline(always)]
    pub const fn new(value: i16) -> Score {
        Score(value)
    }

    #[inline(always)]
    pub const fn get(self) -> i16 {
        self.0
    }

    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whether this score encodes a forced mate for the side to move.
    #[inline(always)]
    pub const fn is_winning(self) -> bool {
        self.0 >= Self::MATE.0 - Depth::MAX_MATE.0
    }

    /// Whether this score encodes a forced mate against the side to move.
    #[inline(always)]
    pub const fn is_losing(self) -> bool {
        self.0 <= -(Self::MATE.0 - Depth::MAX_MATE.0)
    }

    #[inline(always)]
    pub const fn is_decisive(self) -> bool {
        self.is_winning() || self.is_losing()
    }

    /// Plies until mate. Only meaningful for decisive scores.
    #[inline(always)]
    pub const fn ply_to_mate(self) -> Depth {
        if self.is_negative() {
            Depth(Self::MATE.0 + self.0)
        } else {
            Depth(Self::MATE.0 - self.0)
        }
    }
}

impl Neg for Score {
    type Output = Score;
    #[inline(always)]
    fn neg(self) -> Score {
        Score(-self.0)
    }
}

impl Add for Score {
    type Output = Score;
    #[inline(always)]
    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl Sub for Score {
    type Output = Score;
    #[inline(always)]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0 - rhs.0)
    }
}

impl AddAssign for Score {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Score) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Score {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Score) {
        self.0 -= rhs.0;
    }
}

impl Mul<i16> for Score {
    type Output = Score;
    #[inline(always)]
    fn mul(self, rhs: i16) -> Score {
        Score(self.0 * rhs)
    }
}

/// Moving a mate score across a ply changes its distance, not its kind.
impl Add<Depth> for Score {
    type Output = Score;
    #[inline(always)]
    fn add(self, rhs: Depth) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl Sub<Depth> for Score {
    type Output = Score;
    #[inline(always)]
    fn sub(self, rhs: Depth) -> Score {
        Score(self.0 - rhs.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The remaining search horizon in plies (not the elapsed ply count).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Depth(i16);

impl Depth {
    pub const ZERO: Depth = Depth(0);
    pub const STEP: Depth = Depth(1);
    /// Upper bound on the plies-to-mate a score can encode; scores
    /// within this distance of `MATE` are decisive.
    pub const MAX_MATE: Depth = Depth(1_000);

    #[inline(always)]
    pub const fn new(value: i16) -> Depth {
        Depth(value)
    }

    #[inline(always)]
    pub const fn get(self) -> i16 {
        self.0
    }
}

impl Add for Depth {
    type Output = Depth;
    #[inline(always)]
    fn add(self, rhs: Depth) -> Depth {
        Depth(self.0 + rhs.0)
    }
}

impl Sub for Depth {
    type Output = Depth;
    #[inline(always)]
    fn sub(self, rhs: Depth) -> Depth {
        Depth(self.0 - rhs.0)
    }
}

impl AddAssign for Depth {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Depth) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A move together with the score the search assigned to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluatedMove {
    pub mv: Move,
    pub score: Score,
}

impl Default for EvaluatedMove {
    /// The null move at `NEG_INFINITY`: "nothing found yet".
    fn default() -> Self {
        EvaluatedMove {
            mv: Move::default(),
            score: Score::NEG_INFINITY,
        }
    }
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod score_tests;
