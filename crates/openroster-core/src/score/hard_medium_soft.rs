//! HardMediumSoftScore - Three-level score with hard, medium and soft constraints.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A score with hard, medium and soft constraint levels.
///
/// Hard constraints must be satisfied for feasibility (skills,
/// availability, rest rules, contract limits). The medium level counts
/// unassigned shifts. Soft constraints are preference objectives
/// (desired/undesired slots, rotation adherence).
///
/// Comparison order: hard > medium > soft. Any improvement on a higher
/// level dominates every difference on the levels below.
///
/// # Examples
///
/// ```
/// use openroster_core::HardMediumSoftScore;
///
/// let score1 = HardMediumSoftScore::of(0, -10, -100);
/// let score2 = HardMediumSoftScore::of(0, -5, -200);
///
/// // Better medium score wins even with worse soft score
/// assert!(score2 > score1);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HardMediumSoftScore {
    hard: i64,
    medium: i64,
    soft: i64,
}

impl HardMediumSoftScore {
    /// The zero score.
    pub const ZERO: HardMediumSoftScore = HardMediumSoftScore {
        hard: 0,
        medium: 0,
        soft: 0,
    };

    /// Creates a new HardMediumSoftScore.
    #[inline]
    pub const fn of(hard: i64, medium: i64, soft: i64) -> Self {
        HardMediumSoftScore { hard, medium, soft }
    }

    /// Creates a score with only a hard component.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardMediumSoftScore {
            hard,
            medium: 0,
            soft: 0,
        }
    }

    /// Creates a score with only a medium component.
    #[inline]
    pub const fn of_medium(medium: i64) -> Self {
        HardMediumSoftScore {
            hard: 0,
            medium,
            soft: 0,
        }
    }

    /// Creates a score with only a soft component.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardMediumSoftScore {
            hard: 0,
            medium: 0,
            soft,
        }
    }

    /// Returns the hard score component.
    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    /// Returns the medium score component.
    #[inline]
    pub const fn medium(&self) -> i64 {
        self.medium
    }

    /// Returns the soft score component.
    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// Returns true if no hard constraint is violated.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard >= 0
    }

    /// Component-wise addition that fails on i64 overflow.
    ///
    /// The score director accumulates deltas with this form so that a
    /// runaway accumulator surfaces as a scoring error instead of a
    /// wrapped value.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(HardMediumSoftScore {
            hard: self.hard.checked_add(other.hard)?,
            medium: self.medium.checked_add(other.medium)?,
            soft: self.soft.checked_add(other.soft)?,
        })
    }
}

impl Ord for HardMediumSoftScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => match self.medium.cmp(&other.medium) {
                Ordering::Equal => self.soft.cmp(&other.soft),
                other => other,
            },
            other => other,
        }
    }
}

impl PartialOrd for HardMediumSoftScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::ops::Add for HardMediumSoftScore {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        HardMediumSoftScore::of(
            self.hard + other.hard,
            self.medium + other.medium,
            self.soft + other.soft,
        )
    }
}

impl std::ops::Sub for HardMediumSoftScore {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        HardMediumSoftScore::of(
            self.hard - other.hard,
            self.medium - other.medium,
            self.soft - other.soft,
        )
    }
}

impl std::ops::Neg for HardMediumSoftScore {
    type Output = Self;

    fn neg(self) -> Self {
        HardMediumSoftScore::of(-self.hard, -self.medium, -self.soft)
    }
}

impl fmt::Debug for HardMediumSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HardMediumSoftScore({}, {}, {})",
            self.hard, self.medium, self.soft
        )
    }
}

impl fmt::Display for HardMediumSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}hard/{}medium/{}soft",
            self.hard, self.medium, self.soft
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_ordering() {
        // hard dominates medium and soft
        assert!(HardMediumSoftScore::of(-1, 100, 100) < HardMediumSoftScore::of(0, -100, -100));
        // medium dominates soft
        assert!(HardMediumSoftScore::of(0, -1, 100) < HardMediumSoftScore::of(0, 0, -100));
        // soft breaks ties
        assert!(HardMediumSoftScore::of(0, 0, -1) < HardMediumSoftScore::of(0, 0, 0));
        assert_eq!(
            HardMediumSoftScore::of(1, 2, 3),
            HardMediumSoftScore::of(1, 2, 3)
        );
    }

    #[test]
    fn arithmetic() {
        let a = HardMediumSoftScore::of(-10, -2, 5);
        let b = HardMediumSoftScore::of(-5, 1, -3);
        assert_eq!(a + b, HardMediumSoftScore::of(-15, -1, 2));
        assert_eq!(a - b, HardMediumSoftScore::of(-5, -3, 8));
        assert_eq!(-a, HardMediumSoftScore::of(10, 2, -5));
    }

    #[test]
    fn checked_add_detects_overflow() {
        let near_min = HardMediumSoftScore::of_hard(i64::MIN + 1);
        assert!(near_min.checked_add(HardMediumSoftScore::of_hard(-1)).is_some());
        assert!(near_min.checked_add(HardMediumSoftScore::of_hard(-2)).is_none());
    }

    #[test]
    fn feasibility() {
        assert!(HardMediumSoftScore::of(0, -5, -10).is_feasible());
        assert!(!HardMediumSoftScore::of(-1, 0, 0).is_feasible());
    }

    #[test]
    fn display_format() {
        let score = HardMediumSoftScore::of(-100, -3, 7);
        assert_eq!(score.to_string(), "-100hard/-3medium/7soft");
    }

    #[test]
    fn serde_round_trip() {
        let score = HardMediumSoftScore::of(-50, -1, 20);
        let json = serde_json::to_string(&score).unwrap();
        let back: HardMediumSoftScore = serde_json::from_str(&json).unwrap();
        assert_eq!(score, back);
    }
}
