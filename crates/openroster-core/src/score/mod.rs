//! Three-level lexicographic score for roster quality.

mod hard_medium_soft;

pub use hard_medium_soft::HardMediumSoftScore;
