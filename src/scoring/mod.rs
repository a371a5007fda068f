//! Score normalization and fusion
//!
//! # Heuristic score
//!
//! The aggregated [`HeuristicMetrics`](crate::models::HeuristicMetrics) are
//! mapped to 0-10 by an additive point rubric:
//!
//! ```text
//! Signal                 Condition                       Points
//! avg line length        <100 / <120 / else              2 / 1 / 0
//! avg function length    none found / <30 / <50 / else   1 / 2 / 1 / 0
//! avg nesting depth      <3 / <4 / else                  2 / 1 / 0
//! comment ratio          >0.1                            1
//! type hints present                                     1
//! avg complexity         <5 (incl. 0) / <8 / else        2 / 1 / 0
//! has tests                                              1
//! ```
//!
//! The raw maximum is 11; the result is capped at 10.0.
//!
//! # Fusion
//!
//! ```text
//! score = clamp(round(0.3 × heuristic + 0.7 × qualitative, 1), 0, 10)
//! ```

mod fusion;
mod normalizer;

pub use fusion::{fuse, merge_metrics, FusionEngine, HEURISTIC_WEIGHT, QUALITATIVE_WEIGHT};
pub use normalizer::{normalize, MAX_SCORE};
