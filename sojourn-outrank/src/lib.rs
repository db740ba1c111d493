//! Outranking engine for Sojourn recommendations.
//!
//! The crate turns oriented criterion rows into a recommendation in four
//! stages:
//! - **Credibility**: pairwise concordance, discordance and the discounted
//!   credibility `S(a, b)` of "a is at least as good as b".
//! - **Distillation**: a total preorder with ties, extracted best first
//!   (optionally combined with the ascending pass).
//! - **Kernel**: the best-ranked distinct candidates, each with a weighted
//!   power-mean compromise utility.
//! - **Explanation**: criterion shares of the utility, pairwise reasons and
//!   a summary of consecutive kernel members.
//!
//! [`OutrankingRecommender`] chains these behind the
//! [`Recommender`](sojourn_core::Recommender) trait.
//!
//! # Examples
//!
//! ```
//! use sojourn_core::{CriterionWeights, EngineConfig};
//! use sojourn_outrank::{CredibilityMatrix, descending};
//!
//! let config = EngineConfig::default()
//!     .with_weights(CriterionWeights::new([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0]));
//! let rows = [
//!     [0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.0],
//!     [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.0],
//! ];
//! let matrix = CredibilityMatrix::build(&rows, &config)?;
//! let preorder = descending(&matrix, &["A", "B"], config.discrimination)?;
//! assert_eq!(preorder.ranks(), &[1, 2]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod credibility;
mod distillation;
mod engine;
mod error;
mod explain;
mod kernel;

pub use credibility::{
    CredibilityMatrix, OrientedRow, OutrankingModel, concordance, discordance,
};
pub use distillation::{Preorder, ascending, combined, descending, distill};
pub use engine::OutrankingRecommender;
pub use error::OutrankError;
pub use explain::{
    Attribution, Contribution, CriterionGap, DecidingFactor, Explainer, MAX_LISTED_GAPS,
    PairwiseExplanation,
};
pub use kernel::{CompromiseAggregator, Utility, select_kernel};
