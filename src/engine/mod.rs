pub mod prediction;
pub mod stats;
pub mod types;

pub use prediction::{analyze, compute_prediction, compute_prediction_with, Analysis, Prediction, Verdict};
pub use stats::PlayerStats;
pub use types::{MatchFixture, PlayedMatch, PlayerHistory, SetScore};
