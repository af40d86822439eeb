//! Per-player summary statistics over recent match totals.

use super::types::PlayedMatch;
use crate::config::EngineConfig;
use serde::Serialize;

/// Figures derived from one player's history.
///
/// `mean` is informational: the estimate is built from `weighted_mean`, and
/// only `dispersion` feeds confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerStats {
    pub matches_used: usize,
    pub mean: f64,
    pub dispersion: f64,
    pub weighted_mean: f64,
}

/// Totals of the first `limit` matches, most recent first.
pub fn match_totals(history: &[PlayedMatch], limit: usize) -> Vec<f64> {
    history
        .iter()
        .take(limit)
        .map(|m| m.total() as f64)
        .collect()
}

/// Arithmetic mean and sample standard deviation (Bessel's correction).
///
/// Mean is 0.0 for no totals; dispersion is 0.0 for fewer than two.
pub fn mean_and_dispersion(totals: &[f64]) -> (f64, f64) {
    if totals.is_empty() {
        return (0.0, 0.0);
    }
    let n = totals.len() as f64;
    let mean = totals.iter().sum::<f64>() / n;
    if totals.len() < 2 {
        return (mean, 0.0);
    }
    let sum_sq: f64 = totals.iter().map(|t| (t - mean) * (t - mean)).sum();
    let variance = sum_sq / (n - 1.0);
    (mean, variance.sqrt())
}

/// Recency-weighted mean of the first `max_history` totals.
///
/// The leading `recent_count` positions carry `recent_weight`, the rest
/// `base_weight`. The divisor is the sum of weights actually applied, so a
/// short history is not padded. An empty history yields `empty_history_mean`.
pub fn weighted_mean(totals: &[f64], config: &EngineConfig) -> f64 {
    let used = &totals[..totals.len().min(config.max_history)];
    if used.is_empty() {
        return config.empty_history_mean;
    }
    let (sum, weight_sum) = used
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, weight_sum), (i, total)| {
            let w = if i < config.recent_count {
                config.recent_weight
            } else {
                config.base_weight
            };
            (sum + w * total, weight_sum + w)
        });
    sum / weight_sum
}

/// Steps 1 and 2 for one player.
pub fn player_stats(history: &[PlayedMatch], config: &EngineConfig) -> PlayerStats {
    let totals = match_totals(history, config.max_history);
    let (mean, dispersion) = mean_and_dispersion(&totals);
    PlayerStats {
        matches_used: totals.len(),
        mean,
        dispersion,
        weighted_mean: weighted_mean(&totals, config),
    }
}
