//! Total-points estimate for a single fixture.
//!
//! Pipeline, for each side: recency-weighted mean of recent match totals and
//! the sample dispersion of those totals. The expected total is the average of
//! both weighted means; confidence falls linearly with the average dispersion.
//!
//! Everything here is a pure function of its inputs.

use super::stats::{player_stats, PlayerStats};
use super::types::PlayedMatch;
use crate::config::{EngineConfig, VerdictPolicy};
use serde::Serialize;
use std::fmt;

/// Call against the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Over,
    Under,
    /// Estimate too close to the line to call pre-match.
    AvoidLive,
}

impl Verdict {
    pub fn classify(total_estimated: i64, policy: &VerdictPolicy) -> Self {
        if total_estimated >= policy.over_at_or_above {
            Verdict::Over
        } else if total_estimated <= policy.under_at_or_below {
            Verdict::Under
        } else {
            Verdict::AvoidLive
        }
    }

    /// Display label for a given line, e.g. "Over 74.5".
    pub fn label(&self, line: f64) -> String {
        match self {
            Verdict::Over => format!("Over {}", line),
            Verdict::Under => format!("Under {}", line),
            Verdict::AvoidLive => "Avoid / Live".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub total_estimated: i64,
    pub low: i64,
    pub high: i64,
    pub verdict: Verdict,
    pub confidence: f64,
    /// Line the verdict was classified against.
    pub line: f64,
}

impl Prediction {
    pub fn verdict_label(&self) -> String {
        self.verdict.label(self.line)
    }

    /// Confidence as a whole percentage, half-up.
    pub fn confidence_pct(&self) -> u32 {
        round_half_up(self.confidence * 100.0) as u32
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}-{}] {} ({}%)",
            self.total_estimated,
            self.low,
            self.high,
            self.verdict_label(),
            self.confidence_pct()
        )
    }
}

/// Every intermediate figure behind a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Analysis {
    pub player_a: PlayerStats,
    pub player_b: PlayerStats,
    /// Unrounded expected total.
    pub expected: f64,
    pub avg_dispersion: f64,
    pub prediction: Prediction,
}

/// Ties round up; inputs here are never negative.
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Clamp that never panics. An inverted range yields `ceiling`; NaN yields
/// `floor` before the ceiling applies.
fn bound(x: f64, floor: f64, ceiling: f64) -> f64 {
    x.max(floor).min(ceiling)
}

/// Estimate with the default model constants.
pub fn compute_prediction(history_a: &[PlayedMatch], history_b: &[PlayedMatch]) -> Prediction {
    compute_prediction_with(history_a, history_b, &EngineConfig::default())
}

pub fn compute_prediction_with(
    history_a: &[PlayedMatch],
    history_b: &[PlayedMatch],
    config: &EngineConfig,
) -> Prediction {
    analyze(history_a, history_b, config).prediction
}

pub fn analyze(
    history_a: &[PlayedMatch],
    history_b: &[PlayedMatch],
    config: &EngineConfig,
) -> Analysis {
    let player_a = player_stats(history_a, config);
    let player_b = player_stats(history_b, config);

    let expected = (player_a.weighted_mean + player_b.weighted_mean) / 2.0;

    let avg_dispersion = (player_a.dispersion + player_b.dispersion) / 2.0;
    let confidence = bound(
        1.0 - avg_dispersion / config.dispersion_scale,
        config.confidence_floor,
        config.confidence_ceiling,
    );

    // Both bounds stay inside [floor, ceiling] even for extreme estimates,
    // which keeps low <= high.
    let (floor, ceiling) = (config.interval_floor, config.interval_ceiling);
    let low = round_half_up(bound(expected - config.interval_half_width, floor, ceiling));
    let high = round_half_up(bound(expected + config.interval_half_width, floor, ceiling));

    let total_estimated = round_half_up(expected);
    let verdict = Verdict::classify(total_estimated, &config.verdict);

    Analysis {
        player_a,
        player_b,
        expected,
        avg_dispersion,
        prediction: Prediction {
            total_estimated,
            low,
            high,
            verdict,
            confidence,
            line: config.verdict.line,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::SetScore;

    /// One match per total, each as a single set.
    fn history(totals: &[u32]) -> Vec<PlayedMatch> {
        totals
            .iter()
            .map(|&t| PlayedMatch::new(vec![SetScore::new(t, 0)]))
            .collect()
    }

    #[test]
    fn test_empty_histories_fall_back() {
        let analysis = analyze(&[], &[], &EngineConfig::default());
        assert_eq!(analysis.expected, 76.0);
        let p = analysis.prediction;
        assert_eq!(p.total_estimated, 76);
        assert_eq!(p.low, 68);
        assert_eq!(p.high, 84);
        assert_eq!(p.verdict, Verdict::AvoidLive);
        assert!((p.confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_high_dispersion_clamps_confidence_to_floor() {
        let p = compute_prediction(&history(&[90, 50]), &history(&[70]));
        assert!((p.confidence - 0.4).abs() < 1e-12, "got {}", p.confidence);
    }

    #[test]
    fn test_confidence_linear_between_bounds() {
        // dispersion_a = sqrt(2), dispersion_b = 0 -> raw ~ 0.965 -> ceiling
        let p = compute_prediction(&history(&[73, 75]), &history(&[74]));
        assert!((p.confidence - 0.9).abs() < 1e-12);

        // dispersion sqrt(50) on both sides -> raw ~ 0.646, inside the bounds
        let p = compute_prediction(&history(&[70, 80]), &history(&[70, 80]));
        let expected = 1.0 - 50f64.sqrt() / 20.0;
        assert!((p.confidence - expected).abs() < 1e-12, "got {}", p.confidence);
    }

    #[test]
    fn test_interval_clamps_high_at_ceiling() {
        let p = compute_prediction(&history(&[125]), &history(&[125]));
        assert_eq!(p.total_estimated, 125);
        assert_eq!(p.high, 120);
        assert_eq!(p.low, 117);
        assert_eq!(p.verdict, Verdict::Over);
    }

    #[test]
    fn test_interval_clamps_low_at_floor() {
        let p = compute_prediction(&history(&[55]), &history(&[55]));
        assert_eq!(p.total_estimated, 55);
        assert_eq!(p.low, 60);
        assert_eq!(p.high, 63);
        assert_eq!(p.verdict, Verdict::Under);
    }

    #[test]
    fn test_extreme_estimate_keeps_low_not_above_high() {
        let p = compute_prediction(&history(&[300]), &history(&[300]));
        assert_eq!(p.total_estimated, 300);
        assert_eq!(p.low, 120);
        assert_eq!(p.high, 120);

        let p = compute_prediction(&history(&[0]), &history(&[0]));
        assert_eq!(p.low, 60);
        assert_eq!(p.high, 60);
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let mut config = EngineConfig::default();
        config.confidence_floor = 0.95;
        config.confidence_ceiling = 0.5;
        config.interval_floor = 130.0;
        config.interval_ceiling = 60.0;
        assert!(config.validate().is_err());

        let p = compute_prediction_with(&history(&[80]), &history(&[80]), &config);
        assert_eq!(p.confidence, 0.5);
        assert_eq!(p.low, 60);
        assert_eq!(p.high, 60);
    }

    #[test]
    fn test_nan_estimate_keeps_interval_in_bounds() {
        let mut config = EngineConfig::default();
        config.empty_history_mean = f64::NAN;
        let p = compute_prediction_with(&[], &[], &config);
        assert_eq!(p.low, 60);
        assert_eq!(p.high, 60);
    }

    #[test]
    fn test_rounding_ties_go_up() {
        // expected = (68 + 69) / 2 = 68.5; low = 60.5, high = 76.5
        let analysis = analyze(&history(&[68]), &history(&[69]), &EngineConfig::default());
        assert_eq!(analysis.expected, 68.5);
        let p = analysis.prediction;
        assert_eq!(p.total_estimated, 69);
        assert_eq!(p.low, 61);
        assert_eq!(p.high, 77);
        assert_eq!(p.verdict, Verdict::Under);
    }

    #[test]
    fn test_verdict_band_edges() {
        let policy = VerdictPolicy::default();
        assert_eq!(Verdict::classify(78, &policy), Verdict::Over);
        assert_eq!(Verdict::classify(77, &policy), Verdict::AvoidLive);
        assert_eq!(Verdict::classify(73, &policy), Verdict::AvoidLive);
        assert_eq!(Verdict::classify(72, &policy), Verdict::Under);
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Over.label(74.5), "Over 74.5");
        assert_eq!(Verdict::Under.label(74.5), "Under 74.5");
        assert_eq!(Verdict::AvoidLive.label(74.5), "Avoid / Live");
        assert_eq!(Verdict::Over.label(80.0), "Over 80");
    }

    #[test]
    fn test_custom_verdict_policy() {
        let mut config = EngineConfig::default();
        config.verdict = VerdictPolicy {
            line: 80.5,
            over_at_or_above: 82,
            under_at_or_below: 79,
        };
        let p = compute_prediction_with(&history(&[78]), &history(&[78]), &config);
        assert_eq!(p.verdict, Verdict::Under);
        assert_eq!(p.verdict_label(), "Under 80.5");

        let p = compute_prediction_with(&history(&[80]), &history(&[81]), &config);
        assert_eq!(p.total_estimated, 81);
        assert_eq!(p.verdict, Verdict::AvoidLive);
    }

    #[test]
    fn test_display_and_percentage() {
        let p = compute_prediction(&[], &[]);
        assert_eq!(p.confidence_pct(), 90);
        assert_eq!(p.to_string(), "76 [68-84] Avoid / Live (90%)");
    }

    #[test]
    fn test_serializes_camel_case() {
        let p = compute_prediction(&history(&[80]), &history(&[80]));
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["totalEstimated"], 80);
        assert_eq!(json["verdict"], "over");
        assert_eq!(json["low"], 72);
        assert_eq!(json["high"], 88);
    }
}
