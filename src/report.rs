// Per-fixture rows for text and JSON output

use crate::engine::{MatchFixture, Prediction};
use serde::Serialize;

/// Display strings for one evaluated fixture.
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub matchup: String,
    pub subtitle: String,
    pub estimate: String,
    pub verdict: String,
    pub confidence_pct: u32,
}

/// Fixture plus its prediction, as emitted by `--json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedFixture<'a> {
    #[serde(flatten)]
    pub fixture: &'a MatchFixture,
    pub prediction: Prediction,
    pub verdict_label: String,
}

impl<'a> EvaluatedFixture<'a> {
    pub fn new(fixture: &'a MatchFixture, prediction: Prediction) -> Self {
        Self {
            fixture,
            prediction,
            verdict_label: prediction.verdict_label(),
        }
    }
}

/// RFC 3339 start times render as "Mar 01 10:30" (UTC); anything else verbatim.
fn format_start(start_time: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(start_time)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc).format("%b %d %H:%M").to_string())
        .unwrap_or_else(|| start_time.to_string())
}

pub fn build_row(fixture: &MatchFixture, prediction: &Prediction) -> FixtureRow {
    let confidence_pct = prediction.confidence_pct();
    FixtureRow {
        matchup: format!("{} vs {}", fixture.player_a, fixture.player_b),
        subtitle: format!("{} • {}", fixture.competition, format_start(&fixture.start_time)),
        estimate: format!(
            "Total estimated: {} (interval {} – {})",
            prediction.total_estimated, prediction.low, prediction.high
        ),
        verdict: format!(
            "Verdict: {} • Confidence: {}%",
            prediction.verdict_label(),
            confidence_pct
        ),
        confidence_pct,
    }
}

/// Blank-line separated cards, one per row.
pub fn render_text(rows: &[FixtureRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\n{}\n{}\n{}\n{}",
                row.matchup,
                row.subtitle,
                row.estimate,
                row.verdict,
                confidence_bar(row.confidence_pct, 20)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn confidence_bar(pct: u32, width: usize) -> String {
    let filled = (pct.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
