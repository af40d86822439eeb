// Payload -> validated fixtures -> predictions -> report, end to end

use std::path::Path;
use tt_predictor::config::{Config, FeedConfig};
use tt_predictor::engine::{compute_prediction, compute_prediction_with, Verdict};
use tt_predictor::feed::types::MatchPayload;
use tt_predictor::feed::{build_feed, MatchFeed};
use tt_predictor::report::{build_row, render_text};

const PAYLOAD: &str = r#"{
    "date": "2025-03-02",
    "matches": [
        {
            "matchId": "ok-1",
            "competition": "TT Cup",
            "startTime": "2025-03-02T09:15:00Z",
            "playerA": "Alpha",
            "playerB": "Beta",
            "last10": {
                "playerA": [
                    { "sets": [[11, 8], [11, 9], [11, 7]] },
                    { "sets": [[9, 11], [11, 6], [11, 9], [11, 8]] }
                ],
                "playerB": [
                    { "sets": [[11, 3], [11, 5], [11, 4]] }
                ]
            }
        },
        {
            "matchId": "bad-1",
            "competition": "TT Cup",
            "startTime": "2025-03-02T09:45:00Z",
            "playerA": "Gamma",
            "playerB": "Delta",
            "last10": {
                "playerA": [{ "sets": [[11]] }],
                "playerB": []
            }
        }
    ]
}"#;

#[test]
fn test_valid_fixtures_evaluate_and_invalid_ones_are_rejected() {
    let payload = MatchPayload::parse(PAYLOAD).unwrap();
    let results: Vec<_> = payload.matches.into_iter().map(|w| w.into_fixture()).collect();
    assert_eq!(results.len(), 2);
    assert!(results[1].is_err());

    let fixture = results.into_iter().next().unwrap().unwrap();
    // Alpha totals: 57, 76 -> weighted mean 66.5; Beta: 45
    // expected = (66.5 + 45) / 2 = 55.75 -> 56
    let p = compute_prediction(&fixture.history_a, &fixture.history_b);
    assert_eq!(p.total_estimated, 56);
    assert_eq!(p.low, 60);
    assert_eq!(p.high, 64);
    assert_eq!(p.verdict, Verdict::Under);

    let row = build_row(&fixture, &p);
    assert_eq!(row.matchup, "Alpha vs Beta");
    assert!(render_text(&[row]).contains("Verdict: Under 74.5"));
}

#[test]
fn test_shipped_config_matches_default_engine() {
    let config = Config::load(Path::new("config.toml")).unwrap();
    let payload = MatchPayload::parse(PAYLOAD).unwrap();
    let fixture = payload.matches.into_iter().next().unwrap().into_fixture().unwrap();

    assert_eq!(
        compute_prediction_with(&fixture.history_a, &fixture.history_b, &config.engine),
        compute_prediction(&fixture.history_a, &fixture.history_b)
    );
}

#[tokio::test]
async fn test_blank_url_reads_local_file() {
    let config = FeedConfig {
        api_url: String::new(),
        ..FeedConfig::default()
    };
    // TT_API_URL would override the blank URL.
    if std::env::var("TT_API_URL").map_or(false, |v| !v.trim().is_empty()) {
        return;
    }
    let mut feed = build_feed(&config).unwrap();
    assert_eq!(feed.source_name(), "local");

    let payload = feed.fetch_payload().await.unwrap();
    for wire in payload.matches {
        let fixture = wire.into_fixture().unwrap();
        let p = compute_prediction(&fixture.history_a, &fixture.history_b);
        assert!(p.low <= p.high);
    }
}
