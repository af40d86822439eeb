use crate::engine::{MatchFixture, PlayedMatch, PlayerHistory, SetScore};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level payload served by the match API (and the bundled file).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchPayload {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub matches: Vec<WireFixture>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFixture {
    pub match_id: String,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub start_time: String,
    pub player_a: String,
    pub player_b: String,
    pub last10: Last10,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Last10 {
    #[serde(default)]
    pub player_a: Vec<WirePlayedMatch>,
    #[serde(default)]
    pub player_b: Vec<WirePlayedMatch>,
}

/// Sets as raw `[a, b]` arrays. Signed so that negative points reach
/// validation instead of failing deep inside serde.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WirePlayedMatch {
    #[serde(default)]
    pub sets: Vec<Vec<i64>>,
}

impl MatchPayload {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse match payload")
    }
}

impl WireFixture {
    /// Validate and convert into engine input.
    pub fn into_fixture(self) -> Result<MatchFixture> {
        let history_a = convert_history(&self.last10.player_a)
            .with_context(|| format!("match {}: invalid history for {}", self.match_id, self.player_a))?;
        let history_b = convert_history(&self.last10.player_b)
            .with_context(|| format!("match {}: invalid history for {}", self.match_id, self.player_b))?;
        Ok(MatchFixture {
            match_id: self.match_id,
            competition: self.competition,
            start_time: self.start_time,
            player_a: self.player_a,
            player_b: self.player_b,
            history_a,
            history_b,
        })
    }
}

fn convert_history(matches: &[WirePlayedMatch]) -> Result<PlayerHistory> {
    matches
        .iter()
        .enumerate()
        .map(|(match_idx, m)| -> Result<PlayedMatch> {
            let sets = m
                .sets
                .iter()
                .enumerate()
                .map(|(set_idx, raw)| {
                    convert_set(raw)
                        .with_context(|| format!("match #{} set #{}", match_idx, set_idx))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(PlayedMatch::new(sets))
        })
        .collect()
}

fn convert_set(raw: &[i64]) -> Result<SetScore> {
    let [a, b] = raw else {
        anyhow::bail!("set must have exactly 2 scores, got {}", raw.len());
    };
    let points_a = u32::try_from(*a).with_context(|| format!("invalid points value {}", a))?;
    let points_b = u32::try_from(*b).with_context(|| format!("invalid points value {}", b))?;
    Ok(SetScore::new(points_a, points_b))
}
