use serde::Serialize;

/// Final score of one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetScore {
    pub points_a: u32,
    pub points_b: u32,
}

impl SetScore {
    pub fn new(points_a: u32, points_b: u32) -> Self {
        Self { points_a, points_b }
    }

    pub fn total(&self) -> u64 {
        self.points_a as u64 + self.points_b as u64
    }
}

/// One completed historical match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PlayedMatch {
    pub sets: Vec<SetScore>,
}

impl PlayedMatch {
    pub fn new(sets: Vec<SetScore>) -> Self {
        Self { sets }
    }

    /// Points scored by both sides across every set.
    pub fn total(&self) -> u64 {
        self.sets.iter().map(SetScore::total).sum()
    }
}

/// Recent matches for one player, index 0 = latest.
pub type PlayerHistory = Vec<PlayedMatch>;

/// A scheduled match plus both players' recent form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFixture {
    pub match_id: String,
    pub competition: String,
    pub start_time: String,
    pub player_a: String,
    pub player_b: String,
    #[serde(skip)]
    pub history_a: PlayerHistory,
    #[serde(skip)]
    pub history_b: PlayerHistory,
}
