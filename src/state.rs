use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub game_id: String,
    pub away: String,
    pub home: String,
    #[serde(rename = "awayQT3")]
    pub away_q3: u32,
    #[serde(rename = "homeQT3")]
    pub home_q3: u32,
    #[serde(rename = "deltaQT3")]
    pub delta_q3: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerfLabel {
    #[serde(rename = "ASTPTS")]
    AssistsPoints,
    #[serde(rename = "REBPTS")]
    ReboundsPoints,
}

impl PerfLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            PerfLabel::AssistsPoints => "ASTPTS",
            PerfLabel::ReboundsPoints => "REBPTS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatLine {
    pub first_name: String,
    pub family_name: String,
    pub team_tricode: String,
    pub points: u32,
    pub assists: u32,
    pub rebounds_total: u32,
    pub three_pointers_made: u32,
    pub three_pointers_attempted: u32,
    pub three_pointers_percentage: f64,
    pub perf: u32,
    pub perf_label: PerfLabel,
}

impl PlayerStatLine {
    pub fn display_name(&self) -> String {
        let first = self.first_name.trim();
        let family = self.family_name.trim();
        if first.is_empty() {
            family.to_string()
        } else {
            format!("{first} {family}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw {
            "East" => Some(Conference::East),
            "West" => Some(Conference::West),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_id: u64,
    pub team_city: String,
    pub team_name: String,
    pub conference: Conference,
    pub playoff_rank: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    /// Positive for a winning streak, negative for a losing one.
    pub current_streak: i32,
    pub streak_label: String,
}

impl TeamStanding {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.team_city, self.team_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLeaders {
    pub performers: Vec<PlayerStatLine>,
    pub scorers: Vec<PlayerStatLine>,
    pub rebounders: Vec<PlayerStatLine>,
    pub assisters: Vec<PlayerStatLine>,
    pub snipers: Vec<PlayerStatLine>,
}

impl StatLeaders {
    pub fn is_empty(&self) -> bool {
        self.performers.is_empty()
            && self.scorers.is_empty()
            && self.rebounders.is_empty()
            && self.assisters.is_empty()
            && self.snipers.is_empty()
    }
}

/// Everything a dashboard needs for one night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightRecap {
    pub date: NaiveDate,
    pub season: String,
    pub games: Vec<GameSummary>,
    pub stat_leaders: StatLeaders,
    pub east_standings: Vec<TeamStanding>,
    pub west_standings: Vec<TeamStanding>,
    pub hots: Vec<TeamStanding>,
}
