use chrono::NaiveDate;
use reqwest::blocking::Client;

use crate::boxscore_fetch::{GameBoxscore, claim_game_id, parse_boxscore_json};
use crate::config::RecapConfig;
use crate::error::{BOXSCORE_ENDPOINT, Result, SCOREBOARD_ENDPOINT, STANDINGS_ENDPOINT};
use crate::http_client::{build_client, fetch_json};
use crate::scoreboard_fetch::{LineScoreRow, parse_scoreboard_json};
use crate::standings_fetch::parse_standings_json;
use crate::state::TeamStanding;

/// The three upstream reads the recap is built from.
pub trait StatsSource: Sync {
    fn scoreboard(&self, date: NaiveDate) -> Result<Vec<LineScoreRow>>;
    fn boxscore(&self, game_id: &str) -> Result<GameBoxscore>;
    fn standings(&self, season: &str) -> Result<Vec<TeamStanding>>;
}

pub struct NbaStatsApi {
    client: Client,
    base_url: String,
    league_id: String,
}

impl NbaStatsApi {
    pub fn new(config: &RecapConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            league_id: config.league_id.clone(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

impl StatsSource for NbaStatsApi {
    fn scoreboard(&self, date: NaiveDate) -> Result<Vec<LineScoreRow>> {
        let game_date = date.format("%Y-%m-%d").to_string();
        let body = fetch_json(
            &self.client,
            SCOREBOARD_ENDPOINT,
            &self.url(SCOREBOARD_ENDPOINT),
            &[
                ("GameDate", game_date.as_str()),
                ("LeagueID", self.league_id.as_str()),
                ("DayOffset", "0"),
            ],
        )?;
        parse_scoreboard_json(&body)
    }

    fn boxscore(&self, game_id: &str) -> Result<GameBoxscore> {
        let body = fetch_json(
            &self.client,
            BOXSCORE_ENDPOINT,
            &self.url(BOXSCORE_ENDPOINT),
            &[
                ("GameID", game_id),
                ("LeagueID", self.league_id.as_str()),
                ("StartPeriod", "0"),
                ("EndPeriod", "0"),
                ("StartRange", "0"),
                ("EndRange", "0"),
                ("RangeType", "0"),
            ],
        )?;
        claim_game_id(parse_boxscore_json(&body)?, game_id)
    }

    fn standings(&self, season: &str) -> Result<Vec<TeamStanding>> {
        let body = fetch_json(
            &self.client,
            STANDINGS_ENDPOINT,
            &self.url(STANDINGS_ENDPOINT),
            &[
                ("LeagueID", self.league_id.as_str()),
                ("Season", season),
                ("SeasonType", "Regular Season"),
            ],
        )?;
        parse_standings_json(&body)
    }
}
