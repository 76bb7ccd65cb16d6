use serde::Deserialize;

use crate::error::{BOXSCORE_ENDPOINT, RecapError, Result};
use crate::state::{PerfLabel, PlayerStatLine};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameBoxscore {
    #[serde(default)]
    pub game_id: String,
    pub home_team: TeamBoxscore,
    pub away_team: TeamBoxscore,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBoxscore {
    pub team_tricode: String,
    #[serde(default)]
    pub players: Vec<BoxscorePlayer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxscorePlayer {
    pub first_name: String,
    pub family_name: String,
    pub statistics: PlayerStatistics,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatistics {
    pub points: u32,
    pub assists: u32,
    pub rebounds_total: u32,
    #[serde(default)]
    pub three_pointers_made: u32,
    #[serde(default)]
    pub three_pointers_attempted: u32,
    pub three_pointers_percentage: f64,
}

#[derive(Debug, Deserialize)]
struct BoxscoreResponse {
    #[serde(rename = "boxScoreTraditional")]
    box_score: Option<GameBoxscore>,
}

pub fn parse_boxscore_json(raw: &str) -> Result<GameBoxscore> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(RecapError::malformed(BOXSCORE_ENDPOINT, "empty body"));
    }
    let resp: BoxscoreResponse = serde_json::from_str(trimmed)
        .map_err(|err| RecapError::malformed(BOXSCORE_ENDPOINT, err.to_string()))?;
    resp.box_score
        .ok_or_else(|| RecapError::malformed(BOXSCORE_ENDPOINT, "missing boxScoreTraditional"))
}

/// Tie a boxscore to the game it was requested for. A body without an id takes the
/// requested one; a body for a different game is rejected.
pub fn claim_game_id(mut game: GameBoxscore, requested: &str) -> Result<GameBoxscore> {
    if game.game_id.is_empty() {
        game.game_id = requested.to_string();
    } else if game.game_id != requested {
        return Err(RecapError::malformed(
            BOXSCORE_ENDPOINT,
            format!("asked for game {requested}, got {}", game.game_id),
        ));
    }
    Ok(game)
}

/// The larger of assists+points and rebounds+points. Rebounds win a tie.
pub fn perf_for(points: u32, assists: u32, rebounds: u32) -> (u32, PerfLabel) {
    let ast_pts = assists + points;
    let reb_pts = rebounds + points;
    if ast_pts > reb_pts {
        (ast_pts, PerfLabel::AssistsPoints)
    } else {
        (reb_pts, PerfLabel::ReboundsPoints)
    }
}

/// Every player of every game, home roster before away roster, each tagged with its team.
pub fn flatten_players(games: &[GameBoxscore]) -> Vec<PlayerStatLine> {
    let mut out = Vec::new();
    for game in games {
        for team in [&game.home_team, &game.away_team] {
            out.extend(team.players.iter().map(|p| stat_line(&team.team_tricode, p)));
        }
    }
    out
}

fn stat_line(team_tricode: &str, player: &BoxscorePlayer) -> PlayerStatLine {
    let s = &player.statistics;
    let (perf, perf_label) = perf_for(s.points, s.assists, s.rebounds_total);
    PlayerStatLine {
        first_name: player.first_name.clone(),
        family_name: player.family_name.clone(),
        team_tricode: team_tricode.to_string(),
        points: s.points,
        assists: s.assists,
        rebounds_total: s.rebounds_total,
        three_pointers_made: s.three_pointers_made,
        three_pointers_attempted: s.three_pointers_attempted,
        three_pointers_percentage: s.three_pointers_percentage,
        perf,
        perf_label,
    }
}
