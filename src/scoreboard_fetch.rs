use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::{RecapError, Result, SCOREBOARD_ENDPOINT};
use crate::result_set::{cell_string, cell_u32, parse_result_sets, pick_set};
use crate::state::GameSummary;

const LINE_SCORE_SET: &str = "LineScore";
const LINE_SCORE_FALLBACK_SET: usize = 1;

// Conventional positions in a LineScore row, used when the payload has no headers.
const GAME_ID_COL: (&str, usize) = ("GAME_ID", 2);
const TEAM_COL: (&str, usize) = ("TEAM_CITY_NAME", 5);
const QUARTER_COLS: [(&str, usize); 3] = [("PTS_QTR1", 8), ("PTS_QTR2", 9), ("PTS_QTR3", 10)];

/// One team's line for one game on the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScoreRow {
    pub game_id: String,
    pub team: String,
    /// Points in quarters 1..=3; `None` when the quarter has not been played.
    pub quarters: [Option<u32>; 3],
}

pub fn parse_scoreboard_json(raw: &str) -> Result<Vec<LineScoreRow>> {
    let sets = parse_result_sets(raw, SCOREBOARD_ENDPOINT)?;
    // Only an empty LineScore set means a night without games.
    let Some(set) = pick_set(&sets, LINE_SCORE_SET, LINE_SCORE_FALLBACK_SET) else {
        return Err(RecapError::malformed(
            SCOREBOARD_ENDPOINT,
            "no LineScore result set",
        ));
    };

    let game_col = set.column(SCOREBOARD_ENDPOINT, GAME_ID_COL.0, GAME_ID_COL.1)?;
    let team_col = set.column(SCOREBOARD_ENDPOINT, TEAM_COL.0, TEAM_COL.1)?;
    let mut quarter_cols = [0usize; 3];
    for (slot, (header, fallback)) in quarter_cols.iter_mut().zip(QUARTER_COLS) {
        *slot = set.column(SCOREBOARD_ENDPOINT, header, fallback)?;
    }

    let mut rows = Vec::with_capacity(set.row_set.len());
    for (idx, row) in set.row_set.iter().enumerate() {
        let game_id = cell_string(row, game_col).filter(|id| !id.is_empty()).ok_or_else(|| {
            RecapError::malformed(SCOREBOARD_ENDPOINT, format!("row {idx} has no game id"))
        })?;
        let team = cell_string(row, team_col).ok_or_else(|| {
            RecapError::malformed(SCOREBOARD_ENDPOINT, format!("row {idx} has no team"))
        })?;
        let quarters = quarter_cols.map(|col| cell_u32(row, col));
        rows.push(LineScoreRow {
            game_id,
            team,
            quarters,
        });
    }
    Ok(rows)
}

/// Distinct game ids in the order they first appear.
pub fn unique_game_ids(rows: &[LineScoreRow]) -> Vec<String> {
    dedup_preserving_order(rows.iter().map(|row| row.game_id.clone()))
}

pub fn dedup_preserving_order<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Group line scores into `(away, home)` pairs by game id. The scoreboard lists the
/// away side first; a game with anything other than two rows is rejected.
pub fn pair_games(rows: &[LineScoreRow]) -> Result<Vec<(&LineScoreRow, &LineScoreRow)>> {
    let mut order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&LineScoreRow>> = HashMap::new();
    for row in rows {
        let entry = grouped.entry(row.game_id.as_str()).or_insert_with(|| {
            order.push(row.game_id.as_str());
            Vec::new()
        });
        entry.push(row);
    }

    let mut pairs = Vec::with_capacity(order.len());
    for game_id in order {
        match grouped.get(game_id).map(Vec::as_slice) {
            Some([away, home]) => pairs.push((*away, *home)),
            Some(group) => {
                return Err(RecapError::malformed(
                    SCOREBOARD_ENDPOINT,
                    format!("game {game_id} has {} line scores, expected 2", group.len()),
                ));
            }
            None => {}
        }
    }
    Ok(pairs)
}

/// Games ordered by how close they were after three quarters, closest first.
pub fn games_by_q3_closeness(rows: &[LineScoreRow]) -> Result<Vec<GameSummary>> {
    let mut games = Vec::new();
    for (away, home) in pair_games(rows)? {
        let away_q3 = through_third(away)?;
        let home_q3 = through_third(home)?;
        games.push(GameSummary {
            game_id: away.game_id.clone(),
            away: away.team.clone(),
            home: home.team.clone(),
            away_q3,
            home_q3,
            delta_q3: away_q3.abs_diff(home_q3),
        });
    }
    games.sort_by_key(|g| g.delta_q3);
    Ok(games)
}

fn through_third(row: &LineScoreRow) -> Result<u32> {
    let mut total = 0u32;
    for (quarter, points) in row.quarters.iter().enumerate() {
        let Some(points) = points else {
            return Err(RecapError::malformed(
                SCOREBOARD_ENDPOINT,
                format!(
                    "game {} {} has no score for quarter {}",
                    row.game_id,
                    row.team,
                    quarter + 1
                ),
            ));
        };
        total += points;
    }
    Ok(total)
}
