use chrono::{Datelike, NaiveDate};

use crate::error::{RecapError, Result, STANDINGS_ENDPOINT};
use crate::result_set::{cell_f64, cell_i64, cell_string, cell_u32, parse_result_sets, pick_set};
use crate::state::{Conference, TeamStanding};

const STANDINGS_SET: &str = "Standings";

const TEAM_ID_COL: (&str, usize) = ("TeamID", 2);
const TEAM_CITY_COL: (&str, usize) = ("TeamCity", 3);
const TEAM_NAME_COL: (&str, usize) = ("TeamName", 4);
const CONFERENCE_COL: (&str, usize) = ("Conference", 6);
const PLAYOFF_RANK_COL: (&str, usize) = ("PlayoffRank", 8);
const WINS_COL: (&str, usize) = ("WINS", 13);
const LOSSES_COL: (&str, usize) = ("LOSSES", 14);
const WIN_PCT_COL: (&str, usize) = ("WinPCT", 15);
const CURRENT_STREAK_COL: (&str, usize) = ("CurrentStreak", 36);
const STREAK_LABEL_COL: (&str, usize) = ("strCurrentStreak", 37);

// The regular season tips off in October; earlier months belong to the season that started last year.
const SEASON_START_MONTH: u32 = 10;

/// Season string (`2024-25`) the given date falls in.
pub fn season_for_date(date: NaiveDate) -> String {
    let start = if date.month() >= SEASON_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{start}-{:02}", (start + 1).rem_euclid(100))
}

pub fn parse_standings_json(raw: &str) -> Result<Vec<TeamStanding>> {
    let sets = parse_result_sets(raw, STANDINGS_ENDPOINT)?;
    let Some(set) = pick_set(&sets, STANDINGS_SET, 0) else {
        return Err(RecapError::malformed(
            STANDINGS_ENDPOINT,
            "no Standings result set",
        ));
    };

    let col = |(header, fallback): (&str, usize)| set.column(STANDINGS_ENDPOINT, header, fallback);
    let team_id_col = col(TEAM_ID_COL)?;
    let city_col = col(TEAM_CITY_COL)?;
    let name_col = col(TEAM_NAME_COL)?;
    let conference_col = col(CONFERENCE_COL)?;
    let rank_col = col(PLAYOFF_RANK_COL).ok();
    let wins_col = col(WINS_COL)?;
    let losses_col = col(LOSSES_COL)?;
    let pct_col = col(WIN_PCT_COL)?;
    let streak_col = col(CURRENT_STREAK_COL)?;
    let label_col = col(STREAK_LABEL_COL).ok();

    let mut out = Vec::with_capacity(set.row_set.len());
    for (idx, row) in set.row_set.iter().enumerate() {
        let missing =
            |what: &str| RecapError::malformed(STANDINGS_ENDPOINT, format!("row {idx} has no {what}"));

        let conference_raw = cell_string(row, conference_col).ok_or_else(|| missing("conference"))?;
        let conference = Conference::from_label(&conference_raw).ok_or_else(|| {
            RecapError::malformed(
                STANDINGS_ENDPOINT,
                format!("row {idx} has unknown conference {conference_raw:?}"),
            )
        })?;
        let current_streak = cell_i64(row, streak_col)
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| missing("current streak"))?;

        out.push(TeamStanding {
            team_id: cell_i64(row, team_id_col)
                .and_then(|v| u64::try_from(v).ok())
                .ok_or_else(|| missing("team id"))?,
            team_city: cell_string(row, city_col).unwrap_or_default(),
            team_name: cell_string(row, name_col).ok_or_else(|| missing("team name"))?,
            conference,
            playoff_rank: rank_col.and_then(|c| cell_u32(row, c)),
            wins: cell_u32(row, wins_col).ok_or_else(|| missing("wins"))?,
            losses: cell_u32(row, losses_col).ok_or_else(|| missing("losses"))?,
            win_pct: cell_f64(row, pct_col).unwrap_or(0.0),
            current_streak,
            streak_label: label_col
                .and_then(|c| cell_string(row, c))
                .unwrap_or_else(|| streak_label(current_streak)),
        });
    }
    Ok(out)
}

/// Split standings into (east, west), keeping source order within each.
pub fn partition_by_conference(rows: &[TeamStanding]) -> (Vec<TeamStanding>, Vec<TeamStanding>) {
    rows.iter()
        .cloned()
        .partition(|row| row.conference == Conference::East)
}

/// One list across both conferences: winning streaks longest first, then losing
/// streaks from the shortest to the longest.
pub fn hot_ranking(rows: &[TeamStanding]) -> Vec<TeamStanding> {
    let (mut winning, mut losing): (Vec<TeamStanding>, Vec<TeamStanding>) =
        rows.iter().cloned().partition(|row| row.current_streak >= 0);
    winning.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
    losing.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
    winning.extend(losing);
    winning
}

fn streak_label(streak: i32) -> String {
    match streak {
        0 => "-".to_string(),
        s if s > 0 => format!("W {s}"),
        s => format!("L {}", s.unsigned_abs()),
    }
}
