use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::state::{GameSummary, NightRecap, PlayerStatLine, TeamStanding};

pub struct ExportReport {
    pub games: usize,
    pub leaderboard_rows: usize,
    pub standings_rows: usize,
}

pub fn export_recap(path: &Path, recap: &NightRecap) -> Result<ExportReport> {
    let leaders = &recap.stat_leaders;
    let player_sheets: [(&str, &[PlayerStatLine]); 5] = [
        ("Performers", leaders.performers.as_slice()),
        ("Scorers", leaders.scorers.as_slice()),
        ("Rebounders", leaders.rebounders.as_slice()),
        ("Assisters", leaders.assisters.as_slice()),
        ("Snipers", leaders.snipers.as_slice()),
    ];
    let standings_sheets: [(&str, &[TeamStanding]); 3] = [
        ("East", recap.east_standings.as_slice()),
        ("West", recap.west_standings.as_slice()),
        ("Hot", recap.hots.as_slice()),
    ];

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Games")?;
        write_rows(sheet, &game_rows(&recap.games))?;
    }
    let mut leaderboard_rows = 0usize;
    for (name, players) in player_sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, &player_rows(players))?;
        leaderboard_rows += players.len();
    }
    let mut standings_rows = 0usize;
    for (name, teams) in standings_sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, &standing_rows(teams))?;
        standings_rows += teams.len();
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        games: recap.games.len(),
        leaderboard_rows,
        standings_rows,
    })
}

fn game_rows(games: &[GameSummary]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Game ID".to_string(),
        "Away".to_string(),
        "Home".to_string(),
        "Away Q3".to_string(),
        "Home Q3".to_string(),
        "Q3 Delta".to_string(),
    ]];
    rows.extend(games.iter().map(|g| {
        vec![
            g.game_id.clone(),
            g.away.clone(),
            g.home.clone(),
            g.away_q3.to_string(),
            g.home_q3.to_string(),
            g.delta_q3.to_string(),
        ]
    }));
    rows
}

fn player_rows(players: &[PlayerStatLine]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Rank".to_string(),
        "Player".to_string(),
        "Team".to_string(),
        "PTS".to_string(),
        "REB".to_string(),
        "AST".to_string(),
        "3PM".to_string(),
        "3PA".to_string(),
        "3P%".to_string(),
        "Perf".to_string(),
        "Perf Type".to_string(),
    ]];
    rows.extend(players.iter().enumerate().map(|(idx, p)| {
        vec![
            (idx + 1).to_string(),
            p.display_name(),
            p.team_tricode.clone(),
            p.points.to_string(),
            p.rebounds_total.to_string(),
            p.assists.to_string(),
            p.three_pointers_made.to_string(),
            p.three_pointers_attempted.to_string(),
            format!("{:.1}", p.three_pointers_percentage * 100.0),
            p.perf.to_string(),
            p.perf_label.as_str().to_string(),
        ]
    }));
    rows
}

fn standing_rows(teams: &[TeamStanding]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Rank".to_string(),
        "Team".to_string(),
        "W".to_string(),
        "L".to_string(),
        "PCT".to_string(),
        "Streak".to_string(),
    ]];
    rows.extend(teams.iter().map(|t| {
        vec![
            t.playoff_rank.map(|r| r.to_string()).unwrap_or_default(),
            t.full_name(),
            t.wins.to_string(),
            t.losses.to_string(),
            format!("{:.3}", t.win_pct),
            t.streak_label.clone(),
        ]
    }));
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
