use std::path::PathBuf;

use anyhow::{Context, Result};

use nba_night_recap::config::{RecapConfig, parse_date};
use nba_night_recap::logging::init_logging;
use nba_night_recap::recap::RecapService;
use nba_night_recap::recap_export::export_recap;
use nba_night_recap::source::NbaStatsApi;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let mut config = RecapConfig::from_env()?;
    if let Some(raw) = parse_arg("--date") {
        config.date = Some(parse_date(&raw).with_context(|| format!("invalid --date {raw:?}"))?);
    }
    let date = config.reference_date();
    let out = parse_arg("--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("night_recap_{date}.xlsx")));

    let api = NbaStatsApi::new(&config).context("unable to set up stats client")?;
    let service = RecapService::new(api, config);
    let recap = service.refresh().context("night recap failed")?;
    let report = export_recap(&out, &recap)?;

    println!("Recap export complete");
    println!("File: {}", out.display());
    println!("Date: {} ({})", recap.date, recap.season);
    println!("Games: {}", report.games);
    println!("Leaderboard rows: {}", report.leaderboard_rows);
    println!("Standings rows: {}", report.standings_rows);
    Ok(())
}

fn parse_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
