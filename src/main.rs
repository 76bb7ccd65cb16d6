use std::fmt::Write as _;
use std::thread;

use anyhow::{Context, Result};
use tracing::{info, warn};

use nba_night_recap::config::{RecapConfig, parse_date};
use nba_night_recap::logging::init_logging;
use nba_night_recap::recap::RecapService;
use nba_night_recap::source::NbaStatsApi;
use nba_night_recap::state::{NightRecap, PlayerStatLine, TeamStanding};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_logging();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = RecapConfig::from_env()?;
    if let Some(raw) = flag_value(&args, "--date") {
        config.date = Some(parse_date(&raw).with_context(|| format!("invalid --date {raw:?}"))?);
    }
    let as_json = args.iter().any(|a| a == "--json");
    let watch = args.iter().any(|a| a == "--watch");

    let api = NbaStatsApi::new(&config).context("unable to set up stats client")?;
    let interval = config.watch_interval;
    let service = RecapService::new(api, config);

    if !watch {
        let recap = service.current().context("night recap failed")?;
        print_recap(&recap, as_json)?;
        return Ok(());
    }

    info!(
        interval_secs = interval.as_secs(),
        refresh = ?service.config().refresh,
        "watching"
    );
    loop {
        match service.current() {
            Ok(recap) => print_recap(&recap, as_json)?,
            Err(err) if err.is_transient() => {
                warn!(error = %err, "upstream unavailable, retrying next tick");
            }
            Err(err) => return Err(err).context("night recap failed"),
        }
        thread::sleep(interval);
    }
}

fn print_recap(recap: &NightRecap, as_json: bool) -> Result<()> {
    if as_json {
        let json = serde_json::to_string_pretty(recap).context("serialize recap")?;
        println!("{json}");
    } else {
        print!("{}", render_text(recap));
    }
    Ok(())
}

fn render_text(recap: &NightRecap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NBA night recap {} ({})", recap.date, recap.season);
    if recap.games.is_empty() {
        let _ = writeln!(out, "\nNo games played.");
    } else {
        let _ = writeln!(out, "\nGames, closest after three quarters");
        for g in &recap.games {
            let _ = writeln!(
                out,
                "  {:<14} @ {:<14} {:>3}-{:<3} (delta {})",
                g.away, g.home, g.away_q3, g.home_q3, g.delta_q3
            );
        }
    }

    let leaders = &recap.stat_leaders;
    render_board(&mut out, "Performers", &leaders.performers, |p| {
        format!("{} {}", p.perf, p.perf_label.as_str())
    });
    render_board(&mut out, "Scorers", &leaders.scorers, |p| format!("{} PTS", p.points));
    render_board(&mut out, "Rebounders", &leaders.rebounders, |p| {
        format!("{} REB", p.rebounds_total)
    });
    render_board(&mut out, "Assisters", &leaders.assisters, |p| format!("{} AST", p.assists));
    render_board(&mut out, "Snipers", &leaders.snipers, |p| {
        format!(
            "{:.1}% ({}/{})",
            p.three_pointers_percentage * 100.0,
            p.three_pointers_made,
            p.three_pointers_attempted
        )
    });

    render_standings(&mut out, "East", &recap.east_standings);
    render_standings(&mut out, "West", &recap.west_standings);
    render_standings(&mut out, "Hot & cold", &recap.hots);
    out
}

fn render_board(
    out: &mut String,
    title: &str,
    players: &[PlayerStatLine],
    value: impl Fn(&PlayerStatLine) -> String,
) {
    if players.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}");
    for (idx, p) in players.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<26} {:<4} {}",
            idx + 1,
            p.display_name(),
            p.team_tricode,
            value(p)
        );
    }
}

fn render_standings(out: &mut String, title: &str, teams: &[TeamStanding]) {
    if teams.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{title}");
    for t in teams {
        let rank = t
            .playoff_rank
            .map(|r| format!("{r:>2}."))
            .unwrap_or_else(|| "   ".to_string());
        let _ = writeln!(
            out,
            "  {rank} {:<28} {:>2}-{:<2} {:.3}  {}",
            t.full_name(),
            t.wins,
            t.losses,
            t.win_pct,
            t.streak_label
        );
    }
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
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
