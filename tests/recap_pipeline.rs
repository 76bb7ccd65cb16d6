use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;

use nba_night_recap::boxscore_fetch::{GameBoxscore, parse_boxscore_json};
use nba_night_recap::config::{RecapConfig, RefreshPolicy};
use nba_night_recap::error::{BOXSCORE_ENDPOINT, RecapError, Result, SCOREBOARD_ENDPOINT};
use nba_night_recap::leaderboards::{LeaderboardOptions, MAX_STATS, MAX_STATS_EXTENDED};
use nba_night_recap::recap::{RecapOptions, RecapService, build_recap};
use nba_night_recap::scoreboard_fetch::{LineScoreRow, parse_scoreboard_json};
use nba_night_recap::source::StatsSource;
use nba_night_recap::standings_fetch::parse_standings_json;
use nba_night_recap::state::{PerfLabel, TeamStanding};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

struct FixtureSource {
    scoreboard: &'static str,
    failing_game: Option<&'static str>,
    // (requested, served): answer one game with another game's boxscore.
    crossed: Option<(&'static str, &'static str)>,
    scoreboard_calls: AtomicUsize,
    boxscore_calls: AtomicUsize,
    standings_calls: AtomicUsize,
}

impl FixtureSource {
    fn new(scoreboard: &'static str) -> Self {
        Self {
            scoreboard,
            failing_game: None,
            crossed: None,
            scoreboard_calls: AtomicUsize::new(0),
            boxscore_calls: AtomicUsize::new(0),
            standings_calls: AtomicUsize::new(0),
        }
    }

    fn failing(mut self, game_id: &'static str) -> Self {
        self.failing_game = Some(game_id);
        self
    }

    fn serving(mut self, requested: &'static str, served: &'static str) -> Self {
        self.crossed = Some((requested, served));
        self
    }
}

impl StatsSource for FixtureSource {
    fn scoreboard(&self, _date: NaiveDate) -> Result<Vec<LineScoreRow>> {
        self.scoreboard_calls.fetch_add(1, Ordering::SeqCst);
        parse_scoreboard_json(&read_fixture(self.scoreboard))
    }

    fn boxscore(&self, game_id: &str) -> Result<GameBoxscore> {
        self.boxscore_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_game == Some(game_id) {
            return Err(RecapError::Status {
                endpoint: BOXSCORE_ENDPOINT,
                status: 503,
            });
        }
        let file_id = match self.crossed {
            Some((requested, served)) if requested == game_id => served,
            _ => game_id,
        };
        parse_boxscore_json(&read_fixture(&format!("boxscore_{file_id}.json")))
    }

    fn standings(&self, _season: &str) -> Result<Vec<TeamStanding>> {
        self.standings_calls.fetch_add(1, Ordering::SeqCst);
        parse_standings_json(&read_fixture("standings.json"))
    }
}

fn christmas() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
}

fn fixed_config(refresh: RefreshPolicy) -> RecapConfig {
    RecapConfig {
        date: Some(christmas()),
        refresh,
        ..RecapConfig::default()
    }
}

#[test]
fn recap_from_fixtures() {
    let source = FixtureSource::new("scoreboard.json");
    let recap = build_recap(&source, christmas(), "2024-25", RecapOptions::default())
        .expect("recap should build");

    assert_eq!(recap.games.len(), 3);
    assert_eq!(recap.games[0].game_id, "0022400402");
    assert_eq!(source.boxscore_calls.load(Ordering::SeqCst), 3);
    assert_eq!(source.standings_calls.load(Ordering::SeqCst), 1);

    let leaders = &recap.stat_leaders;
    assert_eq!(leaders.performers.len(), 18.min(MAX_STATS_EXTENDED));
    assert_eq!(leaders.scorers.len(), 18.min(MAX_STATS_EXTENDED));
    assert_eq!(leaders.rebounders.len(), MAX_STATS);
    assert_eq!(leaders.assisters.len(), MAX_STATS);
    assert_eq!(leaders.snipers.len(), MAX_STATS);

    assert!(leaders.scorers.windows(2).all(|w| w[0].points >= w[1].points));
    assert!(leaders.performers.windows(2).all(|w| w[0].perf >= w[1].perf));
    assert!(
        leaders
            .rebounders
            .windows(2)
            .all(|w| w[0].rebounds_total >= w[1].rebounds_total)
    );
    assert!(leaders.assisters.windows(2).all(|w| w[0].assists >= w[1].assists));
    assert!(
        leaders
            .snipers
            .windows(2)
            .all(|w| w[0].three_pointers_percentage >= w[1].three_pointers_percentage)
    );

    assert_eq!(leaders.scorers[0].family_name, "Curry");
    assert_eq!(leaders.scorers[0].team_tricode, "GSW");
    assert_eq!(leaders.rebounders[0].family_name, "Jokic");
    assert_eq!(leaders.assisters[0].family_name, "Jokic");
    // 1-for-1 tops the board when no attempt threshold is set.
    assert_eq!(leaders.snipers[0].family_name, "Reaves");

    let performers: Vec<(&str, u32, PerfLabel)> = leaders
        .performers
        .iter()
        .take(4)
        .map(|p| (p.family_name.as_str(), p.perf, p.perf_label))
        .collect();
    assert_eq!(
        performers,
        vec![
            ("Curry", 44, PerfLabel::AssistsPoints),
            ("Jokic", 42, PerfLabel::ReboundsPoints),
            ("Davis", 42, PerfLabel::ReboundsPoints),
            ("James", 41, PerfLabel::AssistsPoints),
        ]
    );

    assert_eq!(recap.east_standings.len(), 2);
    assert_eq!(recap.west_standings.len(), 4);
    assert_eq!(recap.hots.len(), 6);
    assert_eq!(recap.hots[0].team_name, "Celtics");
    assert_eq!(recap.hots[5].team_name, "Warriors");
}

#[test]
fn sniper_threshold_drops_low_volume_shooters() {
    let source = FixtureSource::new("scoreboard.json");
    let opts = RecapOptions {
        leaderboards: LeaderboardOptions {
            min_three_point_attempts: 5,
        },
        fetch_parallelism: Some(2),
    };
    let recap = build_recap(&source, christmas(), "2024-25", opts).expect("recap should build");
    let snipers = &recap.stat_leaders.snipers;
    assert!(snipers.iter().all(|p| p.three_pointers_attempted >= 5));
    assert_eq!(snipers[0].family_name, "White");
    assert_eq!(recap.stat_leaders.scorers.len(), 18);
}

#[test]
fn zero_games_is_an_empty_recap() {
    let source = FixtureSource::new("scoreboard_empty.json");
    let recap = build_recap(&source, christmas(), "2024-25", RecapOptions::default())
        .expect("no games is not an error");
    assert!(recap.games.is_empty());
    assert!(recap.stat_leaders.is_empty());
    assert_eq!(source.boxscore_calls.load(Ordering::SeqCst), 0);
    assert_eq!(recap.hots.len(), 6);
}

#[test]
fn missing_line_score_set_fails_the_recap() {
    let source = FixtureSource::new("scoreboard_no_linescore.json");
    let err = build_recap(&source, christmas(), "2024-25", RecapOptions::default())
        .expect_err("a scoreboard without line scores is not an empty night");
    assert!(matches!(err, RecapError::Malformed { .. }));
    assert!(!err.is_transient());
    assert_eq!(err.endpoint(), Some(SCOREBOARD_ENDPOINT));
    assert_eq!(source.boxscore_calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.standings_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn boxscore_for_another_game_fails_the_recap() {
    let source = FixtureSource::new("scoreboard.json").serving("0022400401", "0022400403");
    let err = build_recap(&source, christmas(), "2024-25", RecapOptions::default())
        .expect_err("a boxscore must belong to the game it was fetched for");
    assert!(matches!(err, RecapError::Malformed { .. }));
    assert_eq!(err.endpoint(), Some(BOXSCORE_ENDPOINT));
}

#[test]
fn failing_boxscore_aborts_recap() {
    let source = FixtureSource::new("scoreboard.json").failing("0022400402");
    let err = build_recap(&source, christmas(), "2024-25", RecapOptions::default())
        .expect_err("one failed game fails the batch");
    assert!(err.is_transient());
    assert_eq!(err.endpoint(), Some(BOXSCORE_ENDPOINT));
}

#[test]
fn recap_serializes_presentation_keys() {
    let source = FixtureSource::new("scoreboard.json");
    let recap = build_recap(&source, christmas(), "2024-25", RecapOptions::default())
        .expect("recap should build");
    let value = serde_json::to_value(&recap).expect("recap should serialize");
    for key in ["games", "statLeaders", "eastStandings", "westStandings", "hots"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["date"], "2024-12-25");
    assert_eq!(value["games"][0]["deltaQT3"], 1);
    assert_eq!(value["statLeaders"]["performers"][0]["perfLabel"], "ASTPTS");
    assert_eq!(value["statLeaders"]["scorers"][0]["teamTricode"], "GSW");
    assert_eq!(value["statLeaders"]["rebounders"][0]["reboundsTotal"], 15);
}

#[test]
fn per_request_policy_refetches() {
    let service = RecapService::new(
        FixtureSource::new("scoreboard.json"),
        fixed_config(RefreshPolicy::PerRequest),
    );
    service.current().expect("first recap");
    service.current().expect("second recap");
    assert_eq!(service.source().scoreboard_calls.load(Ordering::SeqCst), 2);
    assert_eq!(service.source().standings_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn ttl_policy_reuses_fresh_recap() {
    let service = RecapService::new(
        FixtureSource::new("scoreboard.json"),
        fixed_config(RefreshPolicy::Ttl(Duration::from_secs(3600))),
    );
    let first = service.current().expect("first recap");
    let second = service.current().expect("second recap");
    assert_eq!(first, second);
    assert_eq!(service.source().scoreboard_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.source().boxscore_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn expired_ttl_refetches() {
    let service = RecapService::new(
        FixtureSource::new("scoreboard.json"),
        fixed_config(RefreshPolicy::Ttl(Duration::ZERO)),
    );
    service.current().expect("first recap");
    service.current().expect("second recap");
    assert_eq!(service.source().scoreboard_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn once_policy_computes_a_single_time() {
    let service = RecapService::new(
        FixtureSource::new("scoreboard.json"),
        fixed_config(RefreshPolicy::Once),
    );
    for _ in 0..3 {
        service.current().expect("recap");
    }
    assert_eq!(service.source().scoreboard_calls.load(Ordering::SeqCst), 1);
    assert_eq!(service.current().expect("recap").season, "2024-25");
}
