use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::boxscore_fetch::{GameBoxscore, claim_game_id, flatten_players};
use crate::config::{RecapConfig, RefreshPolicy};
use crate::error::Result;
use crate::leaderboards::{LeaderboardOptions, build_stat_leaders};
use crate::scoreboard_fetch::{games_by_q3_closeness, unique_game_ids};
use crate::source::StatsSource;
use crate::standings_fetch::{hot_ranking, partition_by_conference, season_for_date};
use crate::state::NightRecap;

#[derive(Debug, Clone, Copy, Default)]
pub struct RecapOptions {
    pub leaderboards: LeaderboardOptions,
    /// Extra cap on boxscore workers, on top of the CPU count.
    pub fetch_parallelism: Option<usize>,
}

impl RecapOptions {
    pub fn from_config(config: &RecapConfig) -> Self {
        Self {
            leaderboards: LeaderboardOptions {
                min_three_point_attempts: config.min_three_point_attempts,
            },
            fetch_parallelism: config.fetch_parallelism,
        }
    }
}

/// Run the whole pipeline for one reference date. Any upstream failure aborts it.
pub fn build_recap<S>(
    source: &S,
    date: NaiveDate,
    season: &str,
    opts: RecapOptions,
) -> Result<NightRecap>
where
    S: StatsSource + ?Sized,
{
    let started = Instant::now();
    let line_scores = source.scoreboard(date)?;
    let game_ids = unique_game_ids(&line_scores);
    info!(%date, games = game_ids.len(), "scoreboard loaded");

    let games = games_by_q3_closeness(&line_scores)?;
    let boxscores = fetch_boxscores(source, &game_ids, opts.fetch_parallelism)?;
    let players = flatten_players(&boxscores);
    let stat_leaders = build_stat_leaders(&players, opts.leaderboards);

    let standings = source.standings(season)?;
    let (east_standings, west_standings) = partition_by_conference(&standings);
    let hots = hot_ranking(&standings);

    info!(
        %date,
        season,
        players = players.len(),
        teams = standings.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "recap built"
    );

    Ok(NightRecap {
        date,
        season: season.to_string(),
        games,
        stat_leaders,
        east_standings,
        west_standings,
        hots,
    })
}

/// Boxscores in the same order as `game_ids`, fetched on a bounded pool.
pub fn fetch_boxscores<S>(
    source: &S,
    game_ids: &[String],
    cap: Option<usize>,
) -> Result<Vec<GameBoxscore>>
where
    S: StatsSource + ?Sized,
{
    if game_ids.is_empty() {
        return Ok(Vec::new());
    }
    let workers = worker_count(game_ids.len(), available_parallelism(), cap);
    debug!(games = game_ids.len(), workers, "fetching boxscores");

    let fetch_all = || {
        game_ids
            .par_iter()
            .map(|game_id| claim_game_id(source.boxscore(game_id)?, game_id))
            .collect::<Result<Vec<_>>>()
    };
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(fetch_all),
        Err(err) => {
            warn!(error = %err, "boxscore pool unavailable, using global pool");
            fetch_all()
        }
    }
}

/// `min(cpus, games)`, optionally capped further, and never below one.
pub fn worker_count(games: usize, cpus: usize, cap: Option<usize>) -> usize {
    let mut workers = cpus.min(games);
    if let Some(cap) = cap {
        workers = workers.min(cap);
    }
    workers.max(1)
}

fn available_parallelism() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

struct CachedRecap {
    fetched_at: Instant,
    recap: Arc<NightRecap>,
}

/// Serves recaps under the configured refresh policy.
pub struct RecapService<S> {
    source: S,
    config: RecapConfig,
    cached: Mutex<Option<CachedRecap>>,
    once: OnceCell<Arc<NightRecap>>,
}

impl<S: StatsSource> RecapService<S> {
    pub fn new(source: S, config: RecapConfig) -> Self {
        Self {
            source,
            config,
            cached: Mutex::new(None),
            once: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &RecapConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The recap a request should see right now.
    pub fn current(&self) -> Result<Arc<NightRecap>> {
        match self.config.refresh {
            RefreshPolicy::PerRequest => self.refresh().map(Arc::new),
            RefreshPolicy::Once => self
                .once
                .get_or_try_init(|| self.refresh().map(Arc::new))
                .cloned(),
            RefreshPolicy::Ttl(ttl) => {
                let date = self.config.reference_date();
                let mut guard = self.cached.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(cached) = guard.as_ref() {
                    if cached.recap.date == date && cached.fetched_at.elapsed() < ttl {
                        debug!(%date, age_secs = cached.fetched_at.elapsed().as_secs(), "serving cached recap");
                        return Ok(Arc::clone(&cached.recap));
                    }
                }
                let recap = Arc::new(self.refresh()?);
                *guard = Some(CachedRecap {
                    fetched_at: Instant::now(),
                    recap: Arc::clone(&recap),
                });
                Ok(recap)
            }
        }
    }

    /// Build a fresh recap, ignoring any cache.
    pub fn refresh(&self) -> Result<NightRecap> {
        let date = self.config.reference_date();
        let season = self
            .config
            .season
            .clone()
            .unwrap_or_else(|| season_for_date(date));
        build_recap(
            &self.source,
            date,
            &season,
            RecapOptions::from_config(&self.config),
        )
    }
}
