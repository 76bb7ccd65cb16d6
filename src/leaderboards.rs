use std::cmp::Ordering;

use crate::state::{PlayerStatLine, StatLeaders};

pub const MAX_STATS: usize = 10;
pub const MAX_STATS_EXTENDED: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderboardOptions {
    /// Snipers need at least this many three-point attempts. Zero ranks everyone,
    /// so a 1-for-1 night tops a 6-for-11 one.
    pub min_three_point_attempts: u32,
}

pub fn build_stat_leaders(players: &[PlayerStatLine], opts: LeaderboardOptions) -> StatLeaders {
    let shooters: Vec<PlayerStatLine> = players
        .iter()
        .filter(|p| p.three_pointers_attempted >= opts.min_three_point_attempts)
        .cloned()
        .collect();

    StatLeaders {
        performers: leaderboard(players, MAX_STATS_EXTENDED, |a, b| a.perf.cmp(&b.perf)),
        scorers: leaderboard(players, MAX_STATS_EXTENDED, |a, b| a.points.cmp(&b.points)),
        rebounders: leaderboard(players, MAX_STATS, |a, b| {
            a.rebounds_total.cmp(&b.rebounds_total)
        }),
        assisters: leaderboard(players, MAX_STATS, |a, b| a.assists.cmp(&b.assists)),
        snipers: leaderboard(&shooters, MAX_STATS, |a, b| {
            a.three_pointers_percentage
                .total_cmp(&b.three_pointers_percentage)
        }),
    }
}

/// Stable descending sort by `cmp`, cut to `cap`. Ties keep their input order.
pub fn leaderboard(
    players: &[PlayerStatLine],
    cap: usize,
    cmp: impl Fn(&PlayerStatLine, &PlayerStatLine) -> Ordering,
) -> Vec<PlayerStatLine> {
    let mut rows = players.to_vec();
    rows.sort_by(|a, b| cmp(b, a));
    rows.truncate(cap);
    rows
}
