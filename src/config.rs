use std::env;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};

pub const DEFAULT_BASE_URL: &str = "https://stats.nba.com/stats";
pub const DEFAULT_LEAGUE_ID: &str = "00";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_WATCH_SECS: u64 = 300;
const MIN_WATCH_SECS: u64 = 30;

/// When a recap is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Refetch everything on every request.
    PerRequest,
    /// Reuse the last recap until it is older than the given duration.
    Ttl(Duration),
    /// Compute once and keep serving that recap for the life of the process.
    Once,
}

impl RefreshPolicy {
    /// Accepts `per-request`, `once`, or a number of seconds for a TTL.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim().to_ascii_lowercase();
        match s.as_str() {
            "" => None,
            "per-request" | "request" | "always" => Some(RefreshPolicy::PerRequest),
            "once" | "startup" => Some(RefreshPolicy::Once),
            other => {
                let secs = other.trim_end_matches('s').parse::<u64>().ok()?;
                if secs == 0 {
                    Some(RefreshPolicy::PerRequest)
                } else {
                    Some(RefreshPolicy::Ttl(Duration::from_secs(secs)))
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecapConfig {
    pub base_url: String,
    pub league_id: String,
    pub season: Option<String>,
    /// Fixed reference date; `None` means yesterday on the local clock.
    pub date: Option<NaiveDate>,
    pub refresh: RefreshPolicy,
    pub min_three_point_attempts: u32,
    pub fetch_parallelism: Option<usize>,
    pub request_timeout: Option<Duration>,
    pub watch_interval: Duration,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            league_id: DEFAULT_LEAGUE_ID.to_string(),
            season: None,
            date: None,
            refresh: RefreshPolicy::PerRequest,
            min_three_point_attempts: 0,
            fetch_parallelism: None,
            request_timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            watch_interval: Duration::from_secs(DEFAULT_WATCH_SECS),
        }
    }
}

impl RecapConfig {
    /// Read settings from the environment. Unparseable knobs fall back to their
    /// defaults, except `RECAP_DATE`: pinning the wrong night is worse than failing.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.request_timeout,
        };
        let watch_secs = env::var("RECAP_WATCH_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_WATCH_SECS)
            .max(MIN_WATCH_SECS);

        Ok(Self {
            base_url: opt_env("NBA_STATS_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            league_id: opt_env("NBA_LEAGUE_ID").unwrap_or(defaults.league_id),
            season: opt_env("NBA_SEASON"),
            date: date_setting(opt_env("RECAP_DATE"))?,
            refresh: opt_env("RECAP_REFRESH")
                .and_then(|raw| RefreshPolicy::parse(&raw))
                .unwrap_or(defaults.refresh),
            min_three_point_attempts: env::var("RECAP_MIN_3PA")
                .ok()
                .and_then(|val| val.trim().parse::<u32>().ok())
                .unwrap_or(0),
            fetch_parallelism: env::var("FETCH_PARALLELISM")
                .ok()
                .and_then(|val| val.trim().parse::<usize>().ok())
                .filter(|n| *n > 0),
            request_timeout,
            watch_interval: Duration::from_secs(watch_secs),
        })
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(yesterday)
    }
}

pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - ChronoDuration::days(1)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn date_setting(raw: Option<String>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(raw) => match parse_date(&raw) {
            Some(date) => Ok(Some(date)),
            None => bail!("RECAP_DATE must be YYYY-MM-DD, got {raw:?}"),
        },
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_policy_parses_named_and_numeric_forms() {
        assert_eq!(
            RefreshPolicy::parse("per-request"),
            Some(RefreshPolicy::PerRequest)
        );
        assert_eq!(RefreshPolicy::parse("ONCE"), Some(RefreshPolicy::Once));
        assert_eq!(
            RefreshPolicy::parse("600"),
            Some(RefreshPolicy::Ttl(Duration::from_secs(600)))
        );
        assert_eq!(
            RefreshPolicy::parse("90s"),
            Some(RefreshPolicy::Ttl(Duration::from_secs(90)))
        );
        assert_eq!(RefreshPolicy::parse("0"), Some(RefreshPolicy::PerRequest));
        assert_eq!(RefreshPolicy::parse("soon"), None);
    }

    #[test]
    fn fixed_date_overrides_yesterday() {
        let cfg = RecapConfig {
            date: parse_date("2024-12-25"),
            ..RecapConfig::default()
        };
        assert_eq!(
            cfg.reference_date(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
        assert!(parse_date("25/12/2024").is_none());
    }

    #[test]
    fn unparseable_recap_date_is_rejected() {
        assert_eq!(date_setting(None).unwrap(), None);
        assert_eq!(
            date_setting(Some("2024-12-25".to_string())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25)
        );
        let err = date_setting(Some("12/25/2024".to_string())).unwrap_err();
        assert!(err.to_string().contains("12/25/2024"));
    }
}
