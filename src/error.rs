use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecapError>;

pub const SCOREBOARD_ENDPOINT: &str = "scoreboardv2";
pub const BOXSCORE_ENDPOINT: &str = "boxscoretraditionalv3";
pub const STANDINGS_ENDPOINT: &str = "leaguestandingsv3";

#[derive(Debug, Error)]
pub enum RecapError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned http {status}")]
    Status { endpoint: &'static str, status: u16 },

    #[error("malformed {endpoint} response: {detail}")]
    Malformed {
        endpoint: &'static str,
        detail: String,
    },
}

impl RecapError {
    pub fn malformed(endpoint: &'static str, detail: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint,
            detail: detail.into(),
        }
    }

    /// Whether a caller may reasonably retry the whole aggregation.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Client(_) | Self::Malformed { .. } => false,
        }
    }

    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Malformed { endpoint, .. } => Some(endpoint),
            Self::Client(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_transient() {
        let throttled = RecapError::Status {
            endpoint: BOXSCORE_ENDPOINT,
            status: 429,
        };
        let unavailable = RecapError::Status {
            endpoint: BOXSCORE_ENDPOINT,
            status: 503,
        };
        let missing = RecapError::Status {
            endpoint: BOXSCORE_ENDPOINT,
            status: 404,
        };
        assert!(throttled.is_transient());
        assert!(unavailable.is_transient());
        assert!(!missing.is_transient());
    }

    #[test]
    fn malformed_payload_is_a_defect() {
        let err = RecapError::malformed(SCOREBOARD_ENDPOINT, "missing rowSet");
        assert!(!err.is_transient());
        assert_eq!(err.endpoint(), Some(SCOREBOARD_ENDPOINT));
        assert_eq!(
            err.to_string(),
            "malformed scoreboardv2 response: missing rowSet"
        );
    }
}
