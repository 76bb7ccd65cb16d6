pub mod boxscore_fetch;
pub mod config;
pub mod error;
pub mod http_client;
pub mod leaderboards;
pub mod logging;
pub mod recap;
pub mod recap_export;
pub mod result_set;
pub mod scoreboard_fetch;
pub mod source;
pub mod standings_fetch;
pub mod state;
