use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use tracing::debug;

use crate::config::RecapConfig;
use crate::error::{RecapError, Result};

// stats.nba.com drops requests that do not look like they come from the site.
const BROWSER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const SITE: &str = "https://www.nba.com";

pub fn build_client(config: &RecapConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ORIGIN, HeaderValue::from_static(SITE));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
    headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));

    // `None` must reach the builder, otherwise reqwest keeps its own 30 s default.
    Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .build()
        .map_err(RecapError::Client)
}

/// GET `url` with `query` and return the body, mapping failures onto the recap error taxonomy.
pub fn fetch_json(
    client: &Client,
    endpoint: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String> {
    debug!(endpoint, url, ?query, "requesting");
    let resp = client
        .get(url)
        .query(query)
        .send()
        .map_err(|source| RecapError::Transport { endpoint, source })?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RecapError::Status {
            endpoint,
            status: status.as_u16(),
        });
    }
    resp.text()
        .map_err(|source| RecapError::Transport { endpoint, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SCOREBOARD_ENDPOINT;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Serves one `{}` response after `delay`, returning the url to hit.
    fn slow_server(delay: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                thread::sleep(delay);
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
                );
            }
        });
        format!("http://{addr}/{SCOREBOARD_ENDPOINT}")
    }

    fn config_with_timeout(request_timeout: Option<Duration>) -> RecapConfig {
        RecapConfig {
            request_timeout,
            ..RecapConfig::default()
        }
    }

    #[test]
    fn configured_timeout_is_a_transient_transport_error() {
        let url = slow_server(Duration::from_millis(1500));
        let client = build_client(&config_with_timeout(Some(Duration::from_millis(100)))).unwrap();
        let err = fetch_json(&client, SCOREBOARD_ENDPOINT, &url, &[]).unwrap_err();
        assert!(matches!(err, RecapError::Transport { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn no_timeout_waits_for_a_slow_reply() {
        let url = slow_server(Duration::from_millis(500));
        let client = build_client(&config_with_timeout(None)).unwrap();
        let body = fetch_json(&client, SCOREBOARD_ENDPOINT, &url, &[]).unwrap();
        assert_eq!(body, "{}");
    }
}
