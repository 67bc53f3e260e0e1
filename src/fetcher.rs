use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::error::{AppError, Result};
use crate::types::Sport;

/// Anything that can hand back the raw consensus markup for a sport.
pub trait PageSource {
    fn fetch(&self, sport: Sport) -> impl Future<Output = Result<String>> + Send;
}

/// Blocking-per-cycle GET of the consensus page. One request, no retry.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl PageFetcher {
    pub fn new(cfg: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(config::USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static(config::ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(config::ACCEPT_LANGUAGE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, sport: Sport) -> String {
        format!("{}{}", self.base_url, sport.consensus_path())
    }
}

impl PageSource for PageFetcher {
    async fn fetch(&self, sport: Sport) -> Result<String> {
        let url = self.url_for(sport);
        let started = Instant::now();
        info!(%sport, %url, "[FETCH] requesting consensus page");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%sport, status = status.as_u16(), "[FETCH] non-success status");
            return Err(AppError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = resp.text().await?;
        info!(
            %sport,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "[FETCH] page fetched for {sport}"
        );
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_sport_path() {
        let cfg = Config {
            base_url: "https://odds.example.com/".to_string(),
            ..Config::default()
        };
        let fetcher = PageFetcher::new(&cfg).unwrap();
        assert_eq!(fetcher.url_for(Sport::Mlb), "https://odds.example.com/mlb/consensus-picks");
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let cfg = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            http_timeout_secs: 2,
            ..Config::default()
        };
        let fetcher = PageFetcher::new(&cfg).unwrap();
        assert!(fetcher.fetch(Sport::Nba).await.is_err());
    }
}
