//! Health snapshot for the /health endpoint, read straight off the session.

use serde::Serialize;

use crate::fetcher::PageSource;
use crate::state::{Session, SessionStatus};
use crate::types::Sport;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub sport: Option<Sport>,
    pub cycles_run: u64,
    /// True when the last cycle fetched a page (even one with no games).
    pub last_cycle_ok: bool,
    pub last_row_count: usize,
    /// Millisecond timestamp of the last cycle (None before the first).
    pub last_cycle_at_ms: Option<i64>,
    pub last_error: Option<String>,
}

impl HealthReport {
    pub fn from_session<S: PageSource>(session: &Session<S>) -> Self {
        let status = session.status();
        let last_error = match status {
            SessionStatus::Error(e) => Some(e.clone()),
            _ => None,
        };

        Self {
            status: status.to_string(),
            sport: session.sport(),
            cycles_run: session.cycles(),
            last_cycle_ok: matches!(status, SessionStatus::Ready | SessionStatus::NoGames),
            last_row_count: session.table().rows().len(),
            last_cycle_at_ms: session.fetched_at().map(|t| t.timestamp_millis()),
            last_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{AppError, Result};

    struct FlakySource;

    impl PageSource for FlakySource {
        async fn fetch(&self, sport: Sport) -> Result<String> {
            match sport {
                Sport::Nfl => Ok("<p>There are no games scheduled today.</p>".to_string()),
                _ => Err(AppError::Status { status: 500, url: sport.consensus_path().to_string() }),
            }
        }
    }

    #[tokio::test]
    async fn report_follows_session_cycles() {
        let mut session = Session::with_source(FlakySource, &Config::default()).unwrap();

        let idle = HealthReport::from_session(&session);
        assert_eq!(idle.cycles_run, 0);
        assert!(!idle.last_cycle_ok);
        assert_eq!(idle.last_cycle_at_ms, None);

        session.run_cycle(Sport::Nfl).await;
        let ok = HealthReport::from_session(&session);
        assert_eq!(ok.cycles_run, 1);
        assert!(ok.last_cycle_ok);
        assert_eq!(ok.sport, Some(Sport::Nfl));
        assert!(ok.last_cycle_at_ms.is_some());
        assert_eq!(ok.last_error, None);

        session.run_cycle(Sport::Nba).await;
        let failed = HealthReport::from_session(&session);
        assert_eq!(failed.cycles_run, 2);
        assert!(!failed.last_cycle_ok);
        assert_eq!(failed.last_row_count, 0);
        assert!(failed.last_error.as_deref().is_some_and(|e| e.contains("500")));
    }
}
