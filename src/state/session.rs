use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{PageFetcher, PageSource};
use crate::pipeline::{Pipeline, PipelineStats};
use crate::scorer::SignalTable;
use crate::types::Sport;

/// Outcome of the most recent cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No cycle has run yet.
    Idle,
    Ready,
    /// The site reported no games for the sport today.
    NoGames,
    /// The fetch failed; the table is empty until the next cycle.
    Error(String),
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "idle"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::NoGames => write!(f, "no games scheduled today"),
            SessionStatus::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Cached result of the last fetch-and-process cycle.
///
/// The table is replaced wholesale per cycle. A new cycle runs when the sport
/// changes or a refresh was requested; otherwise the cached table is served.
pub struct Session<S = PageFetcher> {
    source: S,
    pipeline: Pipeline,
    sport: Option<Sport>,
    table: SignalTable,
    stats: PipelineStats,
    status: SessionStatus,
    fetched_at: Option<DateTime<Utc>>,
    refresh_requested: bool,
    cycles: u64,
}

impl Session<PageFetcher> {
    pub fn new(cfg: &Config) -> Result<Self> {
        Self::with_source(PageFetcher::new(cfg)?, cfg)
    }
}

impl<S: PageSource> Session<S> {
    pub fn with_source(source: S, cfg: &Config) -> Result<Self> {
        Ok(Self {
            source,
            pipeline: Pipeline::new(cfg.target_tz, cfg.confidence_scheme)?,
            sport: None,
            table: SignalTable::empty(cfg.default_sport),
            stats: PipelineStats::default(),
            status: SessionStatus::Idle,
            fetched_at: None,
            refresh_requested: false,
            cycles: 0,
        })
    }

    /// Edge-triggered: the next `ensure` runs a cycle, then the flag clears.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn needs_cycle(&self, sport: Sport) -> bool {
        self.refresh_requested || self.sport != Some(sport)
    }

    /// Serve the cached table for `sport`, running a cycle first if needed.
    pub async fn ensure(&mut self, sport: Sport) -> &SignalTable {
        if self.needs_cycle(sport) {
            self.run_cycle(sport).await;
        }
        &self.table
    }

    /// Fetch and process one page. Fetch errors leave an empty table and an
    /// `Error` status; they never propagate.
    pub async fn run_cycle(&mut self, sport: Sport) -> &SignalTable {
        self.refresh_requested = false;
        self.sport = Some(sport);
        self.cycles += 1;
        self.fetched_at = Some(Utc::now());

        match self.source.fetch(sport).await {
            Ok(html) => {
                let (table, stats) = self.pipeline.process(&html, sport);
                self.status = if stats.no_games {
                    SessionStatus::NoGames
                } else {
                    SessionStatus::Ready
                };
                info!(%sport, rows = table.rows().len(), cycle = self.cycles, "[SESSION] cycle complete");
                self.table = table;
                self.stats = stats;
            }
            Err(e) => {
                error!(%sport, "[SESSION] fetch failed: {e}");
                self.status = SessionStatus::Error(e.to_string());
                self.table = SignalTable::empty(sport);
                self.stats = PipelineStats::default();
            }
        }

        &self.table
    }

    pub fn table(&self) -> &SignalTable {
        &self.table
    }

    pub fn sport(&self) -> Option<Sport> {
        self.sport
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}
