use chrono_tz::Tz;
use tracing::info;

use crate::config::NO_GAMES_SENTINEL;
use crate::detector::{classify_stream, ClassifyStats};
use crate::error::Result;
use crate::extractor::{CardExtractor, ExtractStats};
use crate::scorer::{SignalEngine, SignalTable};
use crate::state::MatchupBooks;
use crate::types::{ConfidenceScheme, Sport};

/// Counters from one markup → table pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    pub no_games: bool,
    pub extract: ExtractStats,
    pub classify: ClassifyStats,
    pub consolidated: usize,
    pub rows: usize,
}

/// Pure markup → signal table transform. Holds only compiled selectors and
/// settings, so one instance serves every cycle.
pub struct Pipeline {
    extractor: CardExtractor,
    scheme: ConfidenceScheme,
}

impl Pipeline {
    pub fn new(tz: Tz, scheme: ConfidenceScheme) -> Result<Self> {
        Ok(Self {
            extractor: CardExtractor::new(tz)?,
            scheme,
        })
    }

    pub fn process(&self, html: &str, sport: Sport) -> (SignalTable, PipelineStats) {
        let mut stats = PipelineStats::default();

        if html.contains(NO_GAMES_SENTINEL) {
            info!(%sport, "[PIPELINE] no games scheduled today");
            stats.no_games = true;
            return (SignalTable::empty(sport), stats);
        }

        let (records, extract) = self.extractor.extract_page(html);
        let (classified, classify) = classify_stream(&records);
        let books = MatchupBooks::aggregate(&classified);
        let table = SignalEngine::new(sport, self.scheme).run(books.iter());

        stats.extract = extract;
        stats.classify = classify;
        stats.consolidated = books.len();
        stats.rows = table.rows().len();

        info!(
            %sport,
            cards = stats.extract.cards_seen,
            records = stats.extract.extracted,
            consolidated = stats.consolidated,
            rows = stats.rows,
            "[PIPELINE] {} cards → {} matchups → {} signal rows",
            stats.extract.cards_seen,
            stats.consolidated,
            stats.rows,
        );
        info!(
            "[PIPELINE] rejected: no_chart={} no_teams={} unknown_category={} orphan_totals={}",
            stats.extract.rejected_no_chart,
            stats.extract.rejected_no_teams,
            stats.classify.unknown,
            stats.classify.orphan_totals,
        );

        (table, stats)
    }
}
