use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::types::{BetCategory, Column, ConfidenceLabel, DecisionLabel, SignalRow, Sport};

pub const UNPARSED_TIME_WARNING: &str =
    "Some matchup times could not be parsed and may be excluded from time-based filtering.";

/// Final ranked output of one fetch-and-process cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    sport: Sport,
    rows: Vec<SignalRow>,
    /// User-facing notice, set when any row lacks a matchup time.
    warning: Option<String>,
}

/// Sub-views the dashboard renders under the main table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Category(BetCategory),
    /// Sharp Money Play rows with Lean Sharp / Monitor confidence.
    LeanSharp,
    /// Sharp Money Play rows scoring 10 or more: Verified Sharp Play under
    /// either scheme, plus the eight-band Strong Sharp band.
    VerifiedSharp,
}

impl View {
    pub const ALL: [View; 6] = [
        View::All,
        View::Category(BetCategory::Moneyline),
        View::Category(BetCategory::Spread),
        View::Category(BetCategory::Total),
        View::LeanSharp,
        View::VerifiedSharp,
    ];

    pub fn title(&self) -> String {
        match self {
            View::All => "All Moneyline, Spread, and Total Picks".to_string(),
            View::Category(c) => format!("{c} Picks"),
            View::LeanSharp => "Sharp Money Picks - Lean Sharp / Monitor".to_string(),
            View::VerifiedSharp => "Sharp Money Picks - Verified Sharp Play".to_string(),
        }
    }

    pub fn matches(&self, row: &SignalRow) -> bool {
        match self {
            View::All => true,
            View::Category(c) => row.category == *c,
            View::LeanSharp => {
                row.decision_label == DecisionLabel::SharpMoneyPlay
                    && row.confidence_label == ConfidenceLabel::LeanSharp
            }
            View::VerifiedSharp => {
                row.decision_label == DecisionLabel::SharpMoneyPlay
                    && matches!(
                        row.confidence_label,
                        ConfidenceLabel::VerifiedSharp | ConfidenceLabel::StrongSharp
                    )
            }
        }
    }
}

impl std::str::FromStr for View {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(View::All),
            "lean_sharp" => Ok(View::LeanSharp),
            "verified_sharp" => Ok(View::VerifiedSharp),
            other => other.parse::<BetCategory>().map(View::Category),
        }
    }
}

/// Inclusive `[start, end]` kickoff window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeWindow {
    /// From `now` to `now + hours`, in `tz`.
    pub fn next_hours(now: DateTime<Utc>, hours: u32, tz: &Tz) -> Self {
        let start = now.with_timezone(tz);
        Self {
            start,
            end: start + Duration::hours(i64::from(hours)),
        }
    }

    /// Rows without a kickoff time never fall inside a window.
    pub fn contains(&self, time: Option<&DateTime<Tz>>) -> bool {
        time.is_some_and(|t| *t >= self.start && *t <= self.end)
    }
}

impl SignalTable {
    pub fn new(sport: Sport, rows: Vec<SignalRow>, warning: Option<String>) -> Self {
        Self { sport, rows, warning }
    }

    pub fn empty(sport: Sport) -> Self {
        Self::new(sport, Vec::new(), None)
    }

    pub fn sport(&self) -> Sport {
        self.sport
    }

    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows matching `view`, optionally bounded to a kickoff window; sort order kept.
    pub fn view(&self, view: View, window: Option<&TimeWindow>) -> Vec<&SignalRow> {
        self.rows
            .iter()
            .filter(|row| view.matches(row))
            .filter(|row| window.map_or(true, |w| w.contains(row.matchup_time.as_ref())))
            .collect()
    }
}

/// Project rows onto `columns`; a column a row has no value for is `None`.
pub fn project<'a>(
    rows: impl IntoIterator<Item = &'a SignalRow>,
    columns: &[Column],
) -> Vec<Vec<Option<String>>> {
    rows.into_iter()
        .map(|row| columns.iter().map(|col| cell(row, *col)).collect())
        .collect()
}

pub fn cell(row: &SignalRow, column: Column) -> Option<String> {
    match column {
        Column::Matchup => Some(row.matchup.clone()),
        Column::Team => Some(row.team.clone()),
        Column::MatchupTime => row.matchup_time.as_ref().map(format_matchup_time),
        Column::BettingCategory => Some(row.category.to_string()),
        Column::DecisionLogic => Some(row.decision_label.to_string()),
        Column::ConfidenceScoreLabel => Some(row.confidence_label.to_string()),
        Column::RelativeDifferential => Some(format!("{:.2}", row.relative_differential)),
        Column::BetsPct => Some(format_pct(row.bets_pct)),
        Column::MoneyPct => Some(format_pct(row.money_pct)),
        Column::ActualDiffPct => Some(format!("{:.2}", row.actual_diff_pct)),
        Column::AwayOdds => row.away_odds.clone(),
        Column::HomeOdds => row.home_odds.clone(),
        Column::SpreadLine => match row.category {
            BetCategory::Moneyline => None,
            _ => row.line.clone(),
        },
        Column::Sport => Some(row.sport.to_string()),
    }
}

/// `03/01 07:10pm`
pub fn format_matchup_time(t: &DateTime<Tz>) -> String {
    t.format("%m/%d %I:%M%P").to_string()
}

fn format_pct(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}
