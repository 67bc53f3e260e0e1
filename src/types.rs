use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Sport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sport {
    Nba,
    Nfl,
    Nhl,
    Mlb,
    Ncaaf,
    Ncaab,
}

impl Sport {
    /// Selector order shown by the dashboard.
    pub const ALL: [Sport; 6] = [
        Sport::Nba,
        Sport::Nfl,
        Sport::Nhl,
        Sport::Mlb,
        Sport::Ncaaf,
        Sport::Ncaab,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nba => "NBA",
            Sport::Nfl => "NFL",
            Sport::Nhl => "NHL",
            Sport::Mlb => "MLB",
            Sport::Ncaaf => "NCAAF",
            Sport::Ncaab => "NCAAB",
        }
    }

    /// Site path for the sport's consensus page: `/nba/consensus-picks`.
    pub fn consensus_path(&self) -> String {
        format!("/{}/consensus-picks", self.as_str().to_lowercase())
    }

    /// Typical nominal handle (USD) per game, used to weight the signal.
    pub fn baseline_handle(&self) -> f64 {
        match self {
            Sport::Nfl => 12_000_000.0,
            Sport::Ncaaf => 4_000_000.0,
            Sport::Nba => 2_000_000.0,
            Sport::Mlb => 1_000_000.0,
            Sport::Nhl => 800_000.0,
            Sport::Ncaab => 500_000.0,
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sport {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::Config(format!("unknown sport '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Betting category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetCategory {
    Moneyline,
    Spread,
    Total,
}

impl BetCategory {
    pub const ALL: [BetCategory; 3] = [BetCategory::Moneyline, BetCategory::Spread, BetCategory::Total];
}

impl std::fmt::Display for BetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BetCategory::Moneyline => "Moneyline",
            BetCategory::Spread => "Spread",
            BetCategory::Total => "Total",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for BetCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moneyline" | "ml" => Ok(BetCategory::Moneyline),
            "spread" => Ok(BetCategory::Spread),
            "total" | "totals" => Ok(BetCategory::Total),
            other => Err(AppError::Config(format!("unknown betting category '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Extracted card primitives
// ---------------------------------------------------------------------------

/// One side-by-side percentage bar: (side 1, side 2), each in [0, 100] when present.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PercentPair {
    pub first: Option<f64>,
    pub second: Option<f64>,
}

impl PercentPair {
    pub fn new(first: Option<f64>, second: Option<f64>) -> Self {
        Self { first, second }
    }

    /// Fill a single missing side from its complement. No-op when both or
    /// neither side is present; present pairs are not forced to sum to 100.
    pub fn impute(&mut self) {
        match (self.first, self.second) {
            (Some(a), None) => self.second = Some(100.0 - a),
            (None, Some(b)) => self.first = Some(100.0 - b),
            _ => {}
        }
    }

    pub fn side(&self, second: bool) -> Option<f64> {
        if second {
            self.second
        } else {
            self.first
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestOdds {
    pub away: Option<String>,
    pub home: Option<String>,
}

/// Everything pulled out of one `trend-card`, before any category semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMarkupRecord {
    pub teams: Vec<String>,
    pub bets_label: Option<String>,
    pub money_label: Option<String>,
    pub bets: Option<PercentPair>,
    pub money: Option<PercentPair>,
    pub best_odds: BestOdds,
    pub matchup_time: Option<DateTime<Tz>>,
}

// ---------------------------------------------------------------------------
// Consolidated matchup
// ---------------------------------------------------------------------------

/// One row per (matchup_key, category) after merging bets-rows and money-rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedMatchup {
    /// `"AWAY vs HOME"` built from normalized team codes.
    pub matchup_key: String,
    pub category: BetCategory,
    pub side1: String,
    pub side2: String,
    /// Spread: `"-3.5 / +3.5"`. Total: `"47.5"`. Moneyline: none.
    pub line: Option<String>,
    pub away_odds: Option<String>,
    pub home_odds: Option<String>,
    pub matchup_time: Option<DateTime<Tz>>,
    pub bets: PercentPair,
    pub money: PercentPair,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLabel {
    /// money% leads bets% by 15+ points
    SharpMoneyPlay,
    /// bets% leads money% by 15+ points
    PublicTrap,
    /// gap inside (-10, 10)
    NoSignal,
    Neutral,
}

impl std::fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DecisionLabel::SharpMoneyPlay => "Sharp Money Play",
            DecisionLabel::PublicTrap => "Public Trap (Fade)",
            DecisionLabel::NoSignal => "No Signal",
            DecisionLabel::Neutral => "Neutral",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    VerifiedSharp,
    StrongSharp,
    LeanSharp,
    SlightSharp,
    Neutral,
    SlightPublic,
    PublicLean,
    PublicTrap,
    /// Score outside every band of the active scheme.
    Unbanded,
}

impl std::fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfidenceLabel::VerifiedSharp => "Verified Sharp Play",
            ConfidenceLabel::StrongSharp => "Strong Sharp",
            ConfidenceLabel::LeanSharp => "Lean Sharp / Monitor",
            ConfidenceLabel::SlightSharp => "Slight Sharp",
            ConfidenceLabel::Neutral => "No Signal / Neutral",
            ConfidenceLabel::SlightPublic => "Slight Public",
            ConfidenceLabel::PublicLean => "Public-lean bias",
            ConfidenceLabel::PublicTrap => "Public Trap (Fade)",
            ConfidenceLabel::Unbanded => "Other",
        };
        write!(f, "{s}")
    }
}

/// Which banding turns a confidence score into a [`ConfidenceLabel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceScheme {
    /// Continuous coverage of the score line in eight bands.
    #[default]
    EightBand,
    /// Legacy five bands; scores above 20 fall out as Unbanded.
    FiveBand,
}

impl std::str::FromStr for ConfidenceScheme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "eight_band" | "eight" | "8" => Ok(ConfidenceScheme::EightBand),
            "five_band" | "five" | "5" => Ok(ConfidenceScheme::FiveBand),
            other => Err(AppError::Config(format!(
                "CONFIDENCE_SCHEME must be eight_band or five_band, got '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Signal rows
// ---------------------------------------------------------------------------

/// One side of one consolidated matchup, with every derived metric attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRow {
    pub matchup: String,
    /// Team code, or `Over <line>` / `Under <line>` for totals.
    pub team: String,
    pub matchup_time: Option<DateTime<Tz>>,
    pub category: BetCategory,
    pub bets_pct: f64,
    pub money_pct: f64,
    pub line: Option<String>,
    pub away_odds: Option<String>,
    pub home_odds: Option<String>,
    pub sport: Sport,

    pub actual_diff_pct: f64,
    pub divergence: f64,
    pub disagreement_index: f64,
    pub consensus_strength: f64,
    pub estimated_handle: f64,
    pub weighted_signal: f64,
    pub relative_differential: f64,
    pub confidence_score: f64,
    pub decision_label: DecisionLabel,
    pub confidence_label: ConfidenceLabel,
}

/// Output columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Matchup,
    Team,
    MatchupTime,
    BettingCategory,
    DecisionLogic,
    ConfidenceScoreLabel,
    RelativeDifferential,
    BetsPct,
    MoneyPct,
    ActualDiffPct,
    AwayOdds,
    HomeOdds,
    SpreadLine,
    Sport,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Matchup,
        Column::Team,
        Column::MatchupTime,
        Column::BettingCategory,
        Column::DecisionLogic,
        Column::ConfidenceScoreLabel,
        Column::RelativeDifferential,
        Column::BetsPct,
        Column::MoneyPct,
        Column::ActualDiffPct,
        Column::AwayOdds,
        Column::HomeOdds,
        Column::SpreadLine,
        Column::Sport,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Matchup => "Matchup",
            Column::Team => "Team",
            Column::MatchupTime => "Matchup Time",
            Column::BettingCategory => "Betting Category",
            Column::DecisionLogic => "Decision Logic",
            Column::ConfidenceScoreLabel => "Confidence Score Label",
            Column::RelativeDifferential => "Relative Differential",
            Column::BetsPct => "Bets %",
            Column::MoneyPct => "Money %",
            Column::ActualDiffPct => "Actual Diff %",
            Column::AwayOdds => "Away Odds",
            Column::HomeOdds => "Home Odds",
            Column::SpreadLine => "Spread Line",
            Column::Sport => "Sport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sport_parses_case_insensitively() {
        assert_eq!("nfl".parse::<Sport>().unwrap(), Sport::Nfl);
        assert_eq!(" NCAAB ".parse::<Sport>().unwrap(), Sport::Ncaab);
        assert!("cricket".parse::<Sport>().is_err());
    }

    #[test]
    fn consensus_path_is_lowercase() {
        assert_eq!(Sport::Ncaaf.consensus_path(), "/ncaaf/consensus-picks");
    }

    #[test]
    fn impute_fills_single_missing_side() {
        let mut pair = PercentPair::new(Some(45.0), None);
        pair.impute();
        assert_eq!(pair, PercentPair::new(Some(45.0), Some(55.0)));

        let mut pair = PercentPair::new(None, Some(30.0));
        pair.impute();
        assert_eq!(pair, PercentPair::new(Some(70.0), Some(30.0)));
    }

    #[test]
    fn impute_is_idempotent() {
        let mut pair = PercentPair::new(None, Some(12.5));
        pair.impute();
        let once = pair;
        pair.impute();
        assert_eq!(pair, once);
        assert!((pair.first.unwrap() + pair.second.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn impute_leaves_full_and_empty_pairs_alone() {
        let mut full = PercentPair::new(Some(52.0), Some(49.0));
        full.impute();
        assert_eq!(full, PercentPair::new(Some(52.0), Some(49.0)));

        let mut empty = PercentPair::default();
        empty.impute();
        assert_eq!(empty, PercentPair::default());
    }

    #[test]
    fn confidence_scheme_defaults_to_eight_band() {
        assert_eq!("".parse::<ConfidenceScheme>().unwrap(), ConfidenceScheme::EightBand);
        assert_eq!("five_band".parse::<ConfidenceScheme>().unwrap(), ConfidenceScheme::FiveBand);
        assert!("seven".parse::<ConfidenceScheme>().is_err());
    }
}
