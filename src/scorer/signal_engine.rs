use std::cmp::Ordering;

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::config::signal_thresholds::*;
use crate::config::HANDLE_SCALE;
use crate::scorer::labels::{confidence_label, decision_label};
use crate::scorer::table::{SignalTable, UNPARSED_TIME_WARNING};
use crate::types::{BetCategory, ConfidenceScheme, ConsolidatedMatchup, SignalRow, Sport};

/// One side of a consolidated matchup with both percentages present.
#[derive(Debug, Clone, PartialEq)]
pub struct SideObservation {
    pub matchup: String,
    pub team: String,
    pub matchup_time: Option<DateTime<Tz>>,
    pub category: BetCategory,
    pub bets_pct: f64,
    pub money_pct: f64,
    pub line: Option<String>,
    pub away_odds: Option<String>,
    pub home_odds: Option<String>,
}

impl SideObservation {
    /// money% − bets%, rounded to cents of a percent.
    pub fn actual_diff_pct(&self) -> f64 {
        ((self.money_pct - self.bets_pct) * 100.0).round() / 100.0
    }
}

/// Split a consolidated row into per-side observations. A side is emitted
/// only when it has both a bets% and a money%.
pub fn explode(row: &ConsolidatedMatchup) -> Vec<SideObservation> {
    [false, true]
        .into_iter()
        .filter_map(|second| {
            let bets_pct = row.bets.side(second)?;
            let money_pct = row.money.side(second)?;
            Some(SideObservation {
                matchup: row.matchup_key.clone(),
                team: side_label(row, second),
                matchup_time: row.matchup_time,
                category: row.category,
                bets_pct,
                money_pct,
                line: row.line.clone(),
                away_odds: row.away_odds.clone(),
                home_odds: row.home_odds.clone(),
            })
        })
        .collect()
}

fn side_label(row: &ConsolidatedMatchup, second: bool) -> String {
    match row.category {
        BetCategory::Total => {
            let side = if second { "Under" } else { "Over" };
            match &row.line {
                Some(line) => format!("{side} {line}"),
                None => side.to_string(),
            }
        }
        _ if second => row.side2.clone(),
        _ => row.side1.clone(),
    }
}

/// Attach every derived metric and label to an observation.
pub fn score(obs: SideObservation, sport: Sport, scheme: ConfidenceScheme) -> SignalRow {
    let actual_diff_pct = obs.actual_diff_pct();
    let bets = obs.bets_pct;
    let money = obs.money_pct;

    let estimated_handle = sport.baseline_handle() * HANDLE_SCALE;
    let divergence = (bets - money).abs();
    let disagreement_index = bets.min(money);
    let consensus_strength = bets.max(money);
    let weighted_signal = estimated_handle * disagreement_index * consensus_strength / 1_000_000.0;
    let relative_differential = actual_diff_pct * bets / 100.0;
    let confidence_score = confidence_score(relative_differential, actual_diff_pct, weighted_signal, disagreement_index);

    SignalRow {
        matchup: obs.matchup,
        team: obs.team,
        matchup_time: obs.matchup_time,
        category: obs.category,
        bets_pct: bets,
        money_pct: money,
        line: obs.line,
        away_odds: obs.away_odds,
        home_odds: obs.home_odds,
        sport,
        actual_diff_pct,
        divergence,
        disagreement_index,
        consensus_strength,
        estimated_handle,
        weighted_signal,
        relative_differential,
        confidence_score,
        decision_label: decision_label(actual_diff_pct),
        confidence_label: confidence_label(confidence_score, scheme),
    }
}

/// Weighted blend of the differential metrics (higher = sharper).
pub fn confidence_score(
    relative_differential: f64,
    actual_diff_pct: f64,
    weighted_signal: f64,
    disagreement_index: f64,
) -> f64 {
    W_RELATIVE_DIFF * relative_differential + W_ACTUAL_DIFF * actual_diff_pct
        + W_WEIGHTED_SIGNAL * weighted_signal * 100.0
        - W_DISAGREEMENT * disagreement_index
}

/// Earliest kickoff first (unknown times last), then strongest differential.
pub fn compare_rows(a: &SignalRow, b: &SignalRow) -> Ordering {
    let by_time = match (&a.matchup_time, &b.matchup_time) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_time.then_with(|| b.relative_differential.total_cmp(&a.relative_differential))
}

/// Turns consolidated matchups into the final ranked signal table.
#[derive(Debug, Clone, Copy)]
pub struct SignalEngine {
    sport: Sport,
    scheme: ConfidenceScheme,
}

impl SignalEngine {
    pub fn new(sport: Sport, scheme: ConfidenceScheme) -> Self {
        Self { sport, scheme }
    }

    pub fn run<'a>(&self, consolidated: impl IntoIterator<Item = &'a ConsolidatedMatchup>) -> SignalTable {
        let observations: Vec<SideObservation> = consolidated.into_iter().flat_map(explode).collect();
        let exploded = observations.len();

        let mut rows: Vec<SignalRow> = observations
            .into_iter()
            .filter(|obs| obs.actual_diff_pct().abs() > MIN_ABS_DIFF)
            .map(|obs| score(obs, self.sport, self.scheme))
            .filter(|row| row.relative_differential.abs() >= MIN_ABS_RELATIVE_DIFF)
            .collect();

        rows.sort_by(compare_rows);

        let untimed = rows.iter().filter(|r| r.matchup_time.is_none()).count();
        let warning = if untimed > 0 {
            warn!(sport = %self.sport, untimed, "[SIGNAL] {UNPARSED_TIME_WARNING}");
            Some(UNPARSED_TIME_WARNING.to_string())
        } else {
            None
        };

        debug!(
            sport = %self.sport,
            exploded,
            qualified = rows.len(),
            "[SIGNAL] scored {exploded} sides → {} qualifying rows",
            rows.len()
        );

        SignalTable::new(self.sport, rows, warning)
    }
}
