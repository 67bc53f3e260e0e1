use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::BETS_ROW_LABEL;
use crate::detector::labels;
use crate::types::{BestOdds, BetCategory, PercentPair, RawMarkupRecord};

/// Category decision for one record, before matchup identity is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Moneyline { team1: String, team2: String },
    Spread { team1: String, team2: String, line: Option<String> },
    /// Over/under card; carries no team codes of its own.
    Total { line: Option<String> },
    Unknown,
}

/// Decide the betting category of a record from its labels.
/// Moneyline is checked before Spread; anything unmatched is Unknown.
pub fn classify(record: &RawMarkupRecord) -> Classification {
    let bets_label = record.bets_label.as_deref().unwrap_or("");

    if bets_label == BETS_ROW_LABEL {
        let [raw1, raw2, ..] = record.teams.as_slice() else {
            return Classification::Unknown;
        };

        if labels::is_team_code(raw1) && labels::is_team_code(raw2) {
            return Classification::Moneyline {
                team1: raw1.clone(),
                team2: raw2.clone(),
            };
        }
        if labels::has_sign(raw1) || labels::has_sign(raw2) {
            return Classification::Spread {
                team1: labels::spread_team(raw1).to_string(),
                team2: labels::spread_team(raw2).to_string(),
                line: labels::spread_line(raw1, raw2),
            };
        }
        return Classification::Unknown;
    }

    if labels::is_total_label(bets_label) {
        let line = match record.teams.as_slice() {
            [first, _, ..] => labels::total_line(first),
            _ => None,
        }
        .or_else(|| labels::total_line(bets_label))
        .map(str::to_string);
        return Classification::Total { line };
    }

    Classification::Unknown
}

/// A record with its category settled and its matchup identity attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    pub category: BetCategory,
    pub matchup_key: String,
    pub side1: String,
    pub side2: String,
    pub line: Option<String>,
    pub best_odds: BestOdds,
    pub matchup_time: Option<DateTime<Tz>>,
    pub bets: Option<PercentPair>,
    pub money: Option<PercentPair>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifyStats {
    pub moneyline: usize,
    pub spread: usize,
    pub total: usize,
    pub unknown: usize,
    /// Total cards seen before any moneyline/spread card gave them a matchup.
    pub orphan_totals: usize,
}

/// Accumulator threaded through the record stream: the team pair of the most
/// recent moneyline or spread card. Total cards borrow it as their identity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchupTracker {
    current: Option<(String, String)>,
}

impl MatchupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<(&str, &str)> {
        self.current.as_ref().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Classify one record against the tracked identity, advancing the tracker
    /// on moneyline/spread cards. Returns None for records that can't be placed.
    pub fn observe(&mut self, record: &RawMarkupRecord, stats: &mut ClassifyStats) -> Option<ClassifiedRecord> {
        let (category, line) = match classify(record) {
            Classification::Moneyline { team1, team2 } => {
                stats.moneyline += 1;
                self.current = Some((team1, team2));
                (BetCategory::Moneyline, None)
            }
            Classification::Spread { team1, team2, line } => {
                stats.spread += 1;
                self.current = Some((team1, team2));
                (BetCategory::Spread, line)
            }
            Classification::Total { line } => {
                if self.current.is_none() {
                    stats.orphan_totals += 1;
                    return None;
                }
                stats.total += 1;
                (BetCategory::Total, line)
            }
            Classification::Unknown => {
                stats.unknown += 1;
                return None;
            }
        };

        let (side1, side2) = self.current.clone()?;
        Some(ClassifiedRecord {
            category,
            matchup_key: format!("{side1} vs {side2}"),
            side1,
            side2,
            line,
            best_odds: record.best_odds.clone(),
            matchup_time: record.matchup_time,
            bets: record.bets,
            money: record.money,
        })
    }
}

/// Classify an ordered record stream, threading a fresh tracker through it.
pub fn classify_stream(records: &[RawMarkupRecord]) -> (Vec<ClassifiedRecord>, ClassifyStats) {
    let mut stats = ClassifyStats::default();
    let (classified, _) = records.iter().fold(
        (Vec::with_capacity(records.len()), MatchupTracker::new()),
        |(mut out, mut tracker), record| {
            if let Some(c) = tracker.observe(record, &mut stats) {
                out.push(c);
            }
            (out, tracker)
        },
    );
    (classified, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(teams: &[&str], bets_label: &str) -> RawMarkupRecord {
        RawMarkupRecord {
            teams: teams.iter().map(|t| t.to_string()).collect(),
            bets_label: Some(bets_label.to_string()),
            money_label: Some("% of Money".to_string()),
            bets: Some(PercentPair::new(Some(55.0), Some(45.0))),
            money: Some(PercentPair::new(Some(40.0), Some(60.0))),
            best_odds: BestOdds::default(),
            matchup_time: None,
        }
    }

    #[test]
    fn moneyline_from_bare_codes() {
        assert_eq!(
            classify(&record(&["LAL", "BOS"], "% of Bets")),
            Classification::Moneyline { team1: "LAL".into(), team2: "BOS".into() }
        );
    }

    #[test]
    fn spread_strips_codes_and_joins_line() {
        assert_eq!(
            classify(&record(&["LAL -3.5", "BOS +3.5"], "% of Bets")),
            Classification::Spread {
                team1: "LAL".into(),
                team2: "BOS".into(),
                line: Some("-3.5 / +3.5".into()),
            }
        );
    }

    #[test]
    fn spread_without_code_keeps_raw_label() {
        let c = classify(&record(&["-7", "+7"], "% of Bets"));
        assert_eq!(
            c,
            Classification::Spread { team1: "-7".into(), team2: "+7".into(), line: Some("-7 / +7".into()) }
        );
    }

    #[test]
    fn total_line_from_team_label() {
        assert_eq!(
            classify(&record(&["o47.5", "u47.5"], "(o/u)")),
            Classification::Total { line: Some("47.5".into()) }
        );
        assert_eq!(
            classify(&record(&["Over", "Under"], "(o47.5)")),
            Classification::Total { line: Some("47.5".into()) }
        );
    }

    #[test]
    fn total_line_read_when_second_side_is_blank() {
        assert_eq!(
            classify(&record(&["o51", ""], "(o/u)")),
            Classification::Total { line: Some("51".into()) }
        );
        assert_eq!(classify(&record(&["", "u51"], "(o/u)")), Classification::Total { line: None });
    }

    #[test]
    fn unmatched_labels_are_unknown() {
        assert_eq!(classify(&record(&["Lakers", "Celtics"], "% of Bets")), Classification::Unknown);
        assert_eq!(classify(&record(&["LAL"], "% of Bets")), Classification::Unknown);
        assert_eq!(classify(&record(&["LAL", "BOS"], "Handle")), Classification::Unknown);
    }

    #[test]
    fn classify_is_deterministic() {
        let inputs = [
            record(&["LAL", "BOS"], "% of Bets"),
            record(&["LAL -3.5", "BOS +3.5"], "% of Bets"),
            record(&["o220", "u220"], "(o/u)"),
            record(&["x", "y"], "?"),
        ];
        for r in &inputs {
            assert_eq!(classify(r), classify(r));
        }
    }

    #[test]
    fn totals_inherit_latest_identity() {
        let records = vec![
            record(&["LAL", "BOS"], "% of Bets"),
            record(&["LAL -3.5", "BOS +3.5"], "% of Bets"),
            record(&["o221.5", "u221.5"], "(o/u)"),
            record(&["DEN", "PHX"], "% of Bets"),
            record(&["o230", "u230"], "(o/u)"),
        ];
        let (classified, stats) = classify_stream(&records);
        assert_eq!(classified.len(), 5);
        assert_eq!(classified[2].category, BetCategory::Total);
        assert_eq!(classified[2].matchup_key, "LAL vs BOS");
        assert_eq!(classified[2].line.as_deref(), Some("221.5"));
        assert_eq!(classified[4].matchup_key, "DEN vs PHX");
        assert_eq!(stats.total, 2);
    }

    #[test]
    fn total_before_any_matchup_is_orphaned() {
        let records = vec![record(&["o8.5", "u8.5"], "(o/u)"), record(&["NYY", "BOS"], "% of Bets")];
        let (classified, stats) = classify_stream(&records);
        assert_eq!(classified.len(), 1);
        assert_eq!(stats.orphan_totals, 1);
    }

    #[test]
    fn unknown_does_not_move_tracker() {
        let mut tracker = MatchupTracker::new();
        let mut stats = ClassifyStats::default();
        tracker.observe(&record(&["LAL", "BOS"], "% of Bets"), &mut stats);
        assert!(tracker.observe(&record(&["Lakers", "Celtics"], "% of Bets"), &mut stats).is_none());
        assert_eq!(tracker.current(), Some(("LAL", "BOS")));
        assert_eq!(stats.unknown, 1);
    }
}
