use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::extractor::fields::{parse_kickoff, parse_percentage};
use crate::types::{BestOdds, PercentPair, RawMarkupRecord};

/// Per-page extraction counters, logged after each cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractStats {
    pub cards_seen: usize,
    pub rejected_no_chart: usize,
    pub rejected_no_teams: usize,
    pub extracted: usize,
}

struct Selectors {
    card: Selector,
    chart: Selector,
    best_odds: Selector,
    localtime: Selector,
    sides: Selector,
    sides_center: Selector,
    strong: Selector,
    span: Selector,
    percentage: Selector,
    odds_container: Selector,
    odds_best: Selector,
    odds_moneyline: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            card: parse_selector("div.trend-card")?,
            chart: parse_selector("span.trend-graph-chart")?,
            best_odds: parse_selector("span.best-odds")?,
            localtime: parse_selector(r#"span[data-role="localtime"]"#)?,
            sides: parse_selector("span.trend-graph-sides")?,
            sides_center: parse_selector("span.trend-graph-sides.center")?,
            strong: parse_selector("strong")?,
            span: parse_selector("span")?,
            percentage: parse_selector("span.trend-graph-percentage")?,
            odds_container: parse_selector("div.best-odds-container")?,
            odds_best: parse_selector("small.data-odds.best")?,
            odds_moneyline: parse_selector("span.data-moneyline")?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Selector(format!("{css}: {e:?}")))
}

/// Walks `trend-card` elements and pulls out raw, category-agnostic fields.
pub struct CardExtractor {
    selectors: Selectors,
    tz: Tz,
}

impl CardExtractor {
    pub fn new(tz: Tz) -> Result<Self> {
        Ok(Self {
            selectors: Selectors::new()?,
            tz,
        })
    }

    /// Extract every usable card from a full consensus page, in document order.
    pub fn extract_page(&self, html: &str) -> (Vec<RawMarkupRecord>, ExtractStats) {
        let document = Html::parse_document(html);
        let mut stats = ExtractStats::default();
        let mut records = Vec::new();

        for card in document.select(&self.selectors.card) {
            stats.cards_seen += 1;
            match self.extract_card(card) {
                CardOutcome::Record(record) => {
                    stats.extracted += 1;
                    records.push(record);
                }
                CardOutcome::NoChart => stats.rejected_no_chart += 1,
                CardOutcome::NoTeams => stats.rejected_no_teams += 1,
            }
        }

        debug!(
            cards = stats.cards_seen,
            extracted = stats.extracted,
            "[EXTRACT] page walked"
        );
        (records, stats)
    }

    /// Extract a single card. Zero or one record comes out of each card.
    pub fn extract_card(&self, card: ElementRef<'_>) -> CardOutcome {
        let s = &self.selectors;
        let Some(chart) = card.select(&s.chart).next() else {
            return CardOutcome::NoChart;
        };

        let (teams, bets_label) = match chart.select(&s.sides).next() {
            Some(sides) => {
                // Empty labels stay in place so teams[0] / teams[1] remain side 1 / side 2.
                let teams: Vec<String> = sides
                    .select(&s.strong)
                    .map(|t| text_of(t).replace('\n', ""))
                    .collect();
                let label = sides.select(&s.span).next().map(text_of);
                (teams, label)
            }
            None => (Vec::new(), None),
        };

        if teams.iter().all(|t| t.is_empty()) {
            return CardOutcome::NoTeams;
        }

        let money_label = chart
            .select(&s.sides_center)
            .next()
            .and_then(|center| center.select(&s.span).next())
            .map(text_of);

        let mut bars = chart.select(&s.percentage);
        let bets = bars.next().and_then(|bar| self.percent_pair(bar));
        let money = bars.next().and_then(|bar| self.percent_pair(bar));

        let best_odds = card
            .select(&s.best_odds)
            .next()
            .map(|odds| self.best_odds(odds))
            .unwrap_or_default();

        let matchup_time = card
            .select(&s.localtime)
            .next()
            .and_then(|el| el.value().attr("data-value"))
            .and_then(|raw| parse_kickoff(raw, &self.tz));

        CardOutcome::Record(RawMarkupRecord {
            teams,
            bets_label,
            money_label,
            bets,
            money,
            best_odds,
            matchup_time,
        })
    }

    /// First two spans of a percentage bar. Missing spans mean no pair at all;
    /// unreadable spans become absent sides.
    fn percent_pair(&self, bar: ElementRef<'_>) -> Option<PercentPair> {
        let mut spans = bar.select(&self.selectors.span);
        let first = spans.next()?;
        let second = spans.next()?;
        Some(PercentPair::new(read_percentage(first), read_percentage(second)))
    }

    /// Away/home sub-sections are matched by label text since their order varies.
    fn best_odds(&self, odds: ElementRef<'_>) -> BestOdds {
        let s = &self.selectors;
        let mut out = BestOdds::default();

        for container in odds.select(&s.odds_container) {
            let label = container.select(&s.span).next().map(text_of).unwrap_or_default();
            let slot = if label.contains("Best away Odds") {
                &mut out.away
            } else if label.contains("Best home Odds") {
                &mut out.home
            } else {
                continue;
            };

            *slot = container
                .select(&s.odds_best)
                .next()
                .or_else(|| container.select(&s.odds_moneyline).next())
                .map(text_of)
                .filter(|t| !t.is_empty());
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardOutcome {
    Record(RawMarkupRecord),
    NoChart,
    NoTeams,
}

fn read_percentage(el: ElementRef<'_>) -> Option<f64> {
    parse_percentage(&text_of(el), el.value().attr("style"))
}

/// Concatenated, per-node trimmed text content.
fn text_of(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const MONEYLINE_CARD: &str = r#"
        <div class="trend-card">
          <span class="trend-graph-chart">
            <span class="trend-graph-sides">
              <strong>LAL</strong><span>% of Bets</span><strong>BOS</strong>
            </span>
            <span class="trend-graph-percentage">
              <span class="percentage-a">60%</span><span class="percentage-b" style="width: 40%">&nbsp;</span>
            </span>
            <span class="trend-graph-sides center"><span>% of Money</span></span>
            <span class="trend-graph-percentage">
              <span>45%</span><span></span>
            </span>
          </span>
          <span class="best-odds">
            <div class="best-odds-container"><span>Best home Odds</span><span class="data-moneyline">-150</span></div>
            <div class="best-odds-container"><span>Best away Odds</span><small class="data-odds best">+135</small><span class="data-moneyline">+120</span></div>
          </span>
          <span data-role="localtime" data-value="2025-03-02T03:10:00Z">7:10 PM</span>
        </div>
    "#;

    fn extractor() -> CardExtractor {
        CardExtractor::new(chrono_tz::America::Los_Angeles).unwrap()
    }

    fn only_record(html: &str) -> RawMarkupRecord {
        let (mut records, stats) = extractor().extract_page(html);
        assert_eq!(stats.extracted, 1, "stats={stats:?}");
        records.remove(0)
    }

    #[test]
    fn extracts_moneyline_card() {
        let rec = only_record(MONEYLINE_CARD);
        assert_eq!(rec.teams, vec!["LAL", "BOS"]);
        assert_eq!(rec.bets_label.as_deref(), Some("% of Bets"));
        assert_eq!(rec.money_label.as_deref(), Some("% of Money"));
        assert_eq!(rec.bets, Some(PercentPair::new(Some(60.0), Some(40.0))));
        assert_eq!(rec.money, Some(PercentPair::new(Some(45.0), None)));
    }

    #[test]
    fn best_odds_matched_by_label_not_position() {
        let rec = only_record(MONEYLINE_CARD);
        // away prefers the highlighted "best" value over the moneyline span
        assert_eq!(rec.best_odds.away.as_deref(), Some("+135"));
        assert_eq!(rec.best_odds.home.as_deref(), Some("-150"));
    }

    #[test]
    fn localtime_is_zoned() {
        let rec = only_record(MONEYLINE_CARD);
        let t = rec.matchup_time.unwrap();
        assert_eq!((t.month(), t.day(), t.hour(), t.minute()), (3, 1, 19, 10));
    }

    #[test]
    fn bad_timestamp_keeps_record() {
        let html = MONEYLINE_CARD.replace("2025-03-02T03:10:00Z", "TBD");
        let rec = only_record(&html);
        assert!(rec.matchup_time.is_none());
        assert_eq!(rec.teams.len(), 2);
    }

    #[test]
    fn card_without_chart_is_skipped() {
        let html = r#"<div class="trend-card"><span class="best-odds"></span></div>"#;
        let (records, stats) = extractor().extract_page(html);
        assert!(records.is_empty());
        assert_eq!(stats.rejected_no_chart, 1);
    }

    #[test]
    fn card_without_teams_is_dropped() {
        let html = r#"
            <div class="trend-card"><span class="trend-graph-chart">
              <span class="trend-graph-sides"><span>% of Bets</span></span>
              <span class="trend-graph-percentage"><span>50%</span><span>50%</span></span>
            </span></div>"#;
        let (records, stats) = extractor().extract_page(html);
        assert!(records.is_empty());
        assert_eq!(stats.rejected_no_teams, 1);
    }

    #[test]
    fn empty_side_label_keeps_its_position() {
        let html = r#"
            <div class="trend-card"><span class="trend-graph-chart">
              <span class="trend-graph-sides"><strong></strong><span>(o/u)</span><strong>u47.5</strong></span>
              <span class="trend-graph-percentage"><span>55%</span><span>45%</span></span>
            </span></div>"#;
        let rec = only_record(html);
        assert_eq!(rec.teams, vec!["", "u47.5"]);
    }

    #[test]
    fn all_empty_side_labels_drop_the_card() {
        let html = r#"
            <div class="trend-card"><span class="trend-graph-chart">
              <span class="trend-graph-sides"><strong> </strong><span>% of Bets</span><strong></strong></span>
              <span class="trend-graph-percentage"><span>50%</span><span>50%</span></span>
            </span></div>"#;
        let (records, stats) = extractor().extract_page(html);
        assert!(records.is_empty());
        assert_eq!(stats.rejected_no_teams, 1);
    }

    #[test]
    fn single_span_bar_is_no_pair() {
        let html = r#"
            <div class="trend-card"><span class="trend-graph-chart">
              <span class="trend-graph-sides"><strong>o221.5</strong><span>(o/u)</span><strong>u221.5</strong></span>
              <span class="trend-graph-percentage"><span>50%</span></span>
            </span></div>"#;
        let rec = only_record(html);
        assert!(rec.bets.is_none());
        assert!(rec.money.is_none());
        assert_eq!(rec.best_odds, BestOdds::default());
    }
}
