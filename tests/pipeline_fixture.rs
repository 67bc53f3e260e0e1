use sharp_scanner::pipeline::Pipeline;
use sharp_scanner::scorer::table::{cell, UNPARSED_TIME_WARNING};
use sharp_scanner::scorer::View;
use sharp_scanner::types::{BetCategory, Column, ConfidenceScheme, DecisionLabel, Sport};

const NFL_PAGE: &str = include_str!("fixtures/nfl_consensus.html");

fn pipeline(scheme: ConfidenceScheme) -> Pipeline {
    Pipeline::new(chrono_tz::America::Los_Angeles, scheme).unwrap()
}

#[test]
fn full_page_extraction_counts() {
    let (_, stats) = pipeline(ConfidenceScheme::EightBand).process(NFL_PAGE, Sport::Nfl);

    assert!(!stats.no_games);
    assert_eq!(stats.extract.cards_seen, 7);
    assert_eq!(stats.extract.rejected_no_chart, 1);
    assert_eq!(stats.extract.extracted, 6);

    assert_eq!(stats.classify.moneyline, 2);
    assert_eq!(stats.classify.spread, 1);
    assert_eq!(stats.classify.total, 1);
    assert_eq!(stats.classify.unknown, 1);
    assert_eq!(stats.classify.orphan_totals, 1);

    assert_eq!(stats.consolidated, 4);
    assert_eq!(stats.rows, 8);
}

#[test]
fn rows_sorted_by_kickoff_then_relative_differential() {
    let (table, _) = pipeline(ConfidenceScheme::EightBand).process(NFL_PAGE, Sport::Nfl);

    let order: Vec<(&str, BetCategory)> = table
        .rows()
        .iter()
        .map(|r| (r.team.as_str(), r.category))
        .collect();
    assert_eq!(
        order,
        vec![
            ("BUF", BetCategory::Spread),
            ("BUF", BetCategory::Moneyline),
            ("Under 47.5", BetCategory::Total),
            ("KC", BetCategory::Moneyline),
            ("KC", BetCategory::Spread),
            ("Over 47.5", BetCategory::Total),
            ("NYJ", BetCategory::Moneyline),
            ("MIA", BetCategory::Moneyline),
        ]
    );

    // one untimed matchup puts the notice on the table
    assert_eq!(table.warning(), Some(UNPARSED_TIME_WARNING));
    assert!(table.rows()[6].matchup_time.is_none());
}

#[test]
fn spread_rows_carry_two_sided_line() {
    let (table, _) = pipeline(ConfidenceScheme::EightBand).process(NFL_PAGE, Sport::Nfl);

    let spreads = table.view(View::Category(BetCategory::Spread), None);
    assert_eq!(spreads.len(), 2);
    for row in &spreads {
        assert_eq!(row.matchup, "KC vs BUF");
        assert_eq!(cell(row, Column::SpreadLine).as_deref(), Some("-3.5 / +3.5"));
        assert_eq!(cell(row, Column::MatchupTime).as_deref(), Some("09/07 05:20pm"));
    }

    let buf = spreads.iter().find(|r| r.team == "BUF").unwrap();
    assert_eq!(buf.money_pct, 60.0);
    assert_eq!(buf.actual_diff_pct, 25.0);
    assert_eq!(buf.decision_label, DecisionLabel::SharpMoneyPlay);

    let moneyline = table.view(View::Category(BetCategory::Moneyline), None);
    assert!(moneyline.iter().all(|r| cell(r, Column::SpreadLine).is_none()));
    let kc = moneyline.iter().find(|r| r.team == "KC").unwrap();
    assert_eq!(kc.away_odds.as_deref(), Some("+105"));
    assert_eq!(kc.home_odds.as_deref(), Some("-125"));
    assert_eq!(kc.decision_label, DecisionLabel::PublicTrap);
}

#[test]
fn missing_money_side_is_imputed() {
    let (table, _) = pipeline(ConfidenceScheme::EightBand).process(NFL_PAGE, Sport::Nfl);
    let mia = table.rows().iter().find(|r| r.team == "MIA").unwrap();
    assert_eq!(mia.money_pct, 42.0);
    assert_eq!(mia.actual_diff_pct, -18.0);
    assert!((mia.relative_differential + 10.8).abs() < 1e-9);
}

#[test]
fn totals_read_line_from_side_labels() {
    let (table, _) = pipeline(ConfidenceScheme::FiveBand).process(NFL_PAGE, Sport::Nfl);
    let totals = table.view(View::Category(BetCategory::Total), None);
    assert_eq!(totals.len(), 2);
    assert!(totals.iter().all(|r| r.matchup == "KC vs BUF"));
    assert!(totals.iter().all(|r| r.line.as_deref() == Some("47.5")));
}

#[test]
fn no_games_page_short_circuits() {
    let html = NFL_PAGE.replace("<main class=\"consensus\">", "<main><p>There are no games scheduled today.</p>");
    let (table, stats) = pipeline(ConfidenceScheme::EightBand).process(&html, Sport::Nfl);
    assert!(stats.no_games);
    assert!(table.is_empty());
    assert_eq!(table.sport(), Sport::Nfl);
}
