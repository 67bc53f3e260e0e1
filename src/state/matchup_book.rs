use std::collections::HashMap;

use crate::detector::ClassifiedRecord;
use crate::types::{BetCategory, ConsolidatedMatchup};

// ---------------------------------------------------------------------------
// MatchupBook
// ---------------------------------------------------------------------------

/// Consolidated rows for one betting category, keyed by matchup.
///
/// The page lists a bets-percentage card and a money-percentage card per
/// matchup, so several records fold into one row. Rows keep first-seen order.
#[derive(Debug, Clone)]
pub struct MatchupBook {
    category: BetCategory,
    rows: Vec<ConsolidatedMatchup>,
    /// matchup_key → index into `rows`
    index: HashMap<String, usize>,
}

impl MatchupBook {
    pub fn new(category: BetCategory) -> Self {
        Self {
            category,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn category(&self) -> BetCategory {
        self.category
    }

    /// Fold one classified record in. Records of another category are ignored.
    ///
    /// Static fields (odds, time, sides) come from the first record seen for
    /// the matchup. A percentage pair or line carried by a later record
    /// replaces the stored one; absent ones leave it untouched.
    pub fn apply(&mut self, record: &ClassifiedRecord) {
        if record.category != self.category {
            return;
        }

        let idx = match self.index.get(&record.matchup_key) {
            Some(&idx) => idx,
            None => {
                self.rows.push(ConsolidatedMatchup {
                    matchup_key: record.matchup_key.clone(),
                    category: self.category,
                    side1: record.side1.clone(),
                    side2: record.side2.clone(),
                    line: None,
                    away_odds: record.best_odds.away.clone(),
                    home_odds: record.best_odds.home.clone(),
                    matchup_time: record.matchup_time,
                    bets: Default::default(),
                    money: Default::default(),
                });
                let idx = self.rows.len() - 1;
                self.index.insert(record.matchup_key.clone(), idx);
                idx
            }
        };

        let row = &mut self.rows[idx];
        if let Some(bets) = record.bets {
            row.bets = bets;
        }
        if let Some(money) = record.money {
            row.money = money;
        }
        if record.line.is_some() {
            row.line = record.line.clone();
        }
    }

    /// Fill single missing sides from their complements. Safe to run twice.
    pub fn impute(&mut self) {
        for row in &mut self.rows {
            row.bets.impute();
            row.money.impute();
        }
    }

    pub fn get(&self, matchup_key: &str) -> Option<&ConsolidatedMatchup> {
        self.index.get(matchup_key).map(|&i| &self.rows[i])
    }

    pub fn rows(&self) -> &[ConsolidatedMatchup] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Category buckets
// ---------------------------------------------------------------------------

/// The three independent per-category books built from one page.
#[derive(Debug, Clone)]
pub struct MatchupBooks {
    pub moneyline: MatchupBook,
    pub spread: MatchupBook,
    pub total: MatchupBook,
}

impl MatchupBooks {
    pub fn new() -> Self {
        Self {
            moneyline: MatchupBook::new(BetCategory::Moneyline),
            spread: MatchupBook::new(BetCategory::Spread),
            total: MatchupBook::new(BetCategory::Total),
        }
    }

    /// Fold an ordered record stream into the books, then impute each book.
    pub fn aggregate(records: &[ClassifiedRecord]) -> Self {
        let mut books = Self::new();
        for record in records {
            books.book_mut(record.category).apply(record);
        }
        books.moneyline.impute();
        books.spread.impute();
        books.total.impute();
        books
    }

    pub fn book_mut(&mut self, category: BetCategory) -> &mut MatchupBook {
        match category {
            BetCategory::Moneyline => &mut self.moneyline,
            BetCategory::Spread => &mut self.spread,
            BetCategory::Total => &mut self.total,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsolidatedMatchup> {
        self.moneyline
            .rows()
            .iter()
            .chain(self.spread.rows())
            .chain(self.total.rows())
    }

    pub fn len(&self) -> usize {
        self.moneyline.len() + self.spread.len() + self.total.len()
    }
}

impl Default for MatchupBooks {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
