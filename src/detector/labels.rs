//! Grammars for the free-text labels printed on consensus cards.
//!
//! | input            | grammar                                   | example            |
//! |------------------|-------------------------------------------|--------------------|
//! | team code        | `^[A-Z]{2,3}$`                            | `LAL`              |
//! | spread label     | `<CODE> <signed number>`                  | `LAL -3.5`         |
//! | signed number    | `[+-]?digits[.digits]`, first occurrence  | `+3.5`             |
//! | total label      | `(` … `)` containing `o` or `u`           | `(o/u)`            |
//! | total line       | `[(]o<number>[)]` or `[(]u<number>[)]`    | `(o47.5)` → `47.5` |

use std::sync::LazyLock;

use regex::Regex;

static TEAM_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}$").unwrap());
static LEADING_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}").unwrap());
static SIGNED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)").unwrap());
static TOTAL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?[ou]\s*([0-9]+(?:\.[0-9]+)?)\)?").unwrap());

/// Bare 2–3 letter uppercase team code, e.g. `BOS`.
pub fn is_team_code(label: &str) -> bool {
    TEAM_CODE.is_match(label)
}

/// Leading team code of a spread label: `LAL -3.5` → `LAL`.
pub fn leading_team_code(label: &str) -> Option<&str> {
    LEADING_CODE.find(label).map(|m| m.as_str())
}

/// Team identity for a spread label; the raw label when no code leads it.
pub fn spread_team(label: &str) -> &str {
    leading_team_code(label).unwrap_or(label)
}

pub fn has_sign(label: &str) -> bool {
    label.contains('+') || label.contains('-')
}

/// First signed number in a label: `BOS +3.5` → `+3.5`.
pub fn signed_number(label: &str) -> Option<&str> {
    SIGNED_NUMBER.find(label).map(|m| m.as_str())
}

/// Two-sided spread line, present only when both labels carry a number.
pub fn spread_line(label1: &str, label2: &str) -> Option<String> {
    Some(format!("{} / {}", signed_number(label1)?, signed_number(label2)?))
}

/// Header of the bets row on over/under cards.
pub fn is_total_label(label: &str) -> bool {
    label.contains('(') && label.contains(')') && (label.contains('o') || label.contains('u'))
}

/// Number following `o`/`u`: `(o47.5)` → `47.5`.
pub fn total_line(label: &str) -> Option<&str> {
    TOTAL_LINE
        .captures(label)?
        .get(1)
        .map(|m| m.as_str())
}
