//! Pure parsers for the primitive values found inside a matchup card.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

/// `width: 62.5%` as rendered on the percentage bar spans.
static WIDTH_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"width:\s*\+?([0-9]*\.?[0-9]+)\s*%").unwrap());

/// Read a percentage from a bar span: displayed text first, then the
/// `width: N%` inline style. Returns None when neither yields a number.
pub fn parse_percentage(text: &str, style: Option<&str>) -> Option<f64> {
    let cleaned = text.replace('%', "");
    let cleaned = cleaned.trim();
    if !cleaned.is_empty() && cleaned != "&nbsp;" {
        if let Some(v) = cleaned.parse::<f64>().ok().filter(|v| v.is_finite()) {
            return Some(v);
        }
    }
    style.and_then(parse_width_style)
}

pub fn parse_width_style(style: &str) -> Option<f64> {
    WIDTH_STYLE
        .captures(style)?
        .get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse the card's ISO-8601 kickoff instant and move it into `tz`.
/// Values without an offset are taken as UTC.
pub fn parse_kickoff(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(tz))
}
