use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::types::{ConfidenceScheme, Sport};

pub const BASE_URL: &str = "https://www.scoresandodds.com";

/// Body marker the site renders when a sport has no slate for the day.
pub const NO_GAMES_SENTINEL: &str = "There are no games scheduled today.";

/// Browser-like headers; the site rejects bare clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/555.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/555.36";
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image:*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Literal label of the bets-percentage row on moneyline and spread cards.
pub const BETS_ROW_LABEL: &str = "% of Bets";

pub const DEFAULT_TARGET_TZ: Tz = chrono_tz::America::Los_Angeles;

/// Allowed range for the dashboard time window (hours).
pub const MIN_WINDOW_HOURS: u32 = 1;
pub const MAX_WINDOW_HOURS: u32 = 168;

/// Baseline handle scaling (nominal dollars → model units).
pub const HANDLE_SCALE: f64 = 0.000_001;

/// Row filters and label thresholds for the signal engine.
pub mod signal_thresholds {
    /// Rows with |money% - bets%| at or below this are dropped before scoring.
    pub const MIN_ABS_DIFF: f64 = 1.0;
    /// Rows with |relative differential| below this are dropped after scoring.
    pub const MIN_ABS_RELATIVE_DIFF: f64 = 1.0;

    pub const SHARP_DIFF: f64 = 15.0;
    pub const NO_SIGNAL_DIFF: f64 = 10.0;

    pub const W_RELATIVE_DIFF: f64 = 0.45;
    pub const W_ACTUAL_DIFF: f64 = 0.35;
    pub const W_WEIGHTED_SIGNAL: f64 = 0.15;
    pub const W_DISAGREEMENT: f64 = 0.05;
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub log_level: String,
    pub api_port: u16,
    /// Sport loaded on first view (DEFAULT_SPORT)
    pub default_sport: Sport,
    /// Dashboard look-ahead in hours, 1–168 (TIME_WINDOW_HOURS)
    pub time_window_hours: u32,
    /// Banding used for the confidence label (CONFIDENCE_SCHEME: eight_band | five_band)
    pub confidence_scheme: ConfidenceScheme,
    /// Zone all matchup times are normalized into (TARGET_TZ, IANA name)
    pub target_tz: Tz,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let default_sport = std::env::var("DEFAULT_SPORT")
            .unwrap_or_else(|_| "NBA".to_string())
            .parse::<Sport>()?;

        let time_window_hours = std::env::var("TIME_WINDOW_HOURS")
            .unwrap_or_else(|_| MIN_WINDOW_HOURS.to_string())
            .parse::<u32>()
            .map_err(|_| AppError::Config("TIME_WINDOW_HOURS must be an integer".to_string()))
            .and_then(validate_window_hours)?;

        let confidence_scheme = std::env::var("CONFIDENCE_SCHEME")
            .unwrap_or_default()
            .parse::<ConfidenceScheme>()?;

        let target_tz = match std::env::var("TARGET_TZ") {
            Ok(name) => name
                .parse::<Tz>()
                .map_err(|_| AppError::Config(format!("TARGET_TZ '{name}' is not an IANA zone")))?,
            Err(_) => DEFAULT_TARGET_TZ,
        };

        Ok(Self {
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| BASE_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            default_sport,
            time_window_hours,
            confidence_scheme,
            target_tz,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .unwrap_or(30),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            log_level: "info".to_string(),
            api_port: 3000,
            default_sport: Sport::Nba,
            time_window_hours: MIN_WINDOW_HOURS,
            confidence_scheme: ConfidenceScheme::default(),
            target_tz: DEFAULT_TARGET_TZ,
            http_timeout_secs: 30,
        }
    }
}

pub fn validate_window_hours(hours: u32) -> Result<u32> {
    if (MIN_WINDOW_HOURS..=MAX_WINDOW_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(AppError::Config(format!(
            "time window must be {MIN_WINDOW_HOURS}-{MAX_WINDOW_HOURS} hours, got {hours}"
        )))
    }
}
