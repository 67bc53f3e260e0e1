//! Consensus-picks sharp-money scanner.
//!
//! Fetches a sport's consensus page, extracts bets%/money% splits per matchup
//! card, consolidates them by betting category and scores each side for
//! sharp-money divergence. The `scanner` binary serves the result over HTTP,
//! the `tui` binary renders it in the terminal.

pub mod api;
pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod pipeline;
pub mod scorer;
pub mod state;
pub mod types;
