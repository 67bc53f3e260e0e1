use crate::config::signal_thresholds::{NO_SIGNAL_DIFF, SHARP_DIFF};
use crate::types::{ConfidenceLabel, ConfidenceScheme, DecisionLabel};

/// Label a side by how far money% runs ahead of (or behind) bets%.
pub fn decision_label(actual_diff_pct: f64) -> DecisionLabel {
    if actual_diff_pct >= SHARP_DIFF {
        DecisionLabel::SharpMoneyPlay
    } else if actual_diff_pct <= -SHARP_DIFF {
        DecisionLabel::PublicTrap
    } else if actual_diff_pct > -NO_SIGNAL_DIFF && actual_diff_pct < NO_SIGNAL_DIFF {
        DecisionLabel::NoSignal
    } else {
        DecisionLabel::Neutral
    }
}

pub fn confidence_label(score: f64, scheme: ConfidenceScheme) -> ConfidenceLabel {
    match scheme {
        ConfidenceScheme::EightBand => eight_band(score),
        ConfidenceScheme::FiveBand => five_band(score),
    }
}

fn eight_band(score: f64) -> ConfidenceLabel {
    if score > 20.0 {
        ConfidenceLabel::VerifiedSharp
    } else if score >= 10.0 {
        ConfidenceLabel::StrongSharp
    } else if score >= 5.0 {
        ConfidenceLabel::LeanSharp
    } else if score > 0.0 {
        ConfidenceLabel::SlightSharp
    } else if score == 0.0 {
        ConfidenceLabel::Neutral
    } else if score >= -5.0 {
        ConfidenceLabel::SlightPublic
    } else if score >= -10.0 {
        ConfidenceLabel::PublicLean
    } else if score < -10.0 {
        ConfidenceLabel::PublicTrap
    } else {
        // NaN
        ConfidenceLabel::Unbanded
    }
}

fn five_band(score: f64) -> ConfidenceLabel {
    if (10.0..=20.0).contains(&score) {
        ConfidenceLabel::VerifiedSharp
    } else if (5.0..10.0).contains(&score) {
        ConfidenceLabel::LeanSharp
    } else if score > -5.0 && score < 5.0 {
        ConfidenceLabel::Neutral
    } else if (-10.0..=-5.0).contains(&score) {
        ConfidenceLabel::PublicLean
    } else if score < -10.0 {
        ConfidenceLabel::PublicTrap
    } else {
        ConfidenceLabel::Unbanded
    }
}
