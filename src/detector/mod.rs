pub mod classifier;
pub mod labels;

pub use classifier::{classify, classify_stream, Classification, ClassifiedRecord, ClassifyStats, MatchupTracker};
