pub mod card;
pub mod fields;

pub use card::{CardExtractor, CardOutcome, ExtractStats};
