pub mod matchup_book;
pub mod session;

pub use matchup_book::{MatchupBook, MatchupBooks};
pub use session::{Session, SessionStatus};
