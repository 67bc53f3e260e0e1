pub mod labels;
pub mod signal_engine;
pub mod table;

pub use signal_engine::SignalEngine;
pub use table::{SignalTable, TimeWindow, View};
