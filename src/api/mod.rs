pub mod health;
pub mod routes;

pub use health::HealthReport;
pub use routes::{router, ApiState};
