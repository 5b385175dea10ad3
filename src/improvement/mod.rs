//! Improvement and distraction log

mod models;
mod storage;

pub use models::*;
pub use storage::ImprovementStorage;
