//! Learning materials: notes, articles, tutorials and references

mod models;
mod storage;

pub use models::*;
pub use storage::LearningStorage;
