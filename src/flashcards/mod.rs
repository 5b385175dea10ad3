//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - Deck management (private or public collections)
//! - Flashcard CRUD
//! - Spaced repetition scheduling on review

pub mod algorithm;
mod models;
mod storage;

pub use models::*;
pub use storage::{FlashcardStorage, FlashcardStorageError};
