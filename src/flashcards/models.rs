//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::DEFAULT_EASE_FACTOR;
use crate::store::Record;

/// A named collection of flashcards owned by one account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Public decks and their cards are readable by every account
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub card_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Deck {
    const COLLECTION: &'static str = "flashcard_decks";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Deck {
    pub fn new(user_id: Uuid, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description: None,
            category: None,
            tags: Vec::new(),
            is_public: false,
            card_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Author's difficulty label for a card. Not used by scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Spaced repetition state carried by every card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingState {
    /// Never below 1.3
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Never below 1
    #[serde(default = "default_interval_days")]
    pub interval_days: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// `None` means due now
    #[serde(default)]
    pub next_review: Option<DateTime<Utc>>,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

fn default_interval_days() -> u32 {
    1
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            ease_factor: default_ease_factor(),
            interval_days: default_interval_days(),
            review_count: 0,
            correct_count: 0,
            last_reviewed: None,
            next_review: None,
        }
    }
}

impl SchedulingState {
    /// Check if the card is due for review
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |next| next <= now)
    }
}

/// A flashcard with question (front) and answer (back)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub user_id: Uuid,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(flatten)]
    pub schedule: SchedulingState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Flashcard {
    const COLLECTION: &'static str = "flashcards";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Flashcard {
    pub fn new(deck_id: Uuid, user_id: Uuid, front: String, back: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            deck_id,
            user_id,
            front,
            back,
            hint: None,
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            schedule: SchedulingState::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDeckRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckQuery {
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardRequest {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCardRequest {
    pub front: Option<String>,
    pub back: Option<String>,
    pub hint: Option<String>,
    pub tags: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardQuery {
    #[serde(default)]
    pub due_only: bool,
}

/// Body of a review submission
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// Recall quality, 1 (forgot) to 5 (effortless)
    pub difficulty: i32,
}
