//! Storage operations for flashcards
//!
//! Decks live in the `flashcard_decks` collection and cards in
//! `flashcards`. A card's scheduling state is stored inline with it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::algorithm::{schedule, InvalidDifficulty, ReviewOutcome};
use super::models::*;
use crate::store::{Collection, DocumentStore, Filter, StorageError};

#[derive(Error, Debug)]
pub enum FlashcardStorageError {
    #[error(transparent)]
    Store(#[from] StorageError),

    #[error("Deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error(transparent)]
    InvalidDifficulty(#[from] InvalidDifficulty),
}

pub type Result<T> = std::result::Result<T, FlashcardStorageError>;

/// Storage manager for flashcard operations
#[derive(Clone)]
pub struct FlashcardStorage {
    decks: Collection<Deck>,
    cards: Collection<Flashcard>,
}

impl FlashcardStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            decks: Collection::new(Arc::clone(&store)),
            cards: Collection::new(store),
        }
    }

    /// Decks an account may read: its own plus public ones
    fn visible_to(user_id: Uuid) -> Filter {
        Filter::new().any_of(vec![
            Filter::new().eq("user_id", user_id),
            Filter::new().eq("is_public", true),
        ])
    }

    // ==================== Deck Operations ====================

    pub async fn create_deck(&self, user_id: Uuid, request: CreateDeckRequest) -> Result<Deck> {
        let mut deck = Deck::new(user_id, request.name);
        deck.description = request.description;
        deck.category = request.category;
        deck.tags = request.tags;
        deck.is_public = request.is_public;
        self.decks.insert(&deck).await?;
        Ok(deck)
    }

    /// Own and public decks, newest first
    pub async fn list_decks(&self, user_id: Uuid, query: &DeckQuery) -> Result<Vec<Deck>> {
        let filter = Self::visible_to(user_id)
            .eq_opt("category", query.category.as_deref())
            .eq_opt("is_public", query.is_public);
        let mut decks = self.decks.find(&filter).await?;
        decks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(decks)
    }

    /// Get a deck the account owns or that is public
    pub async fn get_deck(&self, user_id: Uuid, deck_id: Uuid) -> Result<Deck> {
        self.decks
            .find_one(&Self::visible_to(user_id).eq("id", deck_id))
            .await?
            .ok_or(FlashcardStorageError::DeckNotFound(deck_id))
    }

    /// Get a deck only if the account owns it
    async fn owned_deck(&self, user_id: Uuid, deck_id: Uuid) -> Result<Deck> {
        self.decks
            .find_one(&Filter::new().eq("id", deck_id).eq("user_id", user_id))
            .await?
            .ok_or(FlashcardStorageError::DeckNotFound(deck_id))
    }

    pub async fn update_deck(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        request: UpdateDeckRequest,
    ) -> Result<Deck> {
        let mut deck = self.owned_deck(user_id, deck_id).await?;
        if let Some(name) = request.name {
            deck.name = name;
        }
        if let Some(description) = request.description {
            deck.description = Some(description);
        }
        if let Some(category) = request.category {
            deck.category = Some(category);
        }
        if let Some(tags) = request.tags {
            deck.tags = tags;
        }
        if let Some(is_public) = request.is_public {
            deck.is_public = is_public;
        }
        deck.updated_at = Utc::now();
        self.decks.replace(&deck).await?;
        Ok(deck)
    }

    /// Delete a deck and all its cards
    pub async fn delete_deck(&self, user_id: Uuid, deck_id: Uuid) -> Result<()> {
        let deck = self.owned_deck(user_id, deck_id).await?;
        let removed = self.cards.delete(&Filter::new().eq("deck_id", deck.id)).await?;
        self.decks.delete_by_id(deck.id).await?;
        log::info!("Deleted deck {} with {} cards", deck.id, removed);
        Ok(())
    }

    /// Adjust the stored card count of a deck
    async fn adjust_card_count(&self, deck_id: Uuid, added: bool) -> Result<()> {
        let Some(mut deck) = self.decks.get(deck_id).await? else {
            return Ok(());
        };
        deck.card_count = if added {
            deck.card_count + 1
        } else {
            deck.card_count.saturating_sub(1)
        };
        deck.updated_at = Utc::now();
        self.decks.replace(&deck).await?;
        Ok(())
    }

    // ==================== Card Operations ====================

    /// Add a card to a deck the account owns
    pub async fn create_card(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        request: CreateCardRequest,
    ) -> Result<Flashcard> {
        let deck = self.owned_deck(user_id, deck_id).await?;

        let mut card = Flashcard::new(deck.id, user_id, request.front, request.back);
        card.hint = request.hint;
        card.tags = request.tags;
        card.difficulty = request.difficulty;
        self.cards.insert(&card).await?;

        self.adjust_card_count(deck.id, true).await?;
        Ok(card)
    }

    /// Cards of a readable deck, optionally only those due at `now`
    pub async fn list_cards(
        &self,
        user_id: Uuid,
        deck_id: Uuid,
        due_only: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<Flashcard>> {
        let deck = self.get_deck(user_id, deck_id).await?;
        let cards = self.cards.find(&Filter::new().eq("deck_id", deck.id)).await?;
        Ok(cards
            .into_iter()
            .filter(|c| !due_only || c.schedule.is_due(now))
            .collect())
    }

    /// Get a card the account owns
    pub async fn get_card(&self, user_id: Uuid, card_id: Uuid) -> Result<Flashcard> {
        self.cards
            .find_one(&Filter::new().eq("id", card_id).eq("user_id", user_id))
            .await?
            .ok_or(FlashcardStorageError::CardNotFound(card_id))
    }

    pub async fn update_card(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        request: UpdateCardRequest,
    ) -> Result<Flashcard> {
        let mut card = self.get_card(user_id, card_id).await?;
        if let Some(front) = request.front {
            card.front = front;
        }
        if let Some(back) = request.back {
            card.back = back;
        }
        if let Some(hint) = request.hint {
            card.hint = Some(hint);
        }
        if let Some(tags) = request.tags {
            card.tags = tags;
        }
        if let Some(difficulty) = request.difficulty {
            card.difficulty = difficulty;
        }
        card.updated_at = Utc::now();
        self.cards.replace(&card).await?;
        Ok(card)
    }

    pub async fn delete_card(&self, user_id: Uuid, card_id: Uuid) -> Result<()> {
        let card = self.get_card(user_id, card_id).await?;
        self.cards.delete_by_id(card.id).await?;
        self.adjust_card_count(card.deck_id, false).await?;
        Ok(())
    }

    // ==================== Review Operations ====================

    /// Submit a review for a card the account owns
    ///
    /// Load, schedule and save are separate store calls, so two reviews of
    /// the same card racing each other resolve as last write wins.
    pub async fn review_card(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        difficulty: i32,
        now: DateTime<Utc>,
    ) -> Result<Flashcard> {
        let outcome = ReviewOutcome::new(difficulty)?;
        let mut card = self.get_card(user_id, card_id).await?;

        let result = schedule(&card.schedule, outcome, now);
        card.schedule = result.state;
        card.updated_at = now;
        self.cards.replace(&card).await?;

        log::debug!(
            "Reviewed card {}: difficulty {}, next in {} days",
            card.id,
            outcome.difficulty(),
            card.schedule.interval_days
        );
        Ok(card)
    }

    pub async fn count_cards(&self) -> Result<usize> {
        Ok(self.cards.count(&Filter::new()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;

    fn create_test_storage() -> FlashcardStorage {
        FlashcardStorage::new(Arc::new(MemoryStore::new()))
    }

    fn deck_request(name: &str, is_public: bool) -> CreateDeckRequest {
        CreateDeckRequest {
            name: name.to_string(),
            description: None,
            category: Some("languages".to_string()),
            tags: vec![],
            is_public,
        }
    }

    fn card_request(front: &str) -> CreateCardRequest {
        CreateCardRequest {
            front: front.to_string(),
            back: "answer".to_string(),
            hint: None,
            tags: vec![],
            difficulty: Difficulty::Medium,
        }
    }

    #[tokio::test]
    async fn test_card_defaults_and_count() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let deck = storage.create_deck(user, deck_request("German", false)).await.unwrap();

        let card = storage
            .create_card(user, deck.id, card_request("Hund"))
            .await
            .unwrap();
        storage
            .create_card(user, deck.id, card_request("Katze"))
            .await
            .unwrap();

        assert_eq!(card.schedule, SchedulingState::default());
        assert_eq!(card.schedule.ease_factor, 2.5);
        assert_eq!(card.schedule.interval_days, 1);
        assert_eq!(storage.get_deck(user, deck.id).await.unwrap().card_count, 2);

        storage.delete_card(user, card.id).await.unwrap();
        assert_eq!(storage.get_deck(user, deck.id).await.unwrap().card_count, 1);
    }

    #[tokio::test]
    async fn test_deck_visibility() {
        let storage = create_test_storage();
        let owner = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let private = storage.create_deck(owner, deck_request("Private", false)).await.unwrap();
        let public = storage.create_deck(owner, deck_request("Shared", true)).await.unwrap();
        storage
            .create_card(owner, public.id, card_request("Q"))
            .await
            .unwrap();

        let visible = storage.list_decks(reader, &DeckQuery::default()).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, public.id);

        assert!(matches!(
            storage.get_deck(reader, private.id).await,
            Err(FlashcardStorageError::DeckNotFound(_))
        ));
        let cards = storage
            .list_cards(reader, public.id, false, Utc::now())
            .await
            .unwrap();
        assert_eq!(cards.len(), 1);

        // Readers of a public deck still cannot change it
        assert!(storage
            .update_deck(reader, public.id, UpdateDeckRequest::default())
            .await
            .is_err());
        assert!(storage
            .create_card(reader, public.id, card_request("nope"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_review_updates_schedule() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let deck = storage.create_deck(user, deck_request("Math", false)).await.unwrap();
        let card = storage
            .create_card(user, deck.id, card_request("2+2"))
            .await
            .unwrap();

        let now = Utc::now();
        let reviewed = storage.review_card(user, card.id, 5, now).await.unwrap();
        assert_eq!(reviewed.schedule.review_count, 1);
        assert_eq!(reviewed.schedule.correct_count, 1);
        assert_eq!(reviewed.schedule.interval_days, 2);
        assert_eq!(reviewed.schedule.next_review, Some(now + Duration::days(2)));

        let stored = storage.get_card(user, card.id).await.unwrap();
        assert_eq!(stored.schedule.interval_days, 2);
    }

    #[tokio::test]
    async fn test_review_rejects_bad_difficulty_and_strangers() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let deck = storage.create_deck(user, deck_request("Math", true)).await.unwrap();
        let card = storage
            .create_card(user, deck.id, card_request("2+2"))
            .await
            .unwrap();

        assert!(matches!(
            storage.review_card(user, card.id, 0, Utc::now()).await,
            Err(FlashcardStorageError::InvalidDifficulty(_))
        ));
        assert!(matches!(
            storage.review_card(Uuid::new_v4(), card.id, 3, Utc::now()).await,
            Err(FlashcardStorageError::CardNotFound(_))
        ));
        let untouched = storage.get_card(user, card.id).await.unwrap();
        assert_eq!(untouched.schedule.review_count, 0);
    }

    #[tokio::test]
    async fn test_due_only_filter() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let deck = storage.create_deck(user, deck_request("Due", false)).await.unwrap();
        let fresh = storage.create_card(user, deck.id, card_request("new")).await.unwrap();
        let seen = storage.create_card(user, deck.id, card_request("seen")).await.unwrap();

        let now = Utc::now();
        storage.review_card(user, seen.id, 4, now).await.unwrap();

        let due = storage.list_cards(user, deck.id, true, now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, fresh.id);

        let later = now + Duration::days(30);
        assert_eq!(storage.list_cards(user, deck.id, true, later).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_deck_removes_cards() {
        let storage = create_test_storage();
        let user = Uuid::new_v4();
        let deck = storage.create_deck(user, deck_request("Temp", false)).await.unwrap();
        storage.create_card(user, deck.id, card_request("a")).await.unwrap();
        storage.create_card(user, deck.id, card_request("b")).await.unwrap();

        storage.delete_deck(user, deck.id).await.unwrap();
        assert_eq!(storage.count_cards().await.unwrap(), 0);
        assert!(storage.get_deck(user, deck.id).await.is_err());
    }
}
