use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use crate::flashcards::{
    CardQuery, CreateCardRequest, CreateDeckRequest, Deck, DeckQuery, Flashcard, ReviewRequest,
    UpdateCardRequest, UpdateDeckRequest,
};
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/flashcards/decks", post(create_deck).get(list_decks))
        .route(
            "/flashcards/decks/{id}",
            get(get_deck).put(update_deck).delete(delete_deck),
        )
        .route("/flashcards/decks/{id}/cards", post(create_card).get(list_cards))
        .route("/flashcards/cards/{id}", put(update_card).delete(delete_card))
        .route("/flashcards/cards/{id}/review", post(review_card))
}

async fn create_deck(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateDeckRequest>,
) -> ApiResult<(StatusCode, Json<Deck>)> {
    let deck = state.flashcards.create_deck(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(deck)))
}

async fn list_decks(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<DeckQuery>,
) -> ApiResult<Json<Vec<Deck>>> {
    Ok(Json(state.flashcards.list_decks(account.id, &query).await?))
}

async fn get_deck(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Deck>> {
    Ok(Json(state.flashcards.get_deck(account.id, id).await?))
}

async fn update_deck(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDeckRequest>,
) -> ApiResult<Json<Deck>> {
    Ok(Json(state.flashcards.update_deck(account.id, id, request).await?))
}

async fn delete_deck(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.flashcards.delete_deck(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_card(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(deck_id): Path<Uuid>,
    Json(request): Json<CreateCardRequest>,
) -> ApiResult<(StatusCode, Json<Flashcard>)> {
    let card = state.flashcards.create_card(account.id, deck_id, request).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

async fn list_cards(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(deck_id): Path<Uuid>,
    Query(query): Query<CardQuery>,
) -> ApiResult<Json<Vec<Flashcard>>> {
    let cards = state
        .flashcards
        .list_cards(account.id, deck_id, query.due_only, Utc::now())
        .await?;
    Ok(Json(cards))
}

async fn update_card(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<Json<Flashcard>> {
    Ok(Json(state.flashcards.update_card(account.id, id, request).await?))
}

async fn delete_card(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.flashcards.delete_card(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn review_card(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> ApiResult<Json<Flashcard>> {
    let card = state
        .flashcards
        .review_card(account.id, id, request.difficulty, Utc::now())
        .await?;
    Ok(Json(card))
}
