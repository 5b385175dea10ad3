use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use chrono::NaiveDate;

use crate::analytics::{MoodSummary, TimeWindow};
use crate::diary::{CreateDiaryEntryRequest, DiaryEntry, DiaryQuery, UpdateDiaryEntryRequest};
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/diary/entries", post(create_entry).get(list_entries))
        .route(
            "/diary/entries/{date}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
        .route("/diary/mood-summary", get(mood_summary))
}

async fn create_entry(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateDiaryEntryRequest>,
) -> ApiResult<(StatusCode, Json<DiaryEntry>)> {
    let entry = state.diary.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn list_entries(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<DiaryQuery>,
) -> ApiResult<Json<Vec<DiaryEntry>>> {
    Ok(Json(state.diary.list(account.id, &query).await?))
}

async fn get_entry(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<DiaryEntry>> {
    Ok(Json(state.diary.get(account.id, date).await?))
}

async fn update_entry(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(date): Path<NaiveDate>,
    Json(request): Json<UpdateDiaryEntryRequest>,
) -> ApiResult<Json<DiaryEntry>> {
    Ok(Json(state.diary.update(account.id, date, request).await?))
}

async fn delete_entry(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(date): Path<NaiveDate>,
) -> ApiResult<StatusCode> {
    state.diary.delete(account.id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mood counts between unix `start_timestamp` and `end_timestamp`
async fn mood_summary(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<DiaryQuery>,
) -> ApiResult<Json<MoodSummary>> {
    let window = TimeWindow::from_unix(query.start_timestamp, query.end_timestamp)?;
    Ok(Json(state.diary.mood_summary(account.id, &window).await?))
}
