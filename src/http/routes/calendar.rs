use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use crate::calendar::{
    CalendarEvent, CompleteEventRequest, CreateEventRequest, EventQuery, SkipEventRequest,
    UpdateEventRequest,
};
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Path, Query};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar/events", post(create_event).get(list_events))
        .route(
            "/calendar/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/calendar/events/{id}/complete", post(complete_event))
        .route("/calendar/events/{id}/skip", post(skip_event))
}

async fn create_event(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<CalendarEvent>)> {
    let event = state.calendar.create(account.id, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn list_events(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<EventQuery>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    Ok(Json(state.calendar.list(account.id, &query).await?))
}

async fn get_event(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CalendarEvent>> {
    Ok(Json(state.calendar.get(account.id, id).await?))
}

async fn update_event(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> ApiResult<Json<CalendarEvent>> {
    Ok(Json(state.calendar.update(account.id, id, request).await?))
}

async fn complete_event(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteEventRequest>,
) -> ApiResult<Json<CalendarEvent>> {
    Ok(Json(state.calendar.complete(account.id, id, request).await?))
}

async fn skip_event(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
    Json(request): Json<SkipEventRequest>,
) -> ApiResult<Json<CalendarEvent>> {
    Ok(Json(state.calendar.skip(account.id, id, request).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.calendar.delete(account.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
