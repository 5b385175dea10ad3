use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::analytics::{Aggregation, AggregationKind, TimeWindow};
use crate::http::{ApiResult, AppState, CurrentAccount, Json, Query};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/skills/time-spent", get(skill_time))
        .route("/analytics/projects/time-spent", get(project_time))
        .route("/analytics/productivity/overview", get(productivity_overview))
        .route("/analytics/mood-summary", get(mood_summary))
}

async fn aggregate(
    state: &AppState,
    CurrentAccount(account): CurrentAccount,
    window: TimeWindow,
    kind: AggregationKind,
) -> ApiResult<Json<Aggregation>> {
    Ok(Json(state.analytics.aggregate(account.id, &window, kind).await?))
}

async fn skill_time(
    State(state): State<AppState>,
    account: CurrentAccount,
    Query(window): Query<TimeWindow>,
) -> ApiResult<Json<Aggregation>> {
    aggregate(&state, account, window, AggregationKind::TimeBySkill).await
}

async fn project_time(
    State(state): State<AppState>,
    account: CurrentAccount,
    Query(window): Query<TimeWindow>,
) -> ApiResult<Json<Aggregation>> {
    aggregate(&state, account, window, AggregationKind::TimeByProject).await
}

async fn productivity_overview(
    State(state): State<AppState>,
    account: CurrentAccount,
    Query(window): Query<TimeWindow>,
) -> ApiResult<Json<Aggregation>> {
    aggregate(&state, account, window, AggregationKind::ProductivityOverview).await
}

/// Mood counts between `start_date` and `end_date`
async fn mood_summary(
    State(state): State<AppState>,
    account: CurrentAccount,
    Query(window): Query<TimeWindow>,
) -> ApiResult<Json<Aggregation>> {
    aggregate(&state, account, window, AggregationKind::MoodSummary).await
}
