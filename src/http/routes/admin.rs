//! Account administration. Every route requires an admin account.

use axum::extract::State;
use axum::routing::{get, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::accounts::{AccountCounts, AccountListQuery, AccountView};
use crate::http::{AdminAccount, ApiError, ApiResult, AppState, Json, Path, Query};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", get(get_user).delete(delete_user))
        .route("/admin/users/{id}/activate", put(activate_user))
        .route("/admin/users/{id}/deactivate", put(deactivate_user))
        .route("/admin/users/{id}/make-admin", put(make_admin))
        .route("/admin/users/{id}/remove-admin", put(remove_admin))
        .route("/admin/users/{id}/password", put(change_password))
        .route("/admin/stats", get(stats))
}

fn refuse_self(admin: &AdminAccount, target: Uuid, message: &str) -> ApiResult<()> {
    if admin.0.id == target {
        return Err(ApiError::BadRequest(message.to_string()));
    }
    Ok(())
}

async fn list_users(
    State(state): State<AppState>,
    _admin: AdminAccount,
    Query(query): Query<AccountListQuery>,
) -> ApiResult<Json<Vec<AccountView>>> {
    let accounts = state.accounts.list(&query).await?;
    Ok(Json(accounts.into_iter().map(AccountView::from).collect()))
}

async fn get_user(
    State(state): State<AppState>,
    _admin: AdminAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountView>> {
    Ok(Json(state.accounts.get(id).await?.into()))
}

async fn activate_user(
    State(state): State<AppState>,
    _admin: AdminAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountView>> {
    Ok(Json(state.accounts.set_active(id, true).await?.into()))
}

async fn deactivate_user(
    State(state): State<AppState>,
    admin: AdminAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountView>> {
    refuse_self(&admin, id, "Cannot deactivate your own account")?;
    Ok(Json(state.accounts.set_active(id, false).await?.into()))
}

async fn make_admin(
    State(state): State<AppState>,
    _admin: AdminAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountView>> {
    Ok(Json(state.accounts.set_superuser(id, true).await?.into()))
}

async fn remove_admin(
    State(state): State<AppState>,
    admin: AdminAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountView>> {
    refuse_self(&admin, id, "Cannot remove your own admin privileges")?;
    Ok(Json(state.accounts.set_superuser(id, false).await?.into()))
}

#[derive(Debug, Deserialize)]
struct PasswordChange {
    new_password: String,
}

async fn change_password(
    State(state): State<AppState>,
    _admin: AdminAccount,
    Path(id): Path<Uuid>,
    Json(body): Json<PasswordChange>,
) -> ApiResult<Json<Value>> {
    state.accounts.set_password(id, &body.new_password).await?;
    Ok(Json(json!({ "message": "Password changed successfully" })))
}

async fn delete_user(
    State(state): State<AppState>,
    admin: AdminAccount,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    refuse_self(&admin, id, "Cannot delete your own account")?;
    state.accounts.delete(id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

#[derive(Debug, Serialize)]
struct ContentCounts {
    events: usize,
    flashcards: usize,
    diary_entries: usize,
    improvement_logs: usize,
}

#[derive(Debug, Serialize)]
struct SystemStats {
    users: AccountCounts,
    content: ContentCounts,
}

async fn stats(State(state): State<AppState>, _admin: AdminAccount) -> ApiResult<Json<SystemStats>> {
    let content = ContentCounts {
        events: state.calendar.count_all().await?,
        flashcards: state.flashcards.count_cards().await?,
        diary_entries: state.diary.count_all().await?,
        improvement_logs: state.improvement.count_all().await?,
    };
    Ok(Json(SystemStats {
        users: state.accounts.counts().await?,
        content,
    }))
}
