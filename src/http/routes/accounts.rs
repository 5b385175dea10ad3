//! Login, registration and the caller's own profile

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::with_slash;
use crate::accounts::{AccountView, RegisterAccountRequest, UpdateAccountRequest};
use crate::http::{ApiError, ApiResult, AppState, CurrentAccount, Form, Json};

pub(super) fn routes() -> Router<AppState> {
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/users/me", get(me).put(update_me));
    with_slash(router, "/users", post(register))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    access_token: String,
    token_type: &'static str,
}

async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> ApiResult<Json<TokenResponse>> {
    let account = state
        .accounts
        .verify_credentials(&form.username, &form.password)
        .await?;
    if !account.is_active {
        return Err(ApiError::inactive());
    }

    let access_token = state.signer.issue(&account.username, Utc::now())?;
    log::info!("Issued access token for {}", account.username);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountView>)> {
    let account = state.accounts.register(request).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

async fn me(CurrentAccount(account): CurrentAccount) -> Json<AccountView> {
    Json(account.into())
}

async fn update_me(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(request): Json<UpdateAccountRequest>,
) -> ApiResult<Json<AccountView>> {
    let updated = state.accounts.update(account.id, request).await?;
    Ok(Json(updated.into()))
}
