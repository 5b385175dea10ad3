//! Error responses for the REST API

use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::flashcards::FlashcardStorageError;
use crate::store::StorageError;

const CREDENTIALS_DETAIL: &str = "Could not validate credentials";

/// Rendered as `{"detail": "..."}` with the matching status
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Request input axum could not extract; keeps axum's status
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },

    /// Logged, never returned to the client
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn credentials() -> Self {
        Self::Unauthorized(CREDENTIALS_DETAIL.to_string())
    }

    pub fn inactive() -> Self {
        Self::BadRequest("Inactive user".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Internal(message) => {
                log::error!("Internal error: {}", message);
                "Internal server error".to_string()
            }
            Self::BadRequest(m) | Self::Unauthorized(m) | Self::Forbidden(m) | Self::NotFound(m) => m,
            Self::Rejected { detail, .. } => detail,
        };

        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

macro_rules! impl_from_rejection {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    Self::Rejected {
                        status: rejection.status(),
                        detail: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

impl_from_rejection!(JsonRejection, FormRejection, QueryRejection, PathRejection);

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(m) => Self::NotFound(m),
            StorageError::InvalidInput(m) | StorageError::Conflict(m) => Self::BadRequest(m),
            StorageError::Io(e) => Self::Internal(format!("IO error: {}", e)),
            StorageError::Json(e) => Self::Internal(format!("JSON error: {}", e)),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken | AuthError::Expired | AuthError::UnknownAccount(_) => {
                Self::credentials()
            }
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::Storage(e) => e.into(),
            AuthError::Hash(_) | AuthError::Encoding(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<FlashcardStorageError> for ApiError {
    fn from(err: FlashcardStorageError) -> Self {
        match err {
            FlashcardStorageError::Store(e) => e.into(),
            FlashcardStorageError::DeckNotFound(_) => Self::NotFound("Deck not found".to_string()),
            FlashcardStorageError::CardNotFound(_) => Self::NotFound("Card not found".to_string()),
            FlashcardStorageError::InvalidDifficulty(e) => Self::BadRequest(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::algorithm::InvalidDifficulty;
    use uuid::Uuid;

    #[test]
    fn test_storage_errors_map_to_statuses() {
        let not_found: ApiError = StorageError::NotFound("Event not found".to_string()).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict: ApiError = StorageError::Conflict("exists".to_string()).into();
        assert_eq!(conflict.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        for err in [AuthError::InvalidToken, AuthError::Expired, AuthError::InvalidCredentials] {
            assert_eq!(ApiError::from(err).status(), StatusCode::UNAUTHORIZED);
        }
        let err: ApiError = AuthError::UnknownAccount("ghost".to_string()).into();
        assert_eq!(err.to_string(), CREDENTIALS_DETAIL);
    }

    #[test]
    fn test_flashcard_errors() {
        let err: ApiError = FlashcardStorageError::InvalidDifficulty(InvalidDifficulty(9)).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err: ApiError = FlashcardStorageError::CardNotFound(Uuid::new_v4()).into();
        assert_eq!(err.to_string(), "Card not found");
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = ApiError::credentials().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
