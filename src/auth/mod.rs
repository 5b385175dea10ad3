//! Authentication for devtrack
//!
//! This module provides:
//! - Argon2id password hashing
//! - HS256 bearer tokens
//! - The `AuthVerifier` seam resolving a token to an account

pub mod password;
pub mod token;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::accounts::{Account, AccountStorage};
use crate::store::StorageError;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSigner};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Token has expired")]
    Expired,

    #[error("No account for token subject {0}")]
    UnknownAccount(String),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Token encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Resolves bearer credentials to an account
#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Account>;
}

/// Verifies signed tokens and looks the subject up by username
pub struct TokenVerifier {
    signer: Arc<TokenSigner>,
    accounts: AccountStorage,
}

impl TokenVerifier {
    pub fn new(signer: Arc<TokenSigner>, accounts: AccountStorage) -> Self {
        Self { signer, accounts }
    }
}

#[async_trait]
impl AuthVerifier for TokenVerifier {
    async fn authenticate(&self, token: &str) -> Result<Account> {
        let claims = self.signer.verify(token, Utc::now())?;
        self.accounts
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownAccount(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::RegisterAccountRequest;
    use crate::store::MemoryStore;

    fn register_request(username: &str) -> RegisterAccountRequest {
        RegisterAccountRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "password123".to_string(),
            full_name: None,
            bio: None,
        }
    }

    #[tokio::test]
    async fn test_token_resolves_to_account() {
        let accounts = AccountStorage::new(Arc::new(MemoryStore::new()));
        let account = accounts.register(register_request("alice")).await.unwrap();
        let signer = Arc::new(TokenSigner::new("secret", 60));
        let verifier = TokenVerifier::new(Arc::clone(&signer), accounts);

        let token = signer.issue("alice", Utc::now()).unwrap();
        let resolved = verifier.authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, account.id);
    }

    #[tokio::test]
    async fn test_token_for_deleted_account_is_rejected() {
        let accounts = AccountStorage::new(Arc::new(MemoryStore::new()));
        let signer = Arc::new(TokenSigner::new("secret", 60));
        let verifier = TokenVerifier::new(Arc::clone(&signer), accounts);

        let token = signer.issue("ghost", Utc::now()).unwrap();
        let err = verifier.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownAccount(name) if name == "ghost"));
    }
}
