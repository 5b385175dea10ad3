//! Account storage

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::models::*;
use crate::auth::{hash_password, verify_password, AuthError};
use crate::store::{Collection, DocumentStore, Filter, StorageError};

type Result<T> = std::result::Result<T, AuthError>;

/// Minimum length for passwords set by users or admins
pub const MIN_PASSWORD_LEN: usize = 6;

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

/// Largest page the admin listing returns
pub const MAX_LIST_LIMIT: usize = 100;

fn user_not_found() -> AuthError {
    AuthError::Storage(StorageError::NotFound("User not found".to_string()))
}

fn invalid(message: &str) -> AuthError {
    AuthError::Storage(StorageError::InvalidInput(message.to_string()))
}

fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid("Password must be at least 6 characters long"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct AccountStorage {
    accounts: Collection<Account>,
}

impl AccountStorage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            accounts: Collection::new(store),
        }
    }

    /// Register a new, inactive account
    pub async fn register(&self, request: RegisterAccountRequest) -> Result<Account> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();

        if !USERNAME_LEN.contains(&username.chars().count()) {
            return Err(invalid("Username must be between 3 and 50 characters"));
        }
        if !email.contains('@') {
            return Err(invalid("A valid email address is required"));
        }
        check_password(&request.password)?;

        let existing = self
            .accounts
            .find_one(&Filter::new().any_of(vec![
                Filter::new().eq("username", &username),
                Filter::new().eq("email", &email),
            ]))
            .await?;
        if existing.is_some() {
            return Err(AuthError::Storage(StorageError::Conflict(
                "Username or email already registered".to_string(),
            )));
        }

        let mut account = Account::new(username, email, hash_password(&request.password)?);
        account.full_name = request.full_name;
        account.bio = request.bio;
        self.accounts.insert(&account).await?;

        log::info!("Registered account {} ({})", account.username, account.id);
        Ok(account)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .find_one(&Filter::new().eq("username", username))
            .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Account> {
        self.accounts.get(id).await?.ok_or_else(user_not_found)
    }

    /// Check a username and password pair
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Account> {
        let account = self
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &account.hashed_password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Apply a self-service profile update
    pub async fn update(&self, id: Uuid, request: UpdateAccountRequest) -> Result<Account> {
        let mut account = self.get(id).await?;

        if let Some(email) = request.email {
            let email = email.trim().to_string();
            if !email.contains('@') {
                return Err(invalid("A valid email address is required"));
            }
            if email != account.email {
                let taken = self
                    .accounts
                    .find_one(&Filter::new().eq("email", &email))
                    .await?;
                if taken.is_some() {
                    return Err(AuthError::Storage(StorageError::Conflict(
                        "Email already registered".to_string(),
                    )));
                }
            }
            account.email = email;
        }
        if let Some(full_name) = request.full_name {
            account.full_name = Some(full_name);
        }
        if let Some(bio) = request.bio {
            account.bio = Some(bio);
        }
        if let Some(password) = request.password {
            check_password(&password)?;
            account.hashed_password = hash_password(&password)?;
        }

        account.updated_at = Utc::now();
        self.accounts.replace(&account).await?;
        Ok(account)
    }

    /// Page through accounts in registration order
    pub async fn list(&self, query: &AccountListQuery) -> Result<Vec<Account>> {
        if query.limit == 0 || query.limit > MAX_LIST_LIMIT {
            return Err(invalid("limit must be between 1 and 100"));
        }
        let filter = Filter::new().eq_opt("is_active", query.is_active);
        Ok(self
            .accounts
            .find(&filter)
            .await?
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }

    /// Every account, oldest first
    pub async fn all(&self) -> Result<Vec<Account>> {
        let mut accounts = self.accounts.find(&Filter::new()).await?;
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Account> {
        let mut account = self.get(id).await?;
        account.is_active = active;
        account.updated_at = Utc::now();
        self.accounts.replace(&account).await?;
        log::info!("Account {} active = {}", account.username, active);
        Ok(account)
    }

    pub async fn set_superuser(&self, id: Uuid, superuser: bool) -> Result<Account> {
        let mut account = self.get(id).await?;
        account.is_superuser = superuser;
        account.updated_at = Utc::now();
        self.accounts.replace(&account).await?;
        log::info!("Account {} superuser = {}", account.username, superuser);
        Ok(account)
    }

    pub async fn set_password(&self, id: Uuid, password: &str) -> Result<()> {
        check_password(password)?;
        let mut account = self.get(id).await?;
        account.hashed_password = hash_password(password)?;
        account.updated_at = Utc::now();
        self.accounts.replace(&account).await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.accounts.delete_by_id(id).await? {
            return Err(user_not_found());
        }
        log::info!("Deleted account {}", id);
        Ok(())
    }

    pub async fn counts(&self) -> Result<AccountCounts> {
        let accounts = self.accounts.find(&Filter::new()).await?;
        let active = accounts.iter().filter(|a| a.is_active).count();
        Ok(AccountCounts {
            total: accounts.len(),
            active,
            inactive: accounts.len() - active,
            admins: accounts.iter().filter(|a| a.is_superuser).count(),
        })
    }
}
