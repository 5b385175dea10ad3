//! Data models for accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// A registered user of the tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Argon2id PHC string
    pub hashed_password: String,
    /// New accounts stay inactive until an admin approves them
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Account {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Account {
    pub fn new(username: String, email: String, hashed_password: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            full_name: None,
            bio: None,
            hashed_password,
            is_active: false,
            is_superuser: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Account as returned over the API, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            full_name: account.full_name,
            bio: account.bio,
            is_active: account.is_active,
            is_superuser: account.is_superuser,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAccountRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub password: Option<String>,
}

/// Filters for the admin account listing
#[derive(Debug, Clone, Deserialize)]
pub struct AccountListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    pub is_active: Option<bool>,
}

fn default_list_limit() -> usize {
    100
}

impl Default for AccountListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_list_limit(),
            is_active: None,
        }
    }
}

/// Account counts for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub admins: usize,
}
