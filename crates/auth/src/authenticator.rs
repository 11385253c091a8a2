//! Username/password login and token verification.
//!
//! Login never says which half of the credentials was wrong: unknown users,
//! inactive users and bad passwords all get [`LOGIN_FAILED`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use marketerp_core::UserId;
use marketerp_parties::PersonName;

use crate::{Claims, Module, Role, RoleCatalog, TokenCodec, TokenValidationError};

pub const LOGIN_FAILED: &str = "invalid username or password";
pub const LOGIN_SUCCEEDED: &str = "login successful";
pub const LOGIN_UNAVAILABLE: &str = "authentication is temporarily unavailable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Public profile returned on successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    pub modules: Vec<Module>,
}

impl LoginOutcome {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            token: None,
            user: None,
            modules: Vec::new(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("invalid account: {0}")]
    InvalidAccount(String),

    #[error("account store failure: {0}")]
    Store(String),
}

/// Authentication boundary consumed by the HTTP layer.
pub trait Authenticator: Send + Sync {
    fn login(&self, credentials: &Credentials, now: DateTime<Utc>) -> LoginOutcome;

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError>;
}

impl<A> Authenticator for Arc<A>
where
    A: Authenticator + ?Sized,
{
    fn login(&self, credentials: &Credentials, now: DateTime<Utc>) -> LoginOutcome {
        (**self).login(credentials, now)
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        (**self).verify(token, now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    #[serde(flatten)]
    pub name: PersonName,
    pub role: Role,
}

#[derive(Clone)]
struct Account {
    user_id: UserId,
    username: String,
    password: String,
    name: PersonName,
    role: Role,
    active: bool,
}

/// Accounts and role grants held in memory; tokens are HS256 JWTs.
pub struct InMemoryAuthenticator {
    codec: TokenCodec,
    ttl: chrono::Duration,
    roles: RoleCatalog,
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAuthenticator {
    pub fn new(secret: &[u8], ttl: chrono::Duration, roles: RoleCatalog) -> Self {
        Self {
            codec: TokenCodec::hs256(secret),
            ttl,
            roles,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    pub fn add_account(&self, account: NewAccount) -> Result<UserId, AuthError> {
        let username = account.username.trim().to_string();
        if username.is_empty() {
            return Err(AuthError::InvalidAccount("username is required".to_string()));
        }
        if account.password.is_empty() {
            return Err(AuthError::InvalidAccount("password is required".to_string()));
        }
        if !self.roles.contains(&account.role) {
            return Err(AuthError::UnknownRole(account.role.to_string()));
        }

        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AuthError::Store("lock poisoned".to_string()))?;
        if accounts.contains_key(&username) {
            return Err(AuthError::DuplicateUsername(username));
        }

        let user_id = UserId::new();
        accounts.insert(
            username.clone(),
            Account {
                user_id,
                username,
                password: account.password,
                name: account.name,
                role: account.role,
                active: true,
            },
        );
        Ok(user_id)
    }

    /// Inactive accounts cannot log in; tokens already issued stay valid until
    /// they expire.
    pub fn set_active(&self, username: &str, active: bool) -> Result<(), AuthError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|_| AuthError::Store("lock poisoned".to_string()))?;
        let account = accounts
            .get_mut(username)
            .ok_or_else(|| AuthError::InvalidAccount(format!("no account '{username}'")))?;
        account.active = active;
        Ok(())
    }

    fn find_active(&self, credentials: &Credentials) -> Result<Option<Account>, AuthError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|_| AuthError::Store("lock poisoned".to_string()))?;
        Ok(accounts
            .get(credentials.username.trim())
            .filter(|a| a.active && a.password == credentials.password)
            .cloned())
    }
}

impl core::fmt::Debug for InMemoryAuthenticator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryAuthenticator")
            .field("ttl", &self.ttl)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

impl Authenticator for InMemoryAuthenticator {
    fn login(&self, credentials: &Credentials, now: DateTime<Utc>) -> LoginOutcome {
        let account = match self.find_active(credentials) {
            Ok(Some(account)) => account,
            Ok(None) => {
                tracing::warn!(username = %credentials.username, "login rejected");
                return LoginOutcome::failure(LOGIN_FAILED);
            }
            Err(e) => {
                tracing::error!(error = %e, "login failed");
                return LoginOutcome::failure(LOGIN_UNAVAILABLE);
            }
        };

        let modules = self.roles.modules_for(&account.role).to_vec();
        let claims = Claims::new(
            account.user_id,
            account.username.clone(),
            modules.clone(),
            now,
            self.ttl,
        );
        let token = match self.codec.encode(&claims) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "token signing failed");
                return LoginOutcome::failure(LOGIN_UNAVAILABLE);
            }
        };

        tracing::info!(
            user_id = %account.user_id,
            role = %account.role,
            modules = modules.len(),
            "login succeeded"
        );
        LoginOutcome {
            success: true,
            message: LOGIN_SUCCEEDED.to_string(),
            token: Some(token),
            user: Some(UserInfo {
                user_id: account.user_id,
                username: account.username,
                display_name: account.name.display_name(),
                role: account.role,
            }),
            modules,
        }
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        self.codec.decode(token, now)
    }
}
