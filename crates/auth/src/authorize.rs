use thiserror::Error;

use marketerp_core::UserId;

use crate::{Claims, Module};

/// A verified caller, as derived from token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    pub modules: Vec<Module>,
}

impl Principal {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            modules: claims.modules.clone(),
        }
    }

    pub fn can_open(&self, module: &str) -> bool {
        self.modules.iter().any(|m| m.grants(module))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: module '{0}' is not granted")]
    Forbidden(String),
}

/// Module gate. No IO, no panics.
pub fn authorize(principal: &Principal, module: &str) -> Result<(), AuthzError> {
    if principal.can_open(module) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(module.to_string()))
    }
}
