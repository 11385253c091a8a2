use marketerp_auth::{Module, Principal};
use marketerp_core::UserId;

/// Authenticated caller for a request (inserted by the auth middleware).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn user_id(&self) -> UserId {
        self.principal.user_id
    }

    pub fn username(&self) -> &str {
        &self.principal.username
    }

    pub fn modules(&self) -> &[Module] {
        &self.principal.modules
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
