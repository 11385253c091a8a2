//! Service wiring for the API process.
//!
//! One in-memory store is shared by the fulfillment orchestrator and the
//! catalog; the authenticator is independent of it.

use std::sync::Arc;

use marketerp_auth::{
    AuthError, Authenticator, InMemoryAuthenticator, Module, NewAccount, Role, RoleCatalog,
};
use marketerp_infra::{CatalogService, DispatchPolicy, FulfillmentOrchestrator, InMemoryStore};
use marketerp_parties::PersonName;

use crate::authz;
use crate::config::AppConfig;

pub type Store = Arc<InMemoryStore>;

pub const ADMIN_ROLE: &str = "administrador";

pub struct AppServices {
    pub orchestrator: FulfillmentOrchestrator<Store>,
    pub catalog: CatalogService<Store>,
    pub auth: Arc<dyn Authenticator>,
}

impl AppServices {
    pub fn new(policy: DispatchPolicy, auth: Arc<dyn Authenticator>) -> Self {
        let store: Store = Arc::new(InMemoryStore::new());
        Self {
            orchestrator: FulfillmentOrchestrator::new(store.clone()).with_policy(policy),
            catalog: CatalogService::new(store),
            auth,
        }
    }

    /// Wire services from configuration, seeding the administrator account.
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let auth = build_authenticator(config)?;
        let policy = DispatchPolicy {
            lease_driver: config.lease_driver,
        };
        Ok(Self::new(policy, Arc::new(auth)))
    }
}

/// Built-in roles and the modules each one opens.
pub fn default_roles() -> RoleCatalog {
    let mut roles = RoleCatalog::new();
    roles.grant(Role::new(ADMIN_ROLE), [Module::all()]);
    roles.grant(
        Role::new("vendedor"),
        [Module::new(authz::SALES), Module::new(authz::CLIENTS)],
    );
    roles.grant(
        Role::new("despachador"),
        [
            Module::new(authz::ORDERS),
            Module::new(authz::SHIPMENTS),
            Module::new(authz::LOGISTICS),
        ],
    );
    roles.grant(Role::new("almacenero"), [Module::new(authz::INVENTORY)]);
    roles
}

pub fn build_authenticator(config: &AppConfig) -> Result<InMemoryAuthenticator, AuthError> {
    let auth = InMemoryAuthenticator::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl(),
        default_roles(),
    );
    auth.add_account(NewAccount {
        username: config.admin_username.clone(),
        password: config.admin_password.clone(),
        name: PersonName::new("Administrador", None, None),
        role: Role::new(ADMIN_ROLE),
    })?;
    tracing::info!(username = %config.admin_username, "administrator account seeded");
    Ok(auth)
}
