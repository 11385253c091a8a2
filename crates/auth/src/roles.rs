use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Module;

/// Role name (e.g. `"administrador"`, `"almacenero"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role → accessible modules mapping.
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    grants: HashMap<Role, Vec<Module>>,
}

impl RoleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `modules` to `role`, replacing any previous grant.
    pub fn grant(&mut self, role: Role, modules: impl IntoIterator<Item = Module>) {
        let mut modules: Vec<Module> = modules.into_iter().collect();
        modules.sort();
        modules.dedup();
        self.grants.insert(role, modules);
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.grants.contains_key(role)
    }

    /// Modules granted to `role`; empty for unknown roles.
    pub fn modules_for(&self, role: &Role) -> &[Module] {
        self.grants.get(role).map(Vec::as_slice).unwrap_or_default()
    }
}
