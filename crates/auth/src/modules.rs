use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Name of an application module a user may open (e.g. `"envios"`).
///
/// Modules are opaque strings at this layer. The wildcard module `"*"` grants
/// every module and is what administrator roles carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Module(Cow<'static, str>);

impl Module {
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn all() -> Self {
        Self::new(Self::WILDCARD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }

    /// Whether holding this module opens `required`.
    pub fn grants(&self, required: &str) -> bool {
        self.is_wildcard() || self.as_str() == required
    }
}

impl core::fmt::Display for Module {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
