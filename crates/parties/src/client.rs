use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};

use crate::person::PersonName;

marketerp_core::uuid_newtype!(
    /// Client identifier.
    ClientId,
    "ClientId"
);

/// Contact information for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Aggregate root: Client (the buyer on a sale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    id: ClientId,
    name: PersonName,
    document_number: Option<String>,
    contact: ContactInfo,
    version: u64,
}

impl Client {
    pub fn register(id: ClientId, cmd: &RegisterClient) -> DomainResult<Self> {
        if cmd.name.display_name().is_none() {
            return Err(DomainError::invalid_argument("client name cannot be empty"));
        }
        Ok(Self {
            id,
            name: cmd.name.clone(),
            document_number: cmd.document_number.clone(),
            contact: cmd.contact.clone(),
            version: 0,
        })
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn display_name(&self) -> Option<String> {
        self.name.display_name()
    }

    pub fn document_number(&self) -> Option<&str> {
        self.document_number.as_deref()
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }
}

impl AggregateRoot for Client {
    type Id = ClientId;
    const KIND: &'static str = "client";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Command: RegisterClient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterClient {
    #[serde(flatten)]
    pub name: PersonName,
    #[serde(default)]
    pub document_number: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}
