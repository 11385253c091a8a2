use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};
use marketerp_parties::PersonName;

use crate::lease::{LeaseHolder, Leasable};

marketerp_core::uuid_newtype!(
    /// Driver identifier.
    DriverId,
    "DriverId"
);

/// Driver status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    Available,
    InTransit,
    Inactive,
}

impl DriverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Available => "AVAILABLE",
            DriverStatus::InTransit => "IN_TRANSIT",
            DriverStatus::Inactive => "INACTIVE",
        }
    }
}

impl core::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for DriverStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(DriverStatus::Available),
            "IN_TRANSIT" => Ok(DriverStatus::InTransit),
            "INACTIVE" => Ok(DriverStatus::Inactive),
            other => Err(DomainError::invalid_argument(format!(
                "unknown driver status: {other}"
            ))),
        }
    }
}

/// Aggregate root: Driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Driver {
    id: DriverId,
    name: PersonName,
    license_number: String,
    license_category: Option<String>,
    status: DriverStatus,
    leased_by: Option<LeaseHolder>,
    version: u64,
}

impl Driver {
    /// New drivers start AVAILABLE.
    pub fn register(id: DriverId, cmd: &RegisterDriver) -> DomainResult<Self> {
        if cmd.name.display_name().is_none() {
            return Err(DomainError::invalid_argument("driver name cannot be empty"));
        }
        let license_number = cmd.license_number.trim();
        if license_number.is_empty() {
            return Err(DomainError::invalid_argument(
                "driver license number cannot be empty",
            ));
        }
        Ok(Self {
            id,
            name: cmd.name.clone(),
            license_number: license_number.to_string(),
            license_category: cmd.license_category.clone(),
            status: DriverStatus::Available,
            leased_by: None,
            version: 0,
        })
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn display_name(&self) -> Option<String> {
        self.name.display_name()
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn license_category(&self) -> Option<&str> {
        self.license_category.as_deref()
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }
}

impl Leasable for Driver {
    fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }

    fn leased_by(&self) -> Option<LeaseHolder> {
        self.leased_by
    }

    fn acquire_lease(&mut self, holder: LeaseHolder) -> DomainResult<()> {
        if !self.is_available() {
            return Err(DomainError::resource_unavailable(format!(
                "driver {} is {}",
                self.license_number, self.status
            )));
        }
        self.status = DriverStatus::InTransit;
        self.leased_by = Some(holder);
        Ok(())
    }

    fn release_lease(&mut self, holder: LeaseHolder) -> bool {
        if self.status != DriverStatus::InTransit || self.leased_by != Some(holder) {
            return false;
        }
        self.status = DriverStatus::Available;
        self.leased_by = None;
        true
    }
}

impl AggregateRoot for Driver {
    type Id = DriverId;
    const KIND: &'static str = "driver";

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

/// Command: RegisterDriver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDriver {
    #[serde(flatten)]
    pub name: PersonName,
    pub license_number: String,
    #[serde(default)]
    pub license_category: Option<String>,
}
