use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};

use crate::lease::{LeaseHolder, Leasable};

marketerp_core::uuid_newtype!(
    /// Vehicle identifier.
    VehicleId,
    "VehicleId"
);

/// Vehicle status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    Available,
    InTransit,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::InTransit => "IN_TRANSIT",
            VehicleStatus::Maintenance => "MAINTENANCE",
            VehicleStatus::Inactive => "INACTIVE",
        }
    }
}

impl core::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for VehicleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(VehicleStatus::Available),
            "IN_TRANSIT" => Ok(VehicleStatus::InTransit),
            "MAINTENANCE" => Ok(VehicleStatus::Maintenance),
            "INACTIVE" => Ok(VehicleStatus::Inactive),
            other => Err(DomainError::invalid_argument(format!(
                "unknown vehicle status: {other}"
            ))),
        }
    }
}

/// Aggregate root: Vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    id: VehicleId,
    plate: String,
    brand: Option<String>,
    model: Option<String>,
    capacity_kg: Option<u32>,
    status: VehicleStatus,
    leased_by: Option<LeaseHolder>,
    version: u64,
}

impl Vehicle {
    /// New vehicles start AVAILABLE.
    pub fn register(id: VehicleId, cmd: &RegisterVehicle) -> DomainResult<Self> {
        let plate = cmd.plate.trim();
        if plate.is_empty() {
            return Err(DomainError::invalid_argument("vehicle plate cannot be empty"));
        }
        Ok(Self {
            id,
            plate: plate.to_uppercase(),
            brand: cmd.brand.clone(),
            model: cmd.model.clone(),
            capacity_kg: cmd.capacity_kg,
            status: VehicleStatus::Available,
            leased_by: None,
            version: 0,
        })
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn capacity_kg(&self) -> Option<u32> {
        self.capacity_kg
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }
}

impl Leasable for Vehicle {
    fn is_available(&self) -> bool {
        self.status == VehicleStatus::Available
    }

    fn leased_by(&self) -> Option<LeaseHolder> {
        self.leased_by
    }

    fn acquire_lease(&mut self, holder: LeaseHolder) -> DomainResult<()> {
        if !self.is_available() {
            return Err(DomainError::resource_unavailable(format!(
                "vehicle {} is {}",
                self.plate, self.status
            )));
        }
        self.status = VehicleStatus::InTransit;
        self.leased_by = Some(holder);
        Ok(())
    }

    fn release_lease(&mut self, holder: LeaseHolder) -> bool {
        if self.status != VehicleStatus::InTransit || self.leased_by != Some(holder) {
            return false;
        }
        self.status = VehicleStatus::Available;
        self.leased_by = None;
        true
    }
}

impl AggregateRoot for Vehicle {
    type Id = VehicleId;
    const KIND: &'static str = "vehicle";

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

/// Command: RegisterVehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterVehicle {
    pub plate: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub capacity_kg: Option<u32>,
}
