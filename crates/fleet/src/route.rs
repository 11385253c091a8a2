use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};

marketerp_core::uuid_newtype!(
    /// Route identifier.
    RouteId,
    "RouteId"
);

/// Aggregate root: Route. Reference data only; dispatch never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    id: RouteId,
    name: String,
    origin: String,
    destination: String,
    distance_km: f64,
    estimated_hours: f64,
    base_cost: u64,
    version: u64,
}

impl Route {
    pub fn register(id: RouteId, cmd: &RegisterRoute) -> DomainResult<Self> {
        if cmd.name.trim().is_empty() {
            return Err(DomainError::invalid_argument("route name cannot be empty"));
        }
        if !(cmd.distance_km.is_finite() && cmd.distance_km >= 0.0) {
            return Err(DomainError::invalid_argument(
                "route distance must be a non-negative number",
            ));
        }
        if !(cmd.estimated_hours.is_finite() && cmd.estimated_hours >= 0.0) {
            return Err(DomainError::invalid_argument(
                "route duration must be a non-negative number",
            ));
        }
        Ok(Self {
            id,
            name: cmd.name.trim().to_string(),
            origin: cmd.origin.clone(),
            destination: cmd.destination.clone(),
            distance_km: cmd.distance_km,
            estimated_hours: cmd.estimated_hours,
            base_cost: cmd.base_cost,
            version: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn estimated_hours(&self) -> f64 {
        self.estimated_hours
    }

    pub fn base_cost(&self) -> u64 {
        self.base_cost
    }
}

impl AggregateRoot for Route {
    type Id = RouteId;
    const KIND: &'static str = "route";

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

/// Command: RegisterRoute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRoute {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub estimated_hours: f64,
    /// Base cost in the smallest currency unit.
    pub base_cost: u64,
}
