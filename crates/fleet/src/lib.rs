//! Fleet domain module: vehicles, drivers and delivery routes.
//!
//! Vehicles and drivers are exclusive transport resources. A shipment leases
//! them while it is in transit; see [`Leasable`].

pub mod driver;
pub mod lease;
pub mod route;
pub mod vehicle;

pub use driver::{Driver, DriverId, DriverStatus, RegisterDriver};
pub use lease::{LeaseHolder, Leasable};
pub use route::{RegisterRoute, Route, RouteId};
pub use vehicle::{RegisterVehicle, Vehicle, VehicleId, VehicleStatus};
