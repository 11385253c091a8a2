//! Infrastructure layer: persistence boundary and fulfillment orchestration.
//!
//! Domain crates decide; this crate coordinates them across records inside
//! store transactions and exposes the entry points used by the API.

pub mod catalog;
pub mod error;
pub mod store;
pub mod workflow;

#[cfg(test)]
mod integration_tests;

pub use catalog::CatalogService;
pub use error::FulfillmentError;
pub use store::{FulfillmentStore, InMemoryStore, Repository, UnitOfWork};
pub use workflow::{DispatchPolicy, FulfillmentOrchestrator};
