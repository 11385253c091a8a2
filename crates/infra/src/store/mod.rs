//! Persistence boundary for the fulfillment workflow.
//!
//! Three layers:
//!
//! - [`Repository`]: keyed access to one record kind (get/find/insert/save/delete),
//!   with an optimistic check-and-set on `save`.
//! - [`UnitOfWork`]: one repository per record kind, all seeing the same
//!   transaction.
//! - [`FulfillmentStore`]: runs closures in read or write transactions. A write
//!   transaction either commits every change made by the closure or none.
//!
//! Workflow code only talks to these traits; [`InMemoryStore`] is the backend
//! used by the API binary and by tests.

pub mod in_memory;

use std::sync::Arc;

use marketerp_core::{AggregateRoot, DomainError, DomainResult};
use marketerp_fleet::{Driver, Route, Vehicle};
use marketerp_fulfillment::{Order, Shipment};
use marketerp_inventory::StockEntry;
use marketerp_parties::Client;
use marketerp_products::Product;
use marketerp_sales::Sale;

use crate::error::FulfillmentError;

pub use in_memory::InMemoryStore;

/// Keyed storage for one record kind.
///
/// Versions are owned by the repository: `insert` expects a never-persisted
/// value (version 0) and stores it at version 1; `save` requires the value's
/// version to equal the stored one and bumps it. Both return the stored copy.
pub trait Repository<V: AggregateRoot + Clone> {
    fn get(&self, id: &V::Id) -> Option<V>;

    /// All records matching `predicate`, in key order.
    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> Vec<V>;

    /// Fails with `Conflict` when the id or a unique key is already taken.
    fn insert(&mut self, value: V) -> DomainResult<V>;

    /// Fails with `NotFound` for unknown ids and `Conflict` for stale versions.
    fn save(&mut self, value: V) -> DomainResult<V>;

    fn delete(&mut self, id: &V::Id) -> DomainResult<()>;

    fn require(&self, id: &V::Id) -> DomainResult<V> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found(V::KIND, id))
    }

    fn find_one(&self, predicate: &dyn Fn(&V) -> bool) -> Option<V> {
        self.find(predicate).into_iter().next()
    }

    fn list(&self) -> Vec<V> {
        self.find(&|_| true)
    }
}

/// All repositories of one transaction.
pub trait UnitOfWork {
    fn sales(&self) -> &dyn Repository<Sale>;
    fn sales_mut(&mut self) -> &mut dyn Repository<Sale>;

    fn orders(&self) -> &dyn Repository<Order>;
    fn orders_mut(&mut self) -> &mut dyn Repository<Order>;

    fn shipments(&self) -> &dyn Repository<Shipment>;
    fn shipments_mut(&mut self) -> &mut dyn Repository<Shipment>;

    fn vehicles(&self) -> &dyn Repository<Vehicle>;
    fn vehicles_mut(&mut self) -> &mut dyn Repository<Vehicle>;

    fn drivers(&self) -> &dyn Repository<Driver>;
    fn drivers_mut(&mut self) -> &mut dyn Repository<Driver>;

    fn routes(&self) -> &dyn Repository<Route>;
    fn routes_mut(&mut self) -> &mut dyn Repository<Route>;

    fn clients(&self) -> &dyn Repository<Client>;
    fn clients_mut(&mut self) -> &mut dyn Repository<Client>;

    fn products(&self) -> &dyn Repository<Product>;
    fn products_mut(&mut self) -> &mut dyn Repository<Product>;

    fn stock(&self) -> &dyn Repository<StockEntry>;
    fn stock_mut(&mut self) -> &mut dyn Repository<StockEntry>;
}

/// Transaction runner.
pub trait FulfillmentStore: Send + Sync {
    /// Run `f` against a consistent snapshot.
    fn read<T, F>(&self, f: F) -> Result<T, FulfillmentError>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, FulfillmentError>;

    /// Run `f` in a write transaction; any error discards every change `f` made.
    fn write<T, F>(&self, f: F) -> Result<T, FulfillmentError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, FulfillmentError>;
}

impl<S> FulfillmentStore for Arc<S>
where
    S: FulfillmentStore,
{
    fn read<T, F>(&self, f: F) -> Result<T, FulfillmentError>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, FulfillmentError>,
    {
        (**self).read(f)
    }

    fn write<T, F>(&self, f: F) -> Result<T, FulfillmentError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, FulfillmentError>,
    {
        (**self).write(f)
    }
}
