use std::collections::BTreeMap;
use std::sync::RwLock;

use marketerp_core::{AggregateRoot, DomainError, DomainResult, ExpectedVersion};
use marketerp_fleet::{Driver, Route, Vehicle};
use marketerp_fulfillment::{Order, Shipment};
use marketerp_inventory::StockEntry;
use marketerp_parties::Client;
use marketerp_products::Product;
use marketerp_sales::Sale;

use super::{FulfillmentStore, Repository, UnitOfWork};
use crate::error::FulfillmentError;

/// Secondary key that must be unique across a table.
struct UniqueIndex<V> {
    name: &'static str,
    key: fn(&V) -> String,
}

impl<V> core::fmt::Debug for UniqueIndex<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UniqueIndex").field("name", &self.name).finish()
    }
}

impl<V> Clone for UniqueIndex<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for UniqueIndex<V> {}

/// One record kind, keyed by id.
#[derive(Debug)]
struct Table<V: AggregateRoot> {
    rows: BTreeMap<V::Id, V>,
    unique: Option<UniqueIndex<V>>,
}

impl<V: AggregateRoot + Clone> Clone for Table<V> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            unique: self.unique,
        }
    }
}

impl<V: AggregateRoot> Table<V> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            unique: None,
        }
    }

    fn with_unique(name: &'static str, key: fn(&V) -> String) -> Self {
        Self {
            rows: BTreeMap::new(),
            unique: Some(UniqueIndex { name, key }),
        }
    }

    fn check_unique(&self, value: &V) -> DomainResult<()> {
        let Some(index) = self.unique else {
            return Ok(());
        };
        let key = (index.key)(value);
        let taken = self
            .rows
            .values()
            .any(|other| other.id() != value.id() && (index.key)(other) == key);
        if taken {
            return Err(DomainError::conflict(format!(
                "{} with {} {} already exists",
                V::KIND,
                index.name,
                key
            )));
        }
        Ok(())
    }
}

impl<V: AggregateRoot + Clone> Repository<V> for Table<V> {
    fn get(&self, id: &V::Id) -> Option<V> {
        self.rows.get(id).cloned()
    }

    fn find(&self, predicate: &dyn Fn(&V) -> bool) -> Vec<V> {
        self.rows
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    fn insert(&mut self, mut value: V) -> DomainResult<V> {
        if value.version() != 0 {
            return Err(DomainError::conflict(format!(
                "{} {} was already persisted (version {})",
                V::KIND,
                value.id(),
                value.version()
            )));
        }
        if self.rows.contains_key(value.id()) {
            return Err(DomainError::conflict(format!(
                "{} {} already exists",
                V::KIND,
                value.id()
            )));
        }
        self.check_unique(&value)?;

        value.set_version(1);
        self.rows.insert(*value.id(), value.clone());
        Ok(value)
    }

    fn save(&mut self, mut value: V) -> DomainResult<V> {
        let stored = self
            .rows
            .get(value.id())
            .ok_or_else(|| DomainError::not_found(V::KIND, value.id()))?;
        ExpectedVersion::Exact(stored.version())
            .check(value.version())
            .map_err(|_| {
                DomainError::conflict(format!(
                    "{} {} was modified concurrently (stored version {}, given {})",
                    V::KIND,
                    value.id(),
                    stored.version(),
                    value.version()
                ))
            })?;
        self.check_unique(&value)?;

        value.set_version(stored.version() + 1);
        self.rows.insert(*value.id(), value.clone());
        Ok(value)
    }

    fn delete(&mut self, id: &V::Id) -> DomainResult<()> {
        self.rows
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found(V::KIND, id))
    }
}

/// Every table of the store. Cloned wholesale to form a write transaction's
/// working copy.
#[derive(Debug, Clone)]
struct Tables {
    sales: Table<Sale>,
    orders: Table<Order>,
    shipments: Table<Shipment>,
    vehicles: Table<Vehicle>,
    drivers: Table<Driver>,
    routes: Table<Route>,
    clients: Table<Client>,
    products: Table<Product>,
    stock: Table<StockEntry>,
}

impl Tables {
    fn new() -> Self {
        Self {
            sales: Table::new(),
            orders: Table::with_unique("sale_id", |o: &Order| o.sale_id().to_string()),
            shipments: Table::with_unique("order_id", |s: &Shipment| s.order_id().to_string()),
            vehicles: Table::new(),
            drivers: Table::new(),
            routes: Table::new(),
            clients: Table::new(),
            products: Table::new(),
            stock: Table::new(),
        }
    }
}

impl UnitOfWork for Tables {
    fn sales(&self) -> &dyn Repository<Sale> {
        &self.sales
    }
    fn sales_mut(&mut self) -> &mut dyn Repository<Sale> {
        &mut self.sales
    }

    fn orders(&self) -> &dyn Repository<Order> {
        &self.orders
    }
    fn orders_mut(&mut self) -> &mut dyn Repository<Order> {
        &mut self.orders
    }

    fn shipments(&self) -> &dyn Repository<Shipment> {
        &self.shipments
    }
    fn shipments_mut(&mut self) -> &mut dyn Repository<Shipment> {
        &mut self.shipments
    }

    fn vehicles(&self) -> &dyn Repository<Vehicle> {
        &self.vehicles
    }
    fn vehicles_mut(&mut self) -> &mut dyn Repository<Vehicle> {
        &mut self.vehicles
    }

    fn drivers(&self) -> &dyn Repository<Driver> {
        &self.drivers
    }
    fn drivers_mut(&mut self) -> &mut dyn Repository<Driver> {
        &mut self.drivers
    }

    fn routes(&self) -> &dyn Repository<Route> {
        &self.routes
    }
    fn routes_mut(&mut self) -> &mut dyn Repository<Route> {
        &mut self.routes
    }

    fn clients(&self) -> &dyn Repository<Client> {
        &self.clients
    }
    fn clients_mut(&mut self) -> &mut dyn Repository<Client> {
        &mut self.clients
    }

    fn products(&self) -> &dyn Repository<Product> {
        &self.products
    }
    fn products_mut(&mut self) -> &mut dyn Repository<Product> {
        &mut self.products
    }

    fn stock(&self) -> &dyn Repository<StockEntry> {
        &self.stock
    }
    fn stock_mut(&mut self) -> &mut dyn Repository<StockEntry> {
        &mut self.stock
    }
}

/// In-memory transactional store.
///
/// Intended for tests/dev. Write transactions are serialized: the write lock is
/// held while the closure runs against a cloned working copy, which replaces
/// the committed tables only when the closure succeeds. Every write clones all
/// tables, so its cost grows with the total number of stored rows.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FulfillmentStore for InMemoryStore {
    fn read<T, F>(&self, f: F) -> Result<T, FulfillmentError>
    where
        F: FnOnce(&dyn UnitOfWork) -> Result<T, FulfillmentError>,
    {
        let tables = self
            .tables
            .read()
            .map_err(|_| FulfillmentError::Store("lock poisoned".to_string()))?;
        f(&*tables)
    }

    fn write<T, F>(&self, f: F) -> Result<T, FulfillmentError>
    where
        F: FnOnce(&mut dyn UnitOfWork) -> Result<T, FulfillmentError>,
    {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| FulfillmentError::Store("lock poisoned".to_string()))?;

        let mut working = tables.clone();
        let out = f(&mut working)?;
        *tables = working;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketerp_fleet::{LeaseHolder, Leasable, RegisterVehicle, VehicleId, VehicleStatus};

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle::register(
            VehicleId::new(),
            &RegisterVehicle {
                plate: plate.to_string(),
                brand: None,
                model: None,
                capacity_kg: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn insert_assigns_first_version_and_save_bumps_it() {
        let store = InMemoryStore::new();
        let stored = store
            .write(|uow| Ok(uow.vehicles_mut().insert(vehicle("AAA-111"))?))
            .unwrap();
        assert_eq!(stored.version(), 1);

        let mut leased = stored.clone();
        leased.acquire_lease(LeaseHolder::new()).unwrap();
        let saved = store.write(|uow| Ok(uow.vehicles_mut().save(leased)?)).unwrap();
        assert_eq!(saved.version(), 2);
        assert_eq!(saved.status(), VehicleStatus::InTransit);
    }

    #[test]
    fn stale_save_is_a_conflict() {
        let store = InMemoryStore::new();
        let stored = store
            .write(|uow| Ok(uow.vehicles_mut().insert(vehicle("AAA-111"))?))
            .unwrap();

        let first = stored.clone();
        store.write(|uow| Ok(uow.vehicles_mut().save(first)?)).unwrap();

        let err = store
            .write(|uow| Ok(uow.vehicles_mut().save(stored)?))
            .unwrap_err();
        match err {
            FulfillmentError::Domain(DomainError::Conflict(msg)) if msg.contains("concurrently") => {}
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn failed_write_discards_the_working_copy() {
        let store = InMemoryStore::new();
        let result: Result<(), FulfillmentError> = store.write(|uow| {
            uow.vehicles_mut().insert(vehicle("BBB-222"))?;
            Err(DomainError::invalid_state("abort").into())
        });
        assert!(result.is_err());

        let count = store.read(|uow| Ok(uow.vehicles().list().len())).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn save_and_delete_unknown_ids_are_not_found() {
        let store = InMemoryStore::new();
        let v = vehicle("CCC-333");
        let id = *v.id();

        let err = store.write(|uow| Ok(uow.vehicles_mut().save(v)?)).unwrap_err();
        assert!(matches!(
            err,
            FulfillmentError::Domain(DomainError::NotFound { entity: "vehicle", .. })
        ));

        let err = store.write(|uow| Ok(uow.vehicles_mut().delete(&id)?)).unwrap_err();
        assert!(matches!(err, FulfillmentError::Domain(DomainError::NotFound { .. })));
    }

    #[test]
    fn delete_removes_the_record() {
        let store = InMemoryStore::new();
        let stored = store
            .write(|uow| Ok(uow.vehicles_mut().insert(vehicle("DDD-444"))?))
            .unwrap();
        let id = *stored.id();

        store.write(|uow| Ok(uow.vehicles_mut().delete(&id)?)).unwrap();
        let found = store.read(|uow| Ok(uow.vehicles().get(&id))).unwrap();
        assert!(found.is_none());
    }
}
