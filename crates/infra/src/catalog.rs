//! Catalog administration: registration of reference records and stock seeding.
//!
//! Outside the fulfillment invariants: nothing here leases resources or moves
//! orders. New vehicles and drivers start AVAILABLE.

use marketerp_core::{AggregateRoot, DomainError};
use marketerp_fleet::{
    Driver, DriverId, DriverStatus, RegisterDriver, RegisterRoute, RegisterVehicle, Route,
    RouteId, Vehicle, VehicleId, VehicleStatus,
};
use marketerp_inventory::{SetStock, StockEntry, StockKey};
use marketerp_parties::{Client, ClientId, RegisterClient};
use marketerp_products::{Product, ProductId, RegisterProduct};

use crate::error::FulfillmentError;
use crate::store::FulfillmentStore;

#[derive(Debug)]
pub struct CatalogService<S> {
    store: S,
}

impl<S> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> CatalogService<S>
where
    S: FulfillmentStore,
{
    pub fn register_product(&self, cmd: &RegisterProduct) -> Result<Product, FulfillmentError> {
        let product = Product::register(ProductId::new(), cmd)?;
        let stored = self.store.write(|uow| Ok(uow.products_mut().insert(product)?))?;
        tracing::info!(product_id = %stored.id(), "product registered");
        Ok(stored)
    }

    pub fn register_client(&self, cmd: &RegisterClient) -> Result<Client, FulfillmentError> {
        let client = Client::register(ClientId::new(), cmd)?;
        let stored = self.store.write(|uow| Ok(uow.clients_mut().insert(client)?))?;
        tracing::info!(client_id = %stored.id(), "client registered");
        Ok(stored)
    }

    /// Plates are unique across the fleet.
    pub fn register_vehicle(&self, cmd: &RegisterVehicle) -> Result<Vehicle, FulfillmentError> {
        let vehicle = Vehicle::register(VehicleId::new(), cmd)?;
        let stored = self.store.write(|uow| {
            let plate = vehicle.plate().to_string();
            if uow.vehicles().find_one(&|v| v.plate() == plate).is_some() {
                return Err(DomainError::conflict(format!(
                    "vehicle with plate {plate} already exists"
                ))
                .into());
            }
            Ok(uow.vehicles_mut().insert(vehicle)?)
        })?;
        tracing::info!(vehicle_id = %stored.id(), plate = stored.plate(), "vehicle registered");
        Ok(stored)
    }

    pub fn register_driver(&self, cmd: &RegisterDriver) -> Result<Driver, FulfillmentError> {
        let driver = Driver::register(DriverId::new(), cmd)?;
        let stored = self.store.write(|uow| Ok(uow.drivers_mut().insert(driver)?))?;
        tracing::info!(driver_id = %stored.id(), "driver registered");
        Ok(stored)
    }

    pub fn register_route(&self, cmd: &RegisterRoute) -> Result<Route, FulfillmentError> {
        let route = Route::register(RouteId::new(), cmd)?;
        let stored = self.store.write(|uow| Ok(uow.routes_mut().insert(route)?))?;
        tracing::info!(route_id = %stored.id(), "route registered");
        Ok(stored)
    }

    /// Upsert the quantity on hand for a product in a warehouse.
    ///
    /// The product must be registered.
    pub fn set_stock(&self, cmd: &SetStock) -> Result<StockEntry, FulfillmentError> {
        let key = StockKey::new(cmd.product_id, cmd.warehouse_id);
        let stored = self.store.write(|uow| {
            uow.products().require(&cmd.product_id)?;
            let entry = match uow.stock().get(&key) {
                Some(mut existing) => {
                    existing.restock(cmd.quantity)?;
                    uow.stock_mut().save(existing)?
                }
                None => uow.stock_mut().insert(StockEntry::new(key, cmd.quantity)?)?,
            };
            Ok(entry)
        })?;
        tracing::info!(stock_key = %key, quantity = stored.quantity(), "stock set");
        Ok(stored)
    }

    pub fn list_vehicles(
        &self,
        status: Option<VehicleStatus>,
    ) -> Result<Vec<Vehicle>, FulfillmentError> {
        self.store.read(|uow| {
            Ok(uow
                .vehicles()
                .find(&|v| status.is_none_or(|s| v.status() == s)))
        })
    }

    pub fn list_drivers(
        &self,
        status: Option<DriverStatus>,
    ) -> Result<Vec<Driver>, FulfillmentError> {
        self.store.read(|uow| {
            Ok(uow
                .drivers()
                .find(&|d| status.is_none_or(|s| d.status() == s)))
        })
    }

    pub fn list_routes(&self) -> Result<Vec<Route>, FulfillmentError> {
        self.store.read(|uow| Ok(uow.routes().list()))
    }

    pub fn list_clients(&self) -> Result<Vec<Client>, FulfillmentError> {
        self.store.read(|uow| Ok(uow.clients().list()))
    }

    pub fn list_products(&self) -> Result<Vec<Product>, FulfillmentError> {
        self.store.read(|uow| Ok(uow.products().list()))
    }

    pub fn stock_level(&self, key: StockKey) -> Result<StockEntry, FulfillmentError> {
        self.store.read(|uow| Ok(uow.stock().require(&key)?))
    }
}
