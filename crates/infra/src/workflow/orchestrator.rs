//! Fulfillment orchestration (application-level entry point).
//!
//! Every public fulfillment operation runs through [`FulfillmentOrchestrator`],
//! which opens exactly one store transaction per call:
//!
//! ```text
//! finalize_sale
//!   ↓
//! 1. Sale Processor      (validate lines, decrement stock, persist sale)
//!   ↓
//! 2. Order Materializer  (resolve client, create the PENDING order)
//!   ↓
//! 3. Placeholder         (bare PENDING shipment for the new order)
//!   ↓
//! commit (or discard everything on the first failure)
//! ```
//!
//! Shipment operations (create, dispatch, update, release) and the read views
//! follow the same shape with a single step. Failures are returned unchanged;
//! nothing here retries.

use chrono::Utc;
use tracing::{Span, instrument};

use marketerp_core::AggregateRoot;
use marketerp_fulfillment::{
    CreateShipment, DispatchShipment, OrderId, OrderSummary, Shipment, ShipmentId,
    ShipmentPatch, ShipmentView,
};
use marketerp_sales::{FinalizeSale, Sale, SaleId, SaleView};

use crate::error::FulfillmentError;
use crate::store::FulfillmentStore;

use super::shipment_dispatcher::{self, DispatchPolicy};
use super::{order_materializer, queries, sale_processor};

#[derive(Debug)]
pub struct FulfillmentOrchestrator<S> {
    store: S,
    policy: DispatchPolicy,
}

impl<S> FulfillmentOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: DispatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> FulfillmentOrchestrator<S>
where
    S: FulfillmentStore,
{
    /// Sale → order → placeholder shipment, all or nothing.
    #[instrument(
        skip(self, cmd),
        fields(
            client_id = %cmd.client_id,
            warehouse_id = %cmd.warehouse_id,
            lines = cmd.lines.len(),
            sale_id = tracing::field::Empty
        )
    )]
    pub fn finalize_sale(&self, cmd: &FinalizeSale) -> Result<Sale, FulfillmentError> {
        let sale_id = SaleId::new();
        Span::current().record("sale_id", tracing::field::display(sale_id));

        let result = self.store.write(|uow| {
            let sale = sale_processor::process_sale(uow, sale_id, cmd)?;
            let order =
                order_materializer::materialize_order(uow, OrderId::new(), &sale, cmd.occurred_at)?;
            let placeholder = Shipment::placeholder(ShipmentId::new(), *order.id(), cmd.occurred_at);
            uow.shipments_mut().insert(placeholder)?;
            Ok(sale)
        });
        traced("finalize_sale", result)
    }

    #[instrument(skip(self, cmd), fields(sale_id = %cmd.sale_id))]
    pub fn create_shipment(&self, cmd: &CreateShipment) -> Result<Shipment, FulfillmentError> {
        let result = self.store.write(|uow| {
            Ok(shipment_dispatcher::create_for_sale(
                uow,
                ShipmentId::new(),
                cmd,
                Utc::now(),
            )?)
        });
        traced("create_shipment", result)
    }

    #[instrument(
        skip(self, cmd),
        fields(
            shipment_id = %shipment_id,
            vehicle_id = %cmd.vehicle_id,
            driver_id = %cmd.driver_id,
            route_id = %cmd.route_id,
            lease_driver = self.policy.lease_driver
        )
    )]
    pub fn dispatch_shipment(
        &self,
        shipment_id: ShipmentId,
        cmd: &DispatchShipment,
    ) -> Result<Shipment, FulfillmentError> {
        let policy = self.policy;
        let result = self.store.write(|uow| {
            Ok(shipment_dispatcher::dispatch(
                uow,
                shipment_id,
                cmd,
                policy,
                Utc::now(),
            )?)
        });
        traced("dispatch_shipment", result)
    }

    #[instrument(skip(self, patch), fields(shipment_id = %shipment_id))]
    pub fn update_shipment(
        &self,
        shipment_id: ShipmentId,
        patch: &ShipmentPatch,
    ) -> Result<Shipment, FulfillmentError> {
        let result = self.store.write(|uow| {
            Ok(shipment_dispatcher::update(
                uow,
                shipment_id,
                patch,
                Utc::now(),
            )?)
        });
        traced("update_shipment", result)
    }

    #[instrument(skip(self), fields(shipment_id = %shipment_id))]
    pub fn release_shipment(&self, shipment_id: ShipmentId) -> Result<Shipment, FulfillmentError> {
        let result = self
            .store
            .write(|uow| Ok(shipment_dispatcher::release(uow, shipment_id)?));
        traced("release_shipment", result)
    }

    pub fn list_shipments(&self) -> Result<Vec<ShipmentView>, FulfillmentError> {
        self.store.read(|uow| Ok(queries::list_shipments(uow)))
    }

    pub fn sale_details(&self, sale_id: SaleId) -> Result<SaleView, FulfillmentError> {
        self.store
            .read(|uow| Ok(queries::sale_details(uow, sale_id)?))
    }

    pub fn list_sales(&self) -> Result<Vec<SaleView>, FulfillmentError> {
        self.store.read(|uow| Ok(queries::list_sales(uow)))
    }

    pub fn pending_orders(&self) -> Result<Vec<OrderSummary>, FulfillmentError> {
        self.store.read(|uow| Ok(queries::pending_orders(uow)))
    }

    pub fn available_orders(&self) -> Result<Vec<OrderSummary>, FulfillmentError> {
        self.store.read(|uow| Ok(queries::available_orders(uow)))
    }
}

/// Log the outcome of a write operation. Business rejections are expected
/// traffic and log at WARN; backend failures log at ERROR.
fn traced<T>(
    operation: &'static str,
    result: Result<T, FulfillmentError>,
) -> Result<T, FulfillmentError> {
    match &result {
        Ok(_) => tracing::info!(operation, "fulfillment operation committed"),
        Err(FulfillmentError::Store(e)) => {
            tracing::error!(operation, error = %e, "fulfillment store failure")
        }
        Err(e) => tracing::warn!(
            operation,
            code = e.code(),
            error = %e,
            "fulfillment operation rejected"
        ),
    }
    result
}
