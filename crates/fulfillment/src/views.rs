//! Denormalized read views over orders and shipments.
//!
//! Views never fail: a relation that cannot be resolved renders as `None`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use marketerp_core::AggregateRoot;
use marketerp_fleet::{Driver, DriverId, Route, RouteId, Vehicle, VehicleId};
use marketerp_parties::{Client, ClientId};
use marketerp_sales::SaleId;

use crate::order::{Order, OrderId, OrderStatus};
use crate::shipment::{Shipment, ShipmentId, ShipmentStatus};

/// Shipment list row: shipment fields plus labels from its relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentView {
    pub shipment_id: ShipmentId,
    pub order_id: OrderId,
    pub status: ShipmentStatus,
    pub address: Option<String>,
    pub ship_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub transport_cost: Option<u64>,
    pub notes: Option<String>,
    pub order_total: Option<u64>,
    pub client_id: Option<ClientId>,
    pub client_name: Option<String>,
    pub vehicle_id: Option<VehicleId>,
    pub vehicle_plate: Option<String>,
    pub driver_id: Option<DriverId>,
    pub driver_name: Option<String>,
    pub route_id: Option<RouteId>,
    pub route_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShipmentView {
    pub fn assemble(
        shipment: &Shipment,
        order: Option<&Order>,
        client: Option<&Client>,
        vehicle: Option<&Vehicle>,
        driver: Option<&Driver>,
        route: Option<&Route>,
    ) -> Self {
        Self {
            shipment_id: *shipment.id(),
            order_id: shipment.order_id(),
            status: shipment.status(),
            address: shipment.address().map(str::to_string),
            ship_date: shipment.ship_date(),
            delivery_date: shipment.delivery_date(),
            transport_cost: shipment.transport_cost(),
            notes: shipment.notes().map(str::to_string),
            order_total: order.map(Order::total),
            client_id: order.map(Order::client_id),
            client_name: client.and_then(Client::display_name),
            vehicle_id: shipment.vehicle_id(),
            vehicle_plate: vehicle.map(|v| v.plate().to_string()),
            driver_id: shipment.driver_id(),
            driver_name: driver.and_then(Driver::display_name),
            route_id: shipment.route_id(),
            route_name: route.map(|r| r.name().to_string()),
            created_at: shipment.created_at(),
            updated_at: shipment.updated_at(),
        }
    }
}

/// Order list row used by the pending/available order screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub sale_id: SaleId,
    pub status: OrderStatus,
    pub client_id: ClientId,
    pub client_name: Option<String>,
    pub total: u64,
    pub created_at: DateTime<Utc>,
    pub has_shipment: bool,
    pub shipment_status: Option<ShipmentStatus>,
}

impl OrderSummary {
    pub fn assemble(order: &Order, client: Option<&Client>, shipment: Option<&Shipment>) -> Self {
        Self {
            order_id: *order.id(),
            sale_id: order.sale_id(),
            status: order.status(),
            client_id: order.client_id(),
            client_name: client.and_then(Client::display_name),
            total: order.total(),
            created_at: order.created_at(),
            has_shipment: shipment.is_some(),
            shipment_status: shipment.map(Shipment::status),
        }
    }
}
