//! Fulfillment domain module: orders and shipments.
//!
//! A sale produces exactly one order; an order has at most one shipment. This
//! crate holds the status rules for both records and the denormalized read
//! views. Cross-record coordination (stock, leases, uniqueness) happens in
//! `marketerp-infra` inside a single store transaction.

pub mod order;
pub mod shipment;
pub mod views;

pub use order::{Order, OrderId, OrderStatus};
pub use shipment::{
    CreateShipment, DispatchShipment, Shipment, ShipmentId, ShipmentPatch, ShipmentPlan,
    ShipmentStatus,
};
pub use views::{OrderSummary, ShipmentView};
