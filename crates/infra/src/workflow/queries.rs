//! Read-side joins. Run inside a read transaction so every view is built from
//! one consistent snapshot.

use std::collections::HashMap;

use marketerp_core::{AggregateRoot, DomainResult};
use marketerp_fulfillment::{Order, OrderId, OrderStatus, OrderSummary, Shipment, ShipmentView};
use marketerp_sales::{SaleId, SaleView};

use crate::store::UnitOfWork;

pub fn list_shipments(uow: &dyn UnitOfWork) -> Vec<ShipmentView> {
    uow.shipments()
        .list()
        .iter()
        .map(|shipment| {
            let order = uow.orders().get(&shipment.order_id());
            let client = order
                .as_ref()
                .and_then(|o| uow.clients().get(&o.client_id()));
            let vehicle = shipment.vehicle_id().and_then(|id| uow.vehicles().get(&id));
            let driver = shipment.driver_id().and_then(|id| uow.drivers().get(&id));
            let route = shipment.route_id().and_then(|id| uow.routes().get(&id));

            ShipmentView::assemble(
                shipment,
                order.as_ref(),
                client.as_ref(),
                vehicle.as_ref(),
                driver.as_ref(),
                route.as_ref(),
            )
        })
        .collect()
}

pub fn sale_details(uow: &dyn UnitOfWork, sale_id: SaleId) -> DomainResult<SaleView> {
    let sale = uow.sales().require(&sale_id)?;
    Ok(SaleView::assemble(&sale, |id| uow.products().get(id)))
}

pub fn list_sales(uow: &dyn UnitOfWork) -> Vec<SaleView> {
    uow.sales()
        .list()
        .iter()
        .map(|sale| SaleView::assemble(sale, |id| uow.products().get(id)))
        .collect()
}

/// Orders still in PENDING status, whatever their shipment looks like.
pub fn pending_orders(uow: &dyn UnitOfWork) -> Vec<OrderSummary> {
    summarize(uow, |order, _| order.status() == OrderStatus::Pending)
}

/// PENDING orders with no shipment, or whose shipment is still unscheduled.
pub fn available_orders(uow: &dyn UnitOfWork) -> Vec<OrderSummary> {
    summarize(uow, |order, shipment| order.is_awaiting_shipment(shipment))
}

fn summarize<P>(uow: &dyn UnitOfWork, keep: P) -> Vec<OrderSummary>
where
    P: Fn(&Order, Option<&Shipment>) -> bool,
{
    let shipments: HashMap<OrderId, Shipment> = uow
        .shipments()
        .list()
        .into_iter()
        .map(|s| (s.order_id(), s))
        .collect();

    uow.orders()
        .list()
        .iter()
        .filter_map(|order| {
            let shipment = shipments.get(order.id());
            if !keep(order, shipment) {
                return None;
            }
            let client = uow.clients().get(&order.client_id());
            Some(OrderSummary::assemble(order, client.as_ref(), shipment))
        })
        .collect()
}
