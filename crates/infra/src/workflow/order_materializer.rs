use chrono::{DateTime, Utc};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};
use marketerp_fulfillment::{Order, OrderId};
use marketerp_sales::Sale;

use crate::store::UnitOfWork;

/// Create the single PENDING order of a persisted sale.
pub fn materialize_order(
    uow: &mut dyn UnitOfWork,
    order_id: OrderId,
    sale: &Sale,
    occurred_at: DateTime<Utc>,
) -> DomainResult<Order> {
    let client = uow.clients().require(&sale.client_id())?;

    let sale_id = *sale.id();
    if let Some(existing) = uow.orders().find_one(&|o| o.sale_id() == sale_id) {
        return Err(DomainError::conflict(format!(
            "sale {sale_id} already has order {}",
            existing.id()
        )));
    }

    let order = Order::materialize(order_id, sale, &client, occurred_at)?;
    uow.orders_mut().insert(order)
}
