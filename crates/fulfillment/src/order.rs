use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult};
use marketerp_parties::{Client, ClientId};
use marketerp_sales::{Sale, SaleId};

use crate::shipment::{Shipment, ShipmentStatus};

marketerp_core::uuid_newtype!(
    /// Order identifier.
    OrderId,
    "OrderId"
);

/// Order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProcess,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InProcess => "IN_PROCESS",
            OrderStatus::InTransit => "IN_TRANSIT",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "IN_PROCESS" => Ok(OrderStatus::InProcess),
            "IN_TRANSIT" => Ok(OrderStatus::InTransit),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::invalid_argument(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Aggregate root: Order (fulfillment record derived 1:1 from a sale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    sale_id: SaleId,
    client_id: ClientId,
    status: OrderStatus,
    total: u64,
    created_at: DateTime<Utc>,
    version: u64,
}

impl Order {
    /// Create the PENDING order for a persisted sale.
    ///
    /// The caller must have resolved the sale's client; a mismatching client
    /// is rejected rather than silently recorded.
    pub fn materialize(
        id: OrderId,
        sale: &Sale,
        client: &Client,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if sale.client_id() != *client.id() {
            return Err(DomainError::invalid_argument(format!(
                "client {} does not own sale {}",
                client.id(),
                sale.id()
            )));
        }
        Ok(Self {
            id,
            sale_id: *sale.id(),
            client_id: sale.client_id(),
            status: OrderStatus::Pending,
            total: sale.total(),
            created_at: occurred_at,
            version: 0,
        })
    }

    pub fn sale_id(&self) -> SaleId {
        self.sale_id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Dispatch moves the order onto the road.
    pub fn mark_in_transit(&mut self) {
        self.status = OrderStatus::InTransit;
    }

    /// PENDING orders whose shipment (if any) has not been scheduled yet.
    ///
    /// `shipment` must be this order's shipment, if it has one.
    pub fn is_awaiting_shipment(&self, shipment: Option<&Shipment>) -> bool {
        self.status == OrderStatus::Pending
            && shipment.is_none_or(|s| {
                s.status() == ShipmentStatus::Pending && s.ship_date().is_none()
            })
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}
