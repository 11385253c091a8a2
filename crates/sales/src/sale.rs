use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult, UserId};
use marketerp_inventory::WarehouseId;
use marketerp_parties::ClientId;
use marketerp_products::ProductId;

marketerp_core::uuid_newtype!(
    /// Sale identifier.
    SaleId,
    "SaleId"
);

/// Sale status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Pending,
    Completed,
    Voided,
}

/// One line of a sale. Immutable once the sale is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price in the smallest currency unit.
    pub unit_price: u64,
    pub subtotal: u64,
}

/// Aggregate root: Sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    id: SaleId,
    user_id: UserId,
    client_id: ClientId,
    warehouse_id: WarehouseId,
    subtotal: u64,
    discount: u64,
    tax: u64,
    total: u64,
    status: SaleStatus,
    recorded_at: DateTime<Utc>,
    lines: Vec<LineItem>,
    version: u64,
}

impl Sale {
    /// Record a finalized checkout as a PENDING sale.
    ///
    /// Stock is not checked here; the caller proves availability first.
    pub fn record(id: SaleId, cmd: &FinalizeSale) -> DomainResult<Self> {
        cmd.validate()?;
        Ok(Self {
            id,
            user_id: cmd.user_id,
            client_id: cmd.client_id,
            warehouse_id: cmd.warehouse_id,
            subtotal: cmd.subtotal,
            discount: cmd.discount.unwrap_or(0),
            tax: cmd.tax,
            total: cmd.total,
            status: SaleStatus::Pending,
            recorded_at: cmd.occurred_at,
            lines: cmd
                .lines
                .iter()
                .map(|l| LineItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                    subtotal: l.subtotal,
                })
                .collect(),
            version: 0,
        })
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    pub fn discount(&self) -> u64 {
        self.discount
    }

    pub fn tax(&self) -> u64 {
        self.tax
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }
}

impl AggregateRoot for Sale {
    type Id = SaleId;
    const KIND: &'static str = "sale";

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

/// A requested sale line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: u64,
    pub subtotal: u64,
}

/// Command: FinalizeSale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeSale {
    pub user_id: UserId,
    pub client_id: ClientId,
    pub warehouse_id: WarehouseId,
    pub subtotal: u64,
    #[serde(default)]
    pub discount: Option<u64>,
    pub tax: u64,
    pub total: u64,
    pub lines: Vec<SaleLine>,
    pub occurred_at: DateTime<Utc>,
}

impl FinalizeSale {
    /// Shape checks that need no lookups.
    pub fn validate(&self) -> DomainResult<()> {
        if self.lines.is_empty() {
            return Err(DomainError::invalid_argument(
                "a sale needs at least one line item",
            ));
        }
        if let Some(line) = self.lines.iter().find(|l| l.quantity <= 0) {
            return Err(DomainError::invalid_argument(format!(
                "quantity must be positive for product {} (got {})",
                line.product_id, line.quantity
            )));
        }
        Ok(())
    }
}
