use serde::{Deserialize, Serialize};

use marketerp_core::{AggregateRoot, DomainError, DomainResult, ValueObject};
use marketerp_products::ProductId;

marketerp_core::uuid_newtype!(
    /// Warehouse identifier (stock is tracked per warehouse).
    WarehouseId,
    "WarehouseId"
);

/// Ledger key: one stock count per product per warehouse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StockKey {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
}

impl StockKey {
    pub fn new(product_id: ProductId, warehouse_id: WarehouseId) -> Self {
        Self {
            product_id,
            warehouse_id,
        }
    }
}

impl ValueObject for StockKey {}

impl core::fmt::Display for StockKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{}", self.product_id, self.warehouse_id)
    }
}

/// Aggregate root: StockEntry (quantity on hand for one [`StockKey`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    key: StockKey,
    quantity: i64,
    version: u64,
}

impl StockEntry {
    pub fn new(key: StockKey, quantity: i64) -> DomainResult<Self> {
        ensure_non_negative(quantity)?;
        Ok(Self {
            key,
            quantity,
            version: 0,
        })
    }

    pub fn key(&self) -> StockKey {
        self.key
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn can_supply(&self, requested: i64) -> bool {
        requested <= self.quantity
    }

    /// Take `requested` units out of the ledger.
    ///
    /// The entry is left untouched on failure.
    pub fn decrement(&mut self, requested: i64) -> DomainResult<()> {
        if requested <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "quantity must be positive (got {requested})"
            )));
        }
        if !self.can_supply(requested) {
            return Err(DomainError::insufficient_stock(
                self.key.product_id,
                self.key.warehouse_id,
                requested,
                self.quantity,
            ));
        }
        self.quantity -= requested;
        Ok(())
    }

    /// Administrative overwrite of the quantity on hand.
    pub fn restock(&mut self, quantity: i64) -> DomainResult<()> {
        ensure_non_negative(quantity)?;
        self.quantity = quantity;
        Ok(())
    }
}

impl AggregateRoot for StockEntry {
    type Id = StockKey;
    const KIND: &'static str = "stock entry";

    fn id(&self) -> &Self::Id {
        &self.key
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

/// Command: SetStock (upsert of a ledger entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStock {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
}

fn ensure_non_negative(quantity: i64) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::invalid_argument(format!(
            "stock quantity cannot be negative (got {quantity})"
        )));
    }
    Ok(())
}
