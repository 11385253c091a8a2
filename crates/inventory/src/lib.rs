//! Inventory ledger domain module.
//!
//! Per-(product, warehouse) stock counts. Pure domain logic: the ledger rules
//! (non-negative quantities, all-or-nothing decrements) live here; storage
//! and transactions live in `marketerp-infra`.

pub mod stock;

pub use stock::{SetStock, StockEntry, StockKey, WarehouseId};
