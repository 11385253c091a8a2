use chrono::{DateTime, Utc};
use serde::Deserialize;

use marketerp_core::UserId;
use marketerp_inventory::WarehouseId;
use marketerp_parties::ClientId;
use marketerp_sales::{FinalizeSale, SaleLine};

// -------------------------
// Request DTOs
// -------------------------

/// Checkout body. The acting user comes from the token and the timestamp from
/// the server clock.
#[derive(Debug, Deserialize)]
pub struct FinalizeSaleRequest {
    pub client_id: ClientId,
    pub warehouse_id: WarehouseId,
    pub subtotal: u64,
    #[serde(default)]
    pub discount: Option<u64>,
    pub tax: u64,
    pub total: u64,
    pub lines: Vec<SaleLine>,
}

impl FinalizeSaleRequest {
    pub fn into_command(self, user_id: UserId, now: DateTime<Utc>) -> FinalizeSale {
        FinalizeSale {
            user_id,
            client_id: self.client_id,
            warehouse_id: self.warehouse_id,
            subtotal: self.subtotal,
            discount: self.discount,
            tax: self.tax,
            total: self.total,
            lines: self.lines,
            occurred_at: now,
        }
    }
}

/// `?status=AVAILABLE` filter for resource listings.
#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}
