//! Sale detail read model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use marketerp_core::{AggregateRoot, UserId};
use marketerp_inventory::WarehouseId;
use marketerp_parties::ClientId;
use marketerp_products::{Product, ProductId};

use crate::sale::{Sale, SaleId, SaleStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleLineView {
    pub product_id: ProductId,
    /// `None` when the product is no longer in the catalog.
    pub product_name: Option<String>,
    pub product_image_url: Option<String>,
    pub quantity: i64,
    pub unit_price: u64,
    pub subtotal: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleView {
    pub sale_id: SaleId,
    pub user_id: UserId,
    pub client_id: ClientId,
    pub warehouse_id: WarehouseId,
    pub status: SaleStatus,
    pub subtotal: u64,
    pub discount: u64,
    pub tax: u64,
    pub total: u64,
    pub recorded_at: DateTime<Utc>,
    pub lines: Vec<SaleLineView>,
}

impl SaleView {
    /// Join a sale with whatever product records `lookup` can resolve.
    pub fn assemble<F>(sale: &Sale, mut lookup: F) -> Self
    where
        F: FnMut(&ProductId) -> Option<Product>,
    {
        let lines = sale
            .lines()
            .iter()
            .map(|line| {
                let product = lookup(&line.product_id);
                SaleLineView {
                    product_id: line.product_id,
                    product_name: product.as_ref().map(|p| p.name().to_string()),
                    product_image_url: product
                        .as_ref()
                        .and_then(|p| p.image_url())
                        .map(str::to_string),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    subtotal: line.subtotal,
                }
            })
            .collect();

        Self {
            sale_id: *sale.id(),
            user_id: sale.user_id(),
            client_id: sale.client_id(),
            warehouse_id: sale.warehouse_id(),
            status: sale.status(),
            subtotal: sale.subtotal(),
            discount: sale.discount(),
            tax: sale.tax(),
            total: sale.total(),
            recorded_at: sale.recorded_at(),
            lines,
        }
    }
}
