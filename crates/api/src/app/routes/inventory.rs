use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use marketerp_inventory::{SetStock, StockKey, WarehouseId};
use marketerp_products::ProductId;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/stock", put(set_stock))
        .route("/stock/:product_id/:warehouse_id", get(get_stock))
}

/// Upsert the quantity on hand (absolute, not a delta).
pub async fn set_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<SetStock>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::INVENTORY) {
        return res;
    }

    match services.catalog.set_stock(&body) {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn get_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((product_id, warehouse_id)): Path<(String, String)>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::INVENTORY) {
        return res;
    }
    let product_id: ProductId = match errors::parse_id(&product_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    let warehouse_id: WarehouseId = match errors::parse_id(&warehouse_id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services
        .catalog
        .stock_level(StockKey::new(product_id, warehouse_id))
    {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
