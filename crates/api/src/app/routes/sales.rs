use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use marketerp_sales::SaleId;

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(finalize_sale).get(list_sales))
        .route("/:id", get(get_sale))
}

/// Checkout: takes stock and creates the order and its placeholder shipment.
pub async fn finalize_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::FinalizeSaleRequest>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SALES) {
        return res;
    }

    let cmd = body.into_command(principal.user_id(), Utc::now());
    match services.orchestrator.finalize_sale(&cmd) {
        Ok(sale) => (StatusCode::CREATED, Json(sale)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SALES) {
        return res;
    }

    match services.orchestrator.list_sales() {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SALES) {
        return res;
    }
    let sale_id: SaleId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.orchestrator.sale_details(sale_id) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
