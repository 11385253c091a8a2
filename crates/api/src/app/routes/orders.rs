use std::sync::Arc;

use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/pending", get(pending_orders))
        .route("/available", get(available_orders))
}

pub async fn pending_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::ORDERS) {
        return res;
    }

    match services.orchestrator.pending_orders() {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

/// Orders that can still be scheduled for shipment.
pub async fn available_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::ORDERS) {
        return res;
    }

    match services.orchestrator.available_orders() {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
