use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use marketerp_products::RegisterProduct;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", post(register_product).get(list_products))
}

pub async fn register_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterProduct>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::INVENTORY) {
        return res;
    }

    match services.catalog.register_product(&body) {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::INVENTORY) {
        return res;
    }

    match services.catalog.list_products() {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
