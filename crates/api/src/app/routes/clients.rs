use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use marketerp_parties::RegisterClient;

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", post(register_client).get(list_clients))
}

pub async fn register_client(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterClient>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::CLIENTS) {
        return res;
    }

    match services.catalog.register_client(&body) {
        Ok(client) => (StatusCode::CREATED, Json(client)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn list_clients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::CLIENTS) {
        return res;
    }

    match services.catalog.list_clients() {
        Ok(clients) => Json(clients).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
