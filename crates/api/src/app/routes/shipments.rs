use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
    Json, Router,
};

use marketerp_fulfillment::{CreateShipment, DispatchShipment, ShipmentId, ShipmentPatch};

use crate::app::{errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_shipment).get(list_shipments))
        .route("/:id", put(update_shipment))
        .route("/:id/dispatch", put(dispatch_shipment))
        .route("/:id/release", post(release_shipment))
}

pub async fn create_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<CreateShipment>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SHIPMENTS) {
        return res;
    }

    match services.orchestrator.create_shipment(&body) {
        Ok(shipment) => (StatusCode::CREATED, Json(shipment)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

/// Every shipment with its order, client and resource labels resolved.
pub async fn list_shipments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SHIPMENTS) {
        return res;
    }

    match services.orchestrator.list_shipments() {
        Ok(views) => Json(views).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn update_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<ShipmentPatch>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SHIPMENTS) {
        return res;
    }
    let shipment_id: ShipmentId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.orchestrator.update_shipment(shipment_id, &body) {
        Ok(shipment) => Json(shipment).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn dispatch_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<DispatchShipment>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SHIPMENTS) {
        return res;
    }
    let shipment_id: ShipmentId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.orchestrator.dispatch_shipment(shipment_id, &body) {
        Ok(shipment) => Json(shipment).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn release_shipment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::SHIPMENTS) {
        return res;
    }
    let shipment_id: ShipmentId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.orchestrator.release_shipment(shipment_id) {
        Ok(shipment) => Json(shipment).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
