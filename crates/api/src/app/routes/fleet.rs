//! Vehicles, drivers and routes (module `logistica`).

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use marketerp_core::DomainError;
use marketerp_fleet::{DriverStatus, RegisterDriver, RegisterRoute, RegisterVehicle, VehicleStatus};

use crate::app::{dto, errors, services::AppServices};
use crate::authz;
use crate::context::PrincipalContext;

pub fn vehicles_router() -> Router {
    Router::new().route("/", post(register_vehicle).get(list_vehicles))
}

pub fn drivers_router() -> Router {
    Router::new().route("/", post(register_driver).get(list_drivers))
}

pub fn routes_router() -> Router {
    Router::new().route("/", post(register_route).get(list_routes))
}

fn parse_status<T>(filter: &dto::StatusFilter) -> Result<Option<T>, axum::response::Response>
where
    T: std::str::FromStr<Err = DomainError>,
{
    filter
        .status
        .as_deref()
        .map(str::parse::<T>)
        .transpose()
        .map_err(errors::domain_error_to_response)
}

pub async fn register_vehicle(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterVehicle>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::LOGISTICS) {
        return res;
    }

    match services.catalog.register_vehicle(&body) {
        Ok(vehicle) => (StatusCode::CREATED, Json(vehicle)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn list_vehicles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(filter): Query<dto::StatusFilter>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::LOGISTICS) {
        return res;
    }
    let status: Option<VehicleStatus> = match parse_status(&filter) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.catalog.list_vehicles(status) {
        Ok(vehicles) => Json(vehicles).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn register_driver(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterDriver>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::LOGISTICS) {
        return res;
    }

    match services.catalog.register_driver(&body) {
        Ok(driver) => (StatusCode::CREATED, Json(driver)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn list_drivers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(filter): Query<dto::StatusFilter>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::LOGISTICS) {
        return res;
    }
    let status: Option<DriverStatus> = match parse_status(&filter) {
        Ok(v) => v,
        Err(res) => return res,
    };

    match services.catalog.list_drivers(status) {
        Ok(drivers) => Json(drivers).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn register_route(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<RegisterRoute>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::LOGISTICS) {
        return res;
    }

    match services.catalog.register_route(&body) {
        Ok(route) => (StatusCode::CREATED, Json(route)).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}

pub async fn list_routes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(res) = authz::require_module(&principal, authz::LOGISTICS) {
        return res;
    }

    match services.catalog.list_routes() {
        Ok(routes) => Json(routes).into_response(),
        Err(e) => errors::fulfillment_error_to_response(e),
    }
}
