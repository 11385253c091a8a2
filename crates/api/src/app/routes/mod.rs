use axum::{Router, routing::get};

pub mod auth;
pub mod clients;
pub mod fleet;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod sales;
pub mod shipments;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/sales", sales::router())
        .nest("/orders", orders::router())
        .nest("/shipments", shipments::router())
        .nest("/vehicles", fleet::vehicles_router())
        .nest("/drivers", fleet::drivers_router())
        .nest("/routes", fleet::routes_router())
        .nest("/clients", clients::router())
        .nest("/products", products::router())
        .nest("/inventory", inventory::router())
}
