//! Module gate applied by handlers before touching services.
//!
//! Each route group belongs to one application module; callers whose token
//! does not carry that module (or `*`) get 403.

use axum::http::StatusCode;
use axum::response::Response;

use marketerp_auth::authorize;

use crate::app::errors;
use crate::context::PrincipalContext;

pub const SALES: &str = "ventas";
pub const ORDERS: &str = "pedidos";
pub const SHIPMENTS: &str = "envios";
pub const LOGISTICS: &str = "logistica";
pub const INVENTORY: &str = "inventario";
pub const CLIENTS: &str = "clientes";

pub fn require_module(principal: &PrincipalContext, module: &str) -> Result<(), Response> {
    authorize(principal.principal(), module).map_err(|e| {
        tracing::debug!(
            user_id = %principal.user_id(),
            module,
            "module access denied"
        );
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}
