use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use marketerp_auth::{Authenticator, Principal};

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<dyn Authenticator>,
}

/// Reject requests without a valid bearer token (401) and attach the
/// [`PrincipalContext`] for everything else.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(reason) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", reason);
        }
    };

    let claims = match state.auth.verify(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "bearer token rejected");
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", e.to_string());
        }
    };

    req.extensions_mut()
        .insert(PrincipalContext::new(Principal::from_claims(&claims)));

    next.run(req).await
}

/// One log line per request with method, path, status and latency.
pub async fn request_log(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let res = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request handled"
    );
    res
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing bearer token")?;

    let header = header.to_str().map_err(|_| "malformed authorization header")?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or("authorization header is not a bearer token")?
        .trim();
    if token.is_empty() {
        return Err("missing bearer token");
    }

    Ok(token)
}
