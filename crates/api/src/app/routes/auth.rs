use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use marketerp_auth::Credentials;

use crate::app::services::AppServices;

/// Always answers with a `LoginOutcome` body; failed logins are 401.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Credentials>,
) -> axum::response::Response {
    let outcome = services.auth.login(&body, Utc::now());
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(outcome)).into_response()
}
