use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use marketerp_core::DomainError;
use marketerp_infra::FulfillmentError;

/// HTTP status for a fulfillment failure.
pub fn status_for(err: &FulfillmentError) -> StatusCode {
    match err {
        FulfillmentError::Domain(e) => match e {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DomainError::InsufficientStock { .. }
            | DomainError::InvalidState(_)
            | DomainError::ResourceUnavailable(_)
            | DomainError::Conflict(_) => StatusCode::CONFLICT,
        },
        FulfillmentError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn fulfillment_error_to_response(err: FulfillmentError) -> Response {
    json_error(status_for(&err), err.code(), err.to_string())
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    fulfillment_error_to_response(FulfillmentError::Domain(err))
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a typed id from a path segment; malformed ids are 400.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse().map_err(domain_error_to_response)
}
