use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crm_core::CrmError;

pub fn crm_error_to_response(err: CrmError) -> axum::response::Response {
    let status = match &err {
        CrmError::DuplicateEmail(_) => StatusCode::CONFLICT,
        CrmError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path id, answering 400 on failure.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}
