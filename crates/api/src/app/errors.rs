use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use salesync_infra::store::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(key) => json_error(
            StatusCode::CONFLICT,
            "conflict",
            format!("sale {key} already exists"),
        ),
        StoreError::Database(e) => {
            tracing::error!(error = %e, "database error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "database error")
        }
        StoreError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
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

/// Parse an optional query parameter; blank counts as absent.
pub fn parse_optional<T>(
    raw: Option<&str>,
    code: &'static str,
    what: &str,
) -> Result<Option<T>, axum::response::Response>
where
    T: std::str::FromStr,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            json_error(
                StatusCode::BAD_REQUEST,
                code,
                format!("{what} must be an integer, got {s:?}"),
            )
        }),
    }
}
