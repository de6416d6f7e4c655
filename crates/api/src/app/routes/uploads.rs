//! Upload job endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use salesync_core::SellerId;
use salesync_infra::jobs::{JobId, UploadStatus};

use crate::app::{dto, errors, services::AppServices};

/// POST /upload?path=<link>&seller_id=<id>
///
/// Starts a background job and answers right away with its id.
pub async fn start_upload(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::UploadQuery>,
) -> axum::response::Response {
    let Some(path) = params.path.filter(|p| !p.trim().is_empty()) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "missing_path", "path is required");
    };
    let seller_id: SellerId = match errors::parse_optional(
        params.seller_id.as_deref(),
        "invalid_seller_id",
        "seller_id",
    ) {
        Ok(Some(v)) => v,
        Ok(None) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_seller_id",
                "seller_id is required",
            );
        }
        Err(resp) => return resp,
    };

    let job_id = services.engine().start(path, seller_id).await;

    (
        StatusCode::ACCEPTED,
        Json(dto::UploadAccepted {
            job_id: job_id.to_string(),
        }),
    )
        .into_response()
}

/// GET /get_status?job_id=<id>
///
/// A ready status is handed out once: the job is finished in the same call,
/// so asking again reports it as unknown.
pub async fn get_status(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::StatusQuery>,
) -> Json<UploadStatus> {
    let Some(job_id) = params
        .job_id
        .as_deref()
        .and_then(|raw| raw.parse::<JobId>().ok())
    else {
        return Json(UploadStatus::not_found());
    };

    Json(services.engine().take_status(&job_id).await)
}
