use axum::{
    Router,
    routing::{get, post},
};

pub mod offers;
pub mod system;
pub mod uploads;

/// Router for catalog and upload endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/offers", get(offers::list_offers))
        .route("/upload", post(uploads::start_upload))
        .route("/get_status", get(uploads::get_status))
}
