use serde::{Deserialize, Serialize};

// -------------------------
// Query strings
// -------------------------

/// `GET /offers` filters. Ids arrive as raw strings so bad input gets our own
/// error envelope instead of the extractor's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct OffersQuery {
    pub seller_id: Option<String>,
    pub offer_id: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    pub path: Option<String>,
    pub seller_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub job_id: Option<String>,
}

// -------------------------
// Responses
// -------------------------

#[derive(Debug, Serialize)]
pub struct UploadAccepted {
    pub job_id: String,
}
