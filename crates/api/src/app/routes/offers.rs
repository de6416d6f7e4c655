use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    response::IntoResponse,
};

use salesync_core::{OfferId, SellerId};
use salesync_infra::store::SaleStore;
use salesync_sales::SaleFilter;

use crate::app::{dto, errors, services::AppServices};

/// GET /offers?seller_id=&offer_id=&query=
///
/// Filtered catalog read. Every filter is optional; present ones are
/// AND-combined and `query` matches a case-insensitive substring of the name.
pub async fn list_offers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::OffersQuery>,
) -> axum::response::Response {
    let seller_id: Option<SellerId> = match errors::parse_optional(
        params.seller_id.as_deref(),
        "invalid_seller_id",
        "seller_id",
    ) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let offer_id: Option<OfferId> =
        match errors::parse_optional(params.offer_id.as_deref(), "invalid_offer_id", "offer_id") {
            Ok(v) => v,
            Err(resp) => return resp,
        };

    let mut filter = SaleFilter::default();
    if let Some(seller_id) = seller_id {
        filter = filter.with_seller(seller_id);
    }
    if let Some(offer_id) = offer_id {
        filter = filter.with_offer(offer_id);
    }
    if let Some(query) = params.query.filter(|q| !q.is_empty()) {
        filter = filter.with_name_query(query);
    }

    match services.store().find_by_filter(&filter).await {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
