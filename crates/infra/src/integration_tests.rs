//! Integration tests for the full upload pipeline.
//!
//! Tests: HTTP source → workbook parser → decoder → reconciler → sale store
//!
//! Verifies:
//! - Mixed uploads produce the expected counters and catalog contents
//! - Re-running the same upload updates instead of creating
//! - Unavailable rows remove previously uploaded offers
//! - Download failures surface as job failures

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use salesync_core::{OfferId, SellerId};
    use salesync_sales::{Cell, SaleFilter};

    use crate::jobs::{HttpSourceFetcher, UploadEngine, UploadResult};
    use crate::store::{InMemorySaleStore, SaleStore};
    use crate::test_support::{sale_row, upload_xlsx, wait_ready};

    const SELLER: SellerId = SellerId::new(7);

    type Engine = UploadEngine<Arc<InMemorySaleStore>, HttpSourceFetcher>;

    fn engine() -> Engine {
        let fetcher = HttpSourceFetcher::new(Duration::from_secs(5)).unwrap();
        UploadEngine::new(Arc::new(InMemorySaleStore::new()), fetcher)
    }

    async fn serve(server: &MockServer, route: &str, bytes: Vec<u8>) -> String {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .mount(server)
            .await;
        format!("{}{}", server.uri(), route)
    }

    async fn run(engine: &Engine, link: &str, seller: SellerId) -> UploadResult {
        let id = engine.start(link, seller).await;
        let status = wait_ready(engine, &id).await;
        engine.finish(&id).await;
        status
            .result
            .unwrap_or_else(|| panic!("job failed: {:?}", status.failure))
    }

    #[tokio::test]
    async fn upload_then_reupload_over_http() {
        let server = MockServer::start().await;
        let link = serve(
            &server,
            "/offers.xlsx",
            upload_xlsx(vec![
                sale_row(Cell::Int(1), "A", 100, 5, true),
                sale_row(Cell::Int(2), "B", 50, 0, false),
                sale_row(Cell::Text("x".into()), "C", 10, 1, true),
            ]),
        )
        .await;
        let engine = engine();

        let first = run(&engine, &link, SELLER).await;
        assert_eq!(
            first,
            UploadResult {
                created: 1,
                updated: 0,
                deleted: 0,
                decode_errors: 1,
                internal_errors: 0,
            }
        );

        let second = run(&engine, &link, SELLER).await;
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 1);

        let catalog = engine
            .store()
            .find_by_filter(&SaleFilter::default().with_seller(SELLER))
            .await
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].offer_id, OfferId::new(1));
        assert!(engine.jobs().is_empty().await);
    }

    #[tokio::test]
    async fn unavailable_row_removes_earlier_offer() {
        let server = MockServer::start().await;
        let add = serve(
            &server,
            "/add.xlsx",
            upload_xlsx(vec![
                sale_row(Cell::Int(10), "lamp", 30, 2, true),
                sale_row(Cell::Int(11), "desk", 90, 1, true),
            ]),
        )
        .await;
        let remove = serve(
            &server,
            "/remove.xlsx",
            upload_xlsx(vec![sale_row(Cell::Int(10), "lamp", 30, 2, false)]),
        )
        .await;
        let engine = engine();

        assert_eq!(run(&engine, &add, SELLER).await.created, 2);
        assert_eq!(run(&engine, &remove, SELLER).await.deleted, 1);

        let remaining = engine
            .store()
            .find_by_filter(&SaleFilter::default())
            .await
            .unwrap();
        let names: Vec<_> = remaining.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["desk"]);
    }

    #[tokio::test]
    async fn sellers_do_not_share_offers() {
        let server = MockServer::start().await;
        let link = serve(
            &server,
            "/shared.xlsx",
            upload_xlsx(vec![sale_row(Cell::Int(1), "same offer", 10, 1, true)]),
        )
        .await;
        let engine = engine();

        assert_eq!(run(&engine, &link, SellerId::new(1)).await.created, 1);
        assert_eq!(run(&engine, &link, SellerId::new(2)).await.created, 1);

        let seller_two = engine
            .store()
            .find_by_filter(&SaleFilter::default().with_seller(SellerId::new(2)))
            .await
            .unwrap();
        assert_eq!(seller_two.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_fails_the_job() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let engine = engine();

        let id = engine
            .start(format!("{}/gone.xlsx", server.uri()), SELLER)
            .await;
        let status = wait_ready(&engine, &id).await;

        assert!(status.result.is_none());
        assert_eq!(status.failure.map(|f| f.code), Some(400));
        assert!(engine.store().is_empty());
    }
}
