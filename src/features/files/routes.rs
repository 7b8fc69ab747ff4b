use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::files::handlers::serve_upload;
use crate::modules::storage::FileStorage;

/// Create the public route serving stored uploads
pub fn routes(storage: Arc<dyn FileStorage>) -> Router {
    Router::new()
        .route("/uploads/{file}", get(serve_upload))
        .with_state(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::memory_storage::MemoryStorage;
    use axum::http::{header, StatusCode};
    use axum_test::TestServer;

    fn server() -> (TestServer, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let server = TestServer::new(routes(storage.clone())).unwrap();
        (server, storage)
    }

    #[tokio::test]
    async fn test_serves_stored_file_with_content_type() {
        let (server, storage) = server();
        let path = storage.insert("avatar.png", b"png-bytes");

        let response = server.get(&path).await;
        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), "image/png");
        assert_eq!(&response.as_bytes()[..], b"png-bytes");
        assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    }

    #[tokio::test]
    async fn test_svg_is_served_as_octet_stream() {
        let (server, storage) = server();
        let path = storage.insert("avatar.svg", b"<svg onload=\"alert(1)\"/>");

        let response = server.get(&path).await;
        response.assert_status_ok();
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/octet-stream"
        );
        assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let (server, _) = server();
        server
            .get("/uploads/missing.jpg")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dot_dot_name_is_rejected() {
        let (server, _) = server();
        server
            .get("/uploads/..")
            .await
            .assert_status_not_ok();
    }
}
