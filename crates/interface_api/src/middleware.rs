//! API middleware

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::handlers::{REQUEST_ID_HEADER, VIEW_ID_HEADER};

fn header_or_dash(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

/// Audit logging middleware
///
/// One line per API request. Server errors are logged at `warn`.
pub async fn audit_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let (request_id, view_id) = {
        let headers = request.headers();
        (
            header_or_dash(headers, REQUEST_ID_HEADER),
            header_or_dash(headers, VIEW_ID_HEADER),
        )
    };

    let start = Utc::now();
    let response = next.run(request).await;
    let duration = Utc::now() - start;
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            view_id = %view_id,
            status = status.as_u16(),
            duration_ms = duration.num_milliseconds(),
            "API request failed"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            view_id = %view_id,
            status = status.as_u16(),
            duration_ms = duration.num_milliseconds(),
            "API request"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;

    #[test]
    fn test_missing_headers_log_as_dash() {
        let mut headers = HeaderMap::new();
        headers.insert(VIEW_ID_HEADER, HeaderValue::from_static("tab-1"));

        assert_eq!(header_or_dash(&headers, VIEW_ID_HEADER), "tab-1");
        assert_eq!(header_or_dash(&headers, REQUEST_ID_HEADER), "-");
    }

    // from_fn only accepts middleware whose future is Send.
    #[tokio::test]
    async fn test_audit_layer_passes_response_through() {
        let app = Router::new()
            .route("/ping", get(|| async { StatusCode::NO_CONTENT }))
            .layer(middleware::from_fn(audit_middleware));
        let server = TestServer::new(app).unwrap();

        server
            .get("/ping")
            .add_header(
                HeaderName::from_static(VIEW_ID_HEADER),
                HeaderValue::from_static("tab-1"),
            )
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
