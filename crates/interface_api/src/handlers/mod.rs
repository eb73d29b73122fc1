//! Request handlers

pub mod health;
pub mod ledger;
pub mod reports;

use std::future::Future;

use axum::http::HeaderMap;
use chrono::NaiveDate;

use core_kernel::{parse_date, OperationMetadata};

use crate::error::ApiError;
use crate::AppState;

/// Client-chosen id for one open ledger view (a tab, a dialog)
pub const VIEW_ID_HEADER: &str = "x-view-id";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Carries the request id into port calls for log correlation
pub(crate) fn metadata(headers: &HeaderMap) -> Option<OperationMetadata> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(OperationMetadata::with_correlation_id)
}

pub(crate) fn optional_date(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{} must be YYYY-MM-DD, got '{}'", name, text))),
    }
}

/// Runs `work` under a generation for `view` when the client sent a view id
///
/// If another request for the same view started while this one was
/// running, the result is dropped and the client gets `superseded`. A
/// request cancelled mid-flight releases its view key.
pub(crate) async fn latest_only<T, F>(
    state: &AppState,
    headers: &HeaderMap,
    view: &str,
    work: F,
) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    let in_flight = headers
        .get(VIEW_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|id| state.generations.track(format!("{}:{}", view, id)));

    let result = work.await;

    match in_flight {
        Some(in_flight) => {
            let key = in_flight.key().to_string();
            if in_flight.finish() {
                result
            } else {
                Err(ApiError::Superseded(format!(
                    "a newer request for {} replaced this one",
                    key
                )))
            }
        }
        None => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::HeaderValue;
    use core_kernel::Currency;
    use domain_ledger::ports::mock::MockLedgerPort;

    use crate::config::ApiConfig;

    fn state() -> AppState {
        AppState::new(Arc::new(MockLedgerPort::new()), ApiConfig::default())
    }

    fn with_view(id: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(VIEW_ID_HEADER, HeaderValue::from_static(id));
        headers
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_running_one() {
        let state = state();
        let headers = with_view("tab-1");

        let result = latest_only(&state, &headers, "sales-ledger", async {
            // A second request for the same tab arrives mid-fold.
            state.generations.begin("sales-ledger:tab-1");
            Ok(Currency::NGN)
        })
        .await;

        assert!(matches!(result, Err(ApiError::Superseded(_))));
    }

    #[tokio::test]
    async fn test_other_views_do_not_interfere() {
        let state = state();
        let headers = with_view("tab-1");

        let result = latest_only(&state, &headers, "sales-ledger", async {
            state.generations.begin("sales-ledger:tab-2");
            Ok(1)
        })
        .await;

        assert_eq!(result.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_without_view_id_nothing_is_tracked() {
        let state = state();

        let result = latest_only(&state, &HeaderMap::new(), "sales-ledger", async { Ok(()) }).await;

        assert!(result.is_ok());
        assert_eq!(state.generations.in_flight(), 0);
    }

    #[test]
    fn test_optional_date() {
        assert_eq!(optional_date(None, "from").unwrap(), None);
        assert_eq!(optional_date(Some("  "), "from").unwrap(), None);
        assert!(optional_date(Some("2024-01-05"), "from").unwrap().is_some());
        assert!(matches!(
            optional_date(Some("05/01/2024"), "from"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_request_releases_view_key() {
        let state = state();
        let headers = with_view("tab-9");

        let never = std::future::pending::<Result<(), ApiError>>();
        let request = latest_only(&state, &headers, "sales-ledger", never);
        let timed_out = tokio::time::timeout(Duration::from_millis(10), request).await;

        assert!(timed_out.is_err());
        assert_eq!(state.generations.in_flight(), 0);
    }
}
