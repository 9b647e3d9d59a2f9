//! Contract tests for AccessClient against the per-document access check.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/v1/archive/{id}/access` | `access_*` |

use archive_client::{ArchiveApiConfig, ArchiveApiError, ArchiveClient};
use archive_core::{AccessCheckError, AccessGateway, BearerToken, DocumentId};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> ArchiveClient {
    let config = ArchiveApiConfig::local_mock(1)
        .unwrap()
        .with_base_url(&mock_server.uri())
        .unwrap();
    ArchiveClient::new(&config).unwrap()
}

fn doc_id() -> DocumentId {
    DocumentId::new("64f1c0a1").unwrap()
}

const ACCESS_PATH: &str = "/api/v1/archive/64f1c0a1/access";

#[tokio::test]
async fn access_granted_returns_locator() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACCESS_PATH))
        .and(header("authorization", "Bearer visitor-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "contentUrl": "https://cdn.example/archive/2023/12.pdf?sig=abc",
            "remainingFreeViews": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let token = BearerToken::new("visitor-token");
    let grant = client.access().check(&doc_id(), token.as_ref()).await.unwrap();

    assert_eq!(
        grant.content_url.as_str(),
        "https://cdn.example/archive/2023/12.pdf?sig=abc"
    );
    assert_eq!(grant.remaining_free_views, Some(1));
}

#[tokio::test]
async fn access_anonymous_sends_no_authorization_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACCESS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "contentUrl": "https://cdn.example/preview.pdf"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let grant = client.access().check(&doc_id(), None).await.unwrap();
    assert_eq!(grant.remaining_free_views, None);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn access_401_is_reported_with_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACCESS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"login required"}"#))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    match client.access().check(&doc_id(), None).await.unwrap_err() {
        ArchiveApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("login required"));
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

#[tokio::test]
async fn access_403_maps_to_status_through_gateway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACCESS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exhausted"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.access().check_access(&doc_id(), None).await.unwrap_err();
    assert_eq!(
        err,
        AccessCheckError::Status {
            status: 403,
            body: "quota exhausted".into()
        }
    );
}

#[tokio::test]
async fn access_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACCESS_PATH))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.access().check_access(&doc_id(), None).await.unwrap_err();
    assert!(matches!(err, AccessCheckError::Status { status: 502, .. }));
}

#[tokio::test]
async fn access_success_without_locator_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ACCESS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.access().check_access(&doc_id(), None).await.unwrap_err();
    assert!(matches!(err, AccessCheckError::Decode(_)), "got: {err:?}");
}

#[tokio::test]
async fn access_unreachable_server_is_transport_error() {
    let config = ArchiveApiConfig::local_mock(1).unwrap();
    let client = ArchiveClient::new(&config).unwrap();

    let err = client.access().check_access(&doc_id(), None).await.unwrap_err();
    assert!(matches!(err, AccessCheckError::Transport(_)), "got: {err:?}");
}
