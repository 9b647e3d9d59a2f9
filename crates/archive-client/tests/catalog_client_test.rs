//! Contract tests for CatalogClient against the archive listing endpoint.
//!
//! These tests use wiremock to simulate the storefront backend.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/v1/archive?category=…` | `list_catalog_*` |

use archive_client::{ArchiveApiConfig, ArchiveApiError, ArchiveClient};
use archive_core::{CatalogError, CatalogSource, CategoryTag};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an ArchiveClient pointed at a wiremock server.
fn test_client(mock_server: &MockServer) -> ArchiveClient {
    let config = ArchiveApiConfig::local_mock(1)
        .unwrap()
        .with_base_url(&mock_server.uri())
        .unwrap();
    ArchiveClient::new(&config).unwrap()
}

fn magazine() -> CategoryTag {
    CategoryTag("magazine".into())
}

#[tokio::test]
async fn list_catalog_sends_category_and_decodes_documents() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/archive"))
        .and(query_param("category", "magazine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "_id": "64f1c0a1",
                "title": "Spring issue",
                "subtitle": "No. 12",
                "publicationDate": "2023-05-15",
                "category": "magazine",
                "coverImage": "covers/12.jpg",
                "fileUrl": "archive/2023/12.pdf",
                "createdAt": "2023-06-01T09:00:00.000Z"
            },
            {
                "id": "64f1c0a2",
                "title": "Winter issue",
                "contentRef": "archive/2022/11.pdf",
                "uploadedAt": "2022-12-20T09:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let docs = client.catalog().list(&magazine()).await.unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id.as_str(), "64f1c0a1");
    assert_eq!(docs[0].subtitle.as_deref(), Some("No. 12"));
    assert_eq!(docs[0].cover_image.as_deref(), Some("covers/12.jpg"));
    assert_eq!(docs[1].publication_date, None);
    assert_eq!(docs[1].uploaded_at.as_deref(), Some("2022-12-20T09:00:00Z"));
}

#[tokio::test]
async fn list_catalog_accepts_envelope_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [
                { "id": "a", "title": "A", "contentRef": "a.pdf", "publicationDate": "2020-01-01" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let docs = client.catalog().list(&magazine()).await.unwrap();
    assert_eq!(docs.len(), 1);
}

#[tokio::test]
async fn list_catalog_empty_listing_is_ok() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(client.catalog().list(&magazine()).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_catalog_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/archive"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    match client.catalog().list(&magazine()).await.unwrap_err() {
        ArchiveApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 500);
            assert!(body.contains("database down"));
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

#[tokio::test]
async fn list_catalog_malformed_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/archive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.catalog().list(&magazine()).await.unwrap_err();
    assert!(matches!(err, ArchiveApiError::Deserialization { .. }), "got: {err:?}");
}

#[tokio::test]
async fn catalog_source_maps_errors_to_catalog_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/archive"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.catalog().list_documents(&magazine()).await.unwrap_err();
    assert_eq!(
        err,
        CatalogError::Status {
            status: 503,
            body: String::new()
        }
    );
}
