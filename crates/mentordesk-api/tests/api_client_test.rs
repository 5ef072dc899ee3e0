#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mentordesk_api::{ApiClient, BearerToken, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let transport = TransportConfig::default().with_token(BearerToken::new("tok-123"));
    let client = ApiClient::new(&server.uri(), &transport).unwrap();
    (server, client)
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

// ── List tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_mentees_sends_query_and_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mentees"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(query_param("gender", "female"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 7,
                "name": "Aisha Bello",
                "email": "aisha@example.org",
                "gender": "female",
                "status": "active",
                "mentor": { "id": 3, "name": "Grace" }
            }],
            "pagination": { "current_page": 2, "last_page": 3, "per_page": 10, "total": 21 }
        })))
        .mount(&server)
        .await;

    let page = client
        .list_mentees(&params(&[("page", "2"), ("per_page", "10"), ("gender", "female")]))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, 7);
    assert_eq!(page.data[0].mentor.as_ref().unwrap().name, "Grace");
    assert_eq!(page.pagination.total, 21);
    assert_eq!(page.pagination.last_page, 3);
}

#[tokio::test]
async fn test_list_announcements_tolerates_missing_optional_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/announcements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "title": "Orientation day" }],
            "pagination": { "current_page": 1, "last_page": 1, "per_page": 10, "total": 1 }
        })))
        .mount(&server)
        .await;

    let page = client.list_announcements(&[]).await.unwrap();
    assert_eq!(page.data[0].title, "Orientation day");
    assert!(page.data[0].category.is_none());
}

// ── Stats tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_mentee_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mentees/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 12,
            "active": 9,
            "by_category": {
                "male": { "total": 5, "active": 4 },
                "female": { "total": 7, "active": 5 }
            }
        })))
        .mount(&server)
        .await;

    let stats = client.mentee_stats().await.unwrap();
    assert_eq!(stats.total, 12);
    assert_eq!(stats.by_category["female"].active, 5);
}

// ── Mutation tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_bulk_delete_mentees_posts_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/mentees/bulk-delete"))
        .and(body_json(json!({ "ids": [1, 2, 3] })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.bulk_delete_mentees(&[1, 2, 3]).await.unwrap();
}

#[tokio::test]
async fn test_delete_announcement() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/announcements/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_announcement(4).await.unwrap();
}

// ── Error mapping tests ─────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mentees"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })),
        )
        .mount(&server)
        .await;

    let result = client.list_mentees(&[]).await;
    assert!(
        matches!(&result, Err(Error::Unauthorized { message }) if message == "Unauthenticated."),
        "expected Unauthorized error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_stats_endpoint_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/announcements/stats"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.announcement_stats().await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

#[tokio::test]
async fn test_validation_error_lists_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/mentees/bulk-delete"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "The given data was invalid.",
            "errors": { "ids": ["The ids field is required."] }
        })))
        .mount(&server)
        .await;

    let err = client.bulk_delete_mentees(&[]).await.unwrap_err();
    match err {
        Error::Validation { message, fields } => {
            assert_eq!(message, "The given data was invalid.");
            assert_eq!(fields, vec!["ids".to_owned()]);
        }
        other => panic!("expected Validation error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mentees/stats"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.mentee_stats().await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/mentees"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_mentees(&[]).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}
