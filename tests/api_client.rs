//! Integration tests for the backend client against a mock server.
//!
//! Each test mounts its own `MockServer`; the client is pointed at it via
//! the localhost-HTTP allowance.

use plume::api::{ApiClient, ApiError, ArticleQuery};
use secrecy::SecretString;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), None).unwrap()
}

fn envelope(data: &str) -> String {
    format!(r#"{{"code": 0, "message": "ok", "data": {}}}"#, data)
}

// ============================================================================
// Envelope handling
// ============================================================================

#[tokio::test]
async fn category_tree_decodes_nested_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/category/tree"))
        .and(query_param("rootId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            r#"[
                {"categoryId": 2, "categoryName": "Tech", "parentId": 1,
                 "articleTotal": 4,
                 "children": [
                    {"categoryId": 3, "categoryName": "Frontend", "parentId": 2}
                 ]}
            ]"#,
        )))
        .mount(&server)
        .await;

    let tree = client_for(&server).category_tree(1).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].category_name, "Tech");
    assert_eq!(tree[0].children[0].category_name, "Frontend");
    assert!(tree[0].children[0].children.is_empty());
}

#[tokio::test]
async fn backend_error_code_surfaces_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"code": 50012, "message": "article not found"}"#),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).article(7).await.unwrap_err();
    match err {
        ApiError::Backend { code, message } => {
            assert_eq!(code, 50012);
            assert_eq!(message, "article not found");
        }
        other => panic!("expected Backend error, got {:?}", other.to_string()),
    }
}

#[tokio::test]
async fn success_without_data_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/author"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code": 0}"#))
        .mount(&server)
        .await;

    let err = client_for(&server).author().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingData(_)));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tag/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).tags().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// ============================================================================
// Query shaping
// ============================================================================

#[tokio::test]
async fn category_articles_sends_comma_separated_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article/category/page"))
        .and(query_param("pageNum", "1"))
        .and(query_param("pageSize", "4"))
        .and(query_param("categoryIds", "2,3,5,4"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            r#"{"records": [
                    {"articleId": 9, "title": "Hello"}
                ], "current": 1, "pages": 1, "total": 1}"#,
        )))
        .mount(&server)
        .await;

    let query = ArticleQuery {
        page_num: 1,
        page_size: 4,
        category_ids: vec![2, 3, 5, 4],
    };
    let page = client_for(&server).category_articles(&query).await.unwrap();
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].title, "Hello");
    assert!(!page.has_more());
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article/total"))
        .and(header("Authorization", "Bearer sekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope("42")))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), Some(SecretString::from("sekrit"))).unwrap();
    assert_eq!(client.article_total().await.unwrap(), 42);
}

#[tokio::test]
async fn publish_dates_skip_unparsable_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article/publish-dates"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(
            r#"["2025-05-06", "2025-05-06 01:42:09", "garbage", "2024-12-31"]"#,
        )))
        .mount(&server)
        .await;

    let dates = client_for(&server).publish_dates().await.unwrap();
    // "garbage" dropped, timestamped entry truncated to its date part
    assert_eq!(dates.len(), 3);
    assert_eq!(dates[0].to_string(), "2025-05-06");
    assert_eq!(dates[1].to_string(), "2025-05-06");
    assert_eq!(dates[2].to_string(), "2024-12-31");
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn http_4xx_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/article/1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // exactly one request: no retries on 4xx
        .mount(&server)
        .await;

    let err = client_for(&server).article(1).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(404)));
}

#[tokio::test]
async fn http_5xx_is_retried_until_success() {
    let server = MockServer::start().await;

    // First two attempts fail with 503, then the endpoint recovers.
    Mock::given(method("GET"))
        .and(path("/category/total"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/category/total"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope("7")))
        .mount(&server)
        .await;

    let total = client_for(&server).category_total().await.unwrap();
    assert_eq!(total, 7);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    // Just over the 2 MiB cap; the Content-Length fast path rejects it
    // before the body is buffered.
    let huge = "x".repeat(2 * 1024 * 1024 + 1);
    Mock::given(method("GET"))
        .and(path("/article/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(huge))
        .mount(&server)
        .await;

    let err = client_for(&server).article(1).await.unwrap_err();
    assert!(matches!(err, ApiError::ResponseTooLarge(_)));
}
