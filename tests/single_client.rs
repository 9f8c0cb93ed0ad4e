//! End-to-end tests for the sequential client against a mock HTTP server.

use std::time::Duration;

use indexmap::IndexMap;
use mockito::Matcher;

use apiwire::{ApiError, ClientConfig, HttpClient, Payload, SingleClient};

#[tokio::test]
async fn get_decodes_a_json_payload() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/users/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"id\":1}")
        .create_async()
        .await;

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_get("/users/1", &[], IndexMap::new(), None)
        .await
        .unwrap();

    assert_eq!(outcome.response.status, 200);
    assert_eq!(
        outcome.response.headers["content-type"],
        "application/json"
    );
    assert_eq!(
        outcome.extract_payload().unwrap(),
        serde_json::json!({"id": 1})
    );
}

#[tokio::test]
async fn default_headers_reach_the_server() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/ping")
        .match_header("accept", "application/json")
        .match_header("user-agent", Matcher::Regex("^apiwire/".to_string()))
        .match_header("keep-alive", "300")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_get("/ping", &[], IndexMap::new(), None)
        .await
        .unwrap();
    assert_eq!(outcome.response.status, 200);
}

#[tokio::test]
async fn config_overrides_user_agent_and_adds_default_headers() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/ping")
        .match_header("user-agent", "acme-sdk/2.1")
        .match_header("x-api-key", "k123")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let mut extra = IndexMap::new();
    extra.insert("X-Api-Key".to_string(), "k123".to_string());
    let config = ClientConfig {
        user_agent: Some("acme-sdk/2.1".to_string()),
        connect_timeout: Some(Duration::from_secs(5)),
        default_headers: extra,
        ..ClientConfig::default()
    };

    let mut client = SingleClient::with_config(server.url(), config).unwrap();
    let outcome = client
        .http_get("/ping", &[], IndexMap::new(), None)
        .await
        .unwrap();
    assert_eq!(outcome.response.status, 200);
    assert_eq!(outcome.request.headers["User-Agent"], "acme-sdk/2.1");
}

#[tokio::test]
async fn post_forces_the_supplied_content_type() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/items")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({"a": 1})))
        .with_status(201)
        .with_body("{\"created\":true}")
        .create_async()
        .await;

    let mut headers = IndexMap::new();
    headers.insert("Content-Type".to_string(), "text/plain".to_string());

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_post(
            "/items",
            "application/json",
            &[],
            Payload::Json(serde_json::json!({"a": 1})),
            headers,
            None,
        )
        .await
        .unwrap();

    // The caller-supplied Content-Type lost to the forced one.
    assert_eq!(outcome.request.headers["Content-Type"], "application/json");
    assert_eq!(
        outcome.extract_payload().unwrap(),
        serde_json::json!({"created": true})
    );
}

#[tokio::test]
async fn post_form_payload_is_form_encoded() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/forms")
        .match_body("a=1&b=2")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let mut fields = IndexMap::new();
    fields.insert("a".to_string(), "1".to_string());
    fields.insert("b".to_string(), "2".to_string());

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_post(
            "/forms",
            "application/x-www-form-urlencoded",
            &[],
            Payload::Form(fields),
            IndexMap::new(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome.response.status, 200);
}

#[tokio::test]
async fn put_scalar_payload_is_sent_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("PUT", "/notes/7")
        .match_body("plain text")
        .with_status(204)
        .create_async()
        .await;

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_put(
            "/notes/7",
            "text/plain",
            &[],
            Payload::Text("plain text".to_string()),
            IndexMap::new(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.response.status, 204);
    assert_eq!(outcome.extract_payload().unwrap(), serde_json::json!({}));
}

#[tokio::test]
async fn query_parameters_are_encoded_onto_the_url() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded("q".to_string(), "rust http".to_string()))
        .with_status(200)
        .with_body("{\"hits\":[]}")
        .create_async()
        .await;

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_get("/search", &[("q", "rust http")], IndexMap::new(), None)
        .await
        .unwrap();
    assert_eq!(
        outcome.extract_payload().unwrap(),
        serde_json::json!({"hits": []})
    );
}

#[tokio::test]
async fn delete_of_a_missing_resource_fails_extraction() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("DELETE", "/users/404")
        .with_status(404)
        .with_body("no such user")
        .create_async()
        .await;

    let mut client = SingleClient::new(server.url());
    let outcome = client
        .http_delete("/users/404", &[], IndexMap::new(), None)
        .await
        .unwrap();

    match outcome.extract_payload() {
        Err(ApiError::CallFailed {
            request,
            status,
            body,
        }) => {
            assert!(request.url.ends_with("/users/404"));
            assert_eq!(status, 404);
            assert_eq!(body, "no such user");
        }
        other => panic!("expected CallFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // Nothing listens on the discard port.
    let mut client = SingleClient::new("http://127.0.0.1:9");
    let err = client
        .http_get(
            "/anything",
            &[],
            IndexMap::new(),
            Some(Duration::from_secs(5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::TransportFailure(_)));
}
