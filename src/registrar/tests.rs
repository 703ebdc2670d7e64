//! GoDaddy client tests with HTTP mocking.

use super::{target_name, GoDaddyClient, RegistrarClient};
use crate::error::DdnsError;
use std::net::Ipv4Addr;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> GoDaddyClient {
    GoDaddyClient::with_base_url(
        "api-key".to_string(),
        "api-secret".to_string(),
        server.uri(),
    )
}

#[tokio::test]
async fn test_get_record_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/A/www"))
        .and(header("Authorization", "sso-key api-key:api-secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{"data": "1.1.1.1", "ttl": 600}])),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client.get_record("example.com", "www").await.unwrap();

    let record = record.expect("record should exist");
    assert_eq!(record.ipv4(), Some(Ipv4Addr::new(1, 1, 1, 1)));
    assert_eq!(record.ttl, 600);
}

#[tokio::test]
async fn test_get_record_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/A/@"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let record = client.get_record("example.com", "@").await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn test_get_record_auth_failure_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/domains/example.com/records/A/@"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"code":"UNABLE_TO_AUTHENTICATE"}"#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_record("example.com", "@").await.unwrap_err();

    match err {
        DdnsError::Registrar { target, status, body } => {
            assert_eq!(target, "example.com");
            assert_eq!(status, 401);
            assert!(body.contains("UNABLE_TO_AUTHENTICATE"));
        }
        other => panic!("expected Registrar error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_put_record_sends_json_array_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/domains/example.com/records/A/www"))
        .and(header("Authorization", "sso-key api-key:api-secret"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!([{"data": "5.6.7.8", "ttl": 600}])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .put_record("example.com", "www", Ipv4Addr::new(5, 6, 7, 8), 600)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_put_record_failure_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/domains/example.com/records/A/@"))
        .respond_with(ResponseTemplate::new(422).set_body_string("record rejected"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .put_record("example.com", "@", Ipv4Addr::new(5, 6, 7, 8), 600)
        .await
        .unwrap_err();

    match err {
        DdnsError::Registrar { status, body, .. } => {
            assert_eq!(status, 422);
            assert_eq!(body, "record rejected");
        }
        other => panic!("expected Registrar error, got {:?}", other),
    }
}

#[test]
fn test_target_name_apex() {
    assert_eq!(target_name("example.com", "@"), "example.com");
}

#[test]
fn test_target_name_subdomain() {
    assert_eq!(target_name("example.com", "www"), "www.example.com");
}
