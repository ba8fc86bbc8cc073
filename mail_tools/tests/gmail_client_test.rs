use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mail_tools::gmail_integration::encode_raw_message;
use mail_tools::{AssistantError, GmailApiConfig, GmailClient, OutboundEmail};

const TOKEN: &str = "ya29.test-token";

fn client_for(server: &MockServer) -> GmailClient {
    GmailClient::new(
        reqwest::Client::new(),
        GmailApiConfig {
            api_base: format!("{}/gmail/v1", server.uri()),
            userinfo_uri: format!("{}/oauth2/v2/userinfo", server.uri()),
        },
    )
}

fn message_json(id: &str, from: &str, subject: &str, snippet: &str) -> serde_json::Value {
    json!({
        "id": id,
        "threadId": format!("t-{}", id),
        "snippet": snippet,
        "payload": {
            "mimeType": "text/plain",
            "headers": [
                {"name": "From", "value": from},
                {"name": "Subject", "value": subject}
            ],
            "body": {"size": 5, "data": "SGVsbG8="}
        }
    })
}

#[tokio::test]
async fn profile_is_reprojected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .and(header("Authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1234",
            "email": "ada@example.com",
            "verified_email": true,
            "name": "Ada Lovelace",
            "picture": "https://example.com/ada.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client_for(&server).get_profile(TOKEN).await.unwrap();
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert_eq!(profile.name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(profile.picture.as_deref(), Some("https://example.com/ada.png"));
}

#[tokio::test]
async fn profile_missing_fields_are_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "ada@example.com"})))
        .mount(&server)
        .await;

    let profile = client_for(&server).get_profile(TOKEN).await.unwrap();
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert!(profile.name.is_none());
    assert!(profile.picture.is_none());
}

#[tokio::test]
async fn profile_rejected_token_is_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/oauth2/v2/userinfo"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_token"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_profile(TOKEN).await.unwrap_err();
    assert!(matches!(err, AssistantError::Upstream { status: 401, .. }));
}

#[tokio::test]
async fn list_recent_fetches_each_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .and(query_param("maxResults", "5"))
        .and(header("Authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {"id": "m1", "threadId": "t1"},
                {"id": "m2", "threadId": "t2"}
            ],
            "resultSizeEstimate": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_json(
            "m1",
            "alice@example.com",
            "Quarterly numbers",
            &"a".repeat(150),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m2",
            "snippet": "short",
            "payload": {"headers": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let emails = client_for(&server).list_recent(TOKEN).await.unwrap();
    assert_eq!(emails.len(), 2);

    assert_eq!(emails[0].id, "m1");
    assert_eq!(emails[0].sender, "alice@example.com");
    assert_eq!(emails[0].subject, "Quarterly numbers");
    assert_eq!(emails[0].snippet.chars().count(), 100);

    assert_eq!(emails[1].id, "m2");
    assert_eq!(emails[1].sender, "Unknown");
    assert_eq!(emails[1].subject, "(No Subject)");
    assert_eq!(emails[1].snippet, "short");
}

#[tokio::test]
async fn list_recent_empty_mailbox() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resultSizeEstimate": 0})))
        .mount(&server)
        .await;

    let emails = client_for(&server).list_recent(TOKEN).await.unwrap();
    assert!(emails.is_empty());
}

#[tokio::test]
async fn list_recent_aborts_on_first_failed_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [{"id": "gone"}, {"id": "m2"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Requested entity was not found."))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gmail/v1/users/me/messages/m2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_json("m2", "a", "b", "c")))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).list_recent(TOKEN).await.unwrap_err();
    match err {
        AssistantError::Upstream { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Requested entity was not found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn send_posts_raw_message() {
    let server = MockServer::start().await;

    let email = OutboundEmail {
        to: "x@y.com".to_string(),
        subject: "S".to_string(),
        body: "B".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/messages/send"))
        .and(header("Authorization", "Bearer ya29.test-token"))
        .and(body_json(json!({"raw": encode_raw_message(&email)})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "sent-1", "labelIds": ["SENT"]})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).send(TOKEN, &email).await.unwrap();
}

#[tokio::test]
async fn send_non_200_keeps_raw_body() {
    let server = MockServer::start().await;

    let upstream_body = r#"{"error":{"code":400,"message":"Invalid To header"}}"#;
    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/messages/send"))
        .respond_with(ResponseTemplate::new(400).set_body_string(upstream_body))
        .mount(&server)
        .await;

    let email = OutboundEmail {
        to: "not-an-address".to_string(),
        subject: "S".to_string(),
        body: "B".to_string(),
    };
    let err = client_for(&server).send(TOKEN, &email).await.unwrap_err();
    assert_eq!(err.client_message(), upstream_body);
}

#[tokio::test]
async fn send_other_success_status_is_still_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/gmail/v1/users/me/messages/send"))
        .respond_with(ResponseTemplate::new(202).set_body_string("accepted"))
        .mount(&server)
        .await;

    let email = OutboundEmail {
        to: "x@y.com".to_string(),
        subject: "S".to_string(),
        body: "B".to_string(),
    };
    let err = client_for(&server).send(TOKEN, &email).await.unwrap_err();
    assert!(matches!(err, AssistantError::Upstream { status: 202, .. }));
}

#[tokio::test]
async fn delete_requires_204() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/gmail/v1/users/me/messages/m1"))
        .and(header("Authorization", "Bearer ya29.test-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/gmail/v1/users/me/messages/m2"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Insufficient Permission"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete(TOKEN, "m1").await.unwrap();

    let err = client.delete(TOKEN, "m2").await.unwrap_err();
    assert_eq!(err.client_message(), "Insufficient Permission");
}
