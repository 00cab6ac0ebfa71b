//! Integration tests for posting to a Slack webhook.
//!
//! A wiremock server stands in for the Slack endpoint and captures the exact
//! request body.

use slack_handler::{
    deliver, message, CheckStatus, DeliveryError, Event, HandlerConfig, HandlerError,
    SlackHandler,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE_TEMPLATE: &str = r#"{{#if (eq check.status 0)}}:white_check_mark:{{else}}{{#if (eq check.occurrences 1)}}:warning:{{else}}:repeat:{{/if}}{{/if}} *{{status_label check.status}}* *<{{#if check.annotations.runbook_url}}{{check.annotations.runbook_url}}{{else}}https://sensu.io{{/if}}|{{check.name}}>* on {{entity.name}}\n_0000-00-00 00:00_\n{{check.output}}"#;

/// Reference payload for a resolved fixture event posted to `#test`.
const EXPECTED_BODY: &str = r##"{"channel":"#test","attachments":[{"color":"#36a64f","fallback":"RESOLVED - entity1/check1:","text":":white_check_mark: *OK* *\u003chttps://sensu.io|check1\u003e* on entity1\n_0000-00-00 00:00_\n","actions":[{"name":"","text":"View in Sensu","type":"button","url":"/n/default/events/entity1/check1"}],"mrkdwn_in":["text"],"blocks":null}],"replace_original":false,"delete_original":false}"##;

// =============================================================================
// Helpers
// =============================================================================

async fn start_webhook(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn fixture_config(server: &MockServer) -> HandlerConfig {
    HandlerConfig {
        webhook_url: format!("{}/hook", server.uri()),
        ui_url: String::new(),
        channel: "#test".to_string(),
        username: String::new(),
        icon_url: String::new(),
        description_template: FIXTURE_TEMPLATE.to_string(),
        alert_on_critical: false,
    }
}

async fn received_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    String::from_utf8(requests[0].body.clone()).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_send_message_matches_reference_payload() {
    let server = start_webhook(200, r#"{"ok": true}"#).await;
    let handler = SlackHandler::new(fixture_config(&server));

    handler
        .execute(&Event::fixture("entity1", "check1"))
        .await
        .unwrap();

    assert_eq!(received_body(&server).await, EXPECTED_BODY);
}

#[tokio::test]
async fn test_deliver_posts_prebuilt_message() {
    let server = start_webhook(200, "ok").await;
    let config = fixture_config(&server);
    let payload = message::build(&config, &Event::fixture("entity1", "check1"));

    deliver(&payload, &config.webhook_url).await.unwrap();

    assert_eq!(received_body(&server).await, EXPECTED_BODY);
}

#[tokio::test]
async fn test_rejected_webhook_is_delivery_error() {
    let server = start_webhook(404, "no_service").await;
    let handler = SlackHandler::new(fixture_config(&server));

    let err = handler
        .execute(&Event::fixture("entity1", "check1"))
        .await
        .unwrap_err();

    match err {
        DeliveryError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "no_service");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_webhook_is_http_error() {
    let server = MockServer::start().await;
    let config = HandlerConfig {
        webhook_url: "http://127.0.0.1:9/hook".to_string(),
        ..fixture_config(&server)
    };
    let handler = SlackHandler::new(config);

    let err = handler
        .execute(&Event::fixture("entity1", "check1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DeliveryError::Http(_)), "{err:?}");
}

#[tokio::test]
async fn test_malformed_template_still_delivers() {
    let server = start_webhook(200, "ok").await;
    let config = HandlerConfig {
        description_template: "{{#if check.status}}never closed".to_string(),
        ..fixture_config(&server)
    };
    let handler = SlackHandler::new(config);

    let mut event = Event::fixture("entity1", "check1");
    event.check.status = CheckStatus::Critical;
    event.check.output = "disk is full\n".to_string();
    handler.execute(&event).await.unwrap();

    let body: serde_json::Value = serde_json::from_str(&received_body(&server).await).unwrap();
    let attachment = &body["attachments"][0];
    assert_eq!(attachment["text"], "");
    assert_eq!(attachment["color"], "#ff0000");
    assert_eq!(attachment["fallback"], "ALERT - entity1/check1:disk is full");
}

#[tokio::test]
async fn test_handle_skips_network_when_invalid() {
    let server = MockServer::start().await;
    let config = HandlerConfig {
        webhook_url: String::new(),
        ..fixture_config(&server)
    };
    let handler = SlackHandler::new(config);

    let err = handler
        .handle(&Event::fixture("entity1", "check1"))
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::Config(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
