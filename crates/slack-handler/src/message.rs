//! Slack incoming-webhook payload and its assembly from an event.

use serde::Serialize;

use crate::config::HandlerConfig;
use crate::event::Event;
use crate::format;
use crate::template;

/// Label of the single attachment button.
pub const VIEW_BUTTON_TEXT: &str = "View in Sensu";

// =============================================================================
// Slack API types
// =============================================================================

/// Body posted to an incoming webhook. Field order is part of the wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    pub replace_original: bool,
    pub delete_original: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub color: String,
    pub fallback: String,
    pub text: String,
    pub actions: Vec<AttachmentAction>,
    pub mrkdwn_in: Vec<String>,
    /// Always serialized as `null`; block kit content is never attached.
    pub blocks: Option<()>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentAction {
    pub name: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl WebhookMessage {
    /// Serialize to the exact bytes the webhook receives.
    ///
    /// `<`, `>`, `&`, U+2028 and U+2029 are written as `\uXXXX` escapes. Those
    /// characters can only occur inside JSON strings, so rewriting them after
    /// serialization is safe.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(escape_html_in_json(&json))
    }
}

fn escape_html_in_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            other => escaped.push(other),
        }
    }
    escaped
}

// =============================================================================
// Assembly
// =============================================================================

/// Build the single attachment describing `event`.
#[must_use]
pub fn attachment(config: &HandlerConfig, event: &Event) -> Attachment {
    Attachment {
        color: format::color(event).to_string(),
        fallback: format::fallback_message(event),
        text: template::render_description(&config.description_template, event),
        actions: vec![AttachmentAction {
            name: String::new(),
            text: VIEW_BUTTON_TEXT.to_string(),
            kind: "button".to_string(),
            url: format::deep_link(event, &config.ui_url),
        }],
        mrkdwn_in: vec!["text".to_string()],
        blocks: None,
    }
}

/// Build the full webhook body for `event`.
#[must_use]
pub fn build(config: &HandlerConfig, event: &Event) -> WebhookMessage {
    WebhookMessage {
        username: config.username.clone(),
        icon_url: config.icon_url.clone(),
        channel: config.channel.clone(),
        attachments: vec![attachment(config, event)],
        replace_original: false,
        delete_original: false,
    }
}
