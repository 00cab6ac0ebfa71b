//! Error types for the Slack handler.

use thiserror::Error;

/// Configuration problems detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No webhook URL from argument, environment or deprecated environment
    #[error("--webhook-url or SLACK_WEBHOOK_URL environment variable is required")]
    MissingWebhookUrl,

    /// No Sensu UI base URL
    #[error("--ui-url or SENSU_UI_URL environment variable is required")]
    MissingUiUrl,

    /// Event is structurally unusable
    #[error("invalid event: {0}")]
    InvalidEvent(#[from] EventError),
}

/// Structural problems in an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("entity name must not be empty")]
    MissingEntityName,

    #[error("check name must not be empty")]
    MissingCheckName,
}

/// Errors that can occur when posting to the webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("Failed to send Slack message: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Webhook answered with a non-success status
    #[error("Failed to send Slack message: Slack returned {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Errors from compiling or evaluating a description template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template syntax is malformed
    #[error("Error compiling template: {0}")]
    Compile(#[from] Box<handlebars::TemplateError>),

    /// Evaluation against the event failed
    #[error("Error processing template: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Any failure surfaced to the harness.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}
