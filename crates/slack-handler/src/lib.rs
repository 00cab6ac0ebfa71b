//! Sensu handler that posts event notifications to Slack.
//!
//! One event in, one webhook POST out. The event is reduced to a single
//! Slack attachment: a colored bar keyed by check status, a templated
//! description, a plain-text fallback and a "View in Sensu" button.
//!
//! # Usage
//!
//! ```no_run
//! use slack_handler::{Event, HandlerConfig, SlackHandler};
//!
//! # async fn run(event: Event) -> Result<(), slack_handler::HandlerError> {
//! let config = HandlerConfig {
//!     webhook_url: "https://hooks.slack.com/services/T000/B000/XXXX".to_string(),
//!     ui_url: "https://sensu.example.com".to_string(),
//!     ..HandlerConfig::default()
//! };
//!
//! let handler = SlackHandler::new(config);
//! handler.validate(&event)?;
//! handler.execute(&event).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`format`] derives action, summary, color and deep link from an event
//! - [`template`] renders the configurable description with Handlebars
//! - [`message`] assembles the webhook payload
//! - [`NotifyChannel`] delivers it; [`SlackChannel`] posts to the webhook

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod message;
pub mod template;

pub use channels::slack::{deliver, SlackChannel};
pub use channels::NotifyChannel;
pub use config::{HandlerArgs, HandlerConfig};
pub use error::{ConfigError, DeliveryError, EventError, HandlerError, TemplateError};
pub use event::{CheckStatus, Event};
pub use message::WebhookMessage;

use tracing::debug;

/// Validates configuration and delivers one event.
pub struct SlackHandler {
    config: HandlerConfig,
    channel: Box<dyn NotifyChannel>,
}

impl SlackHandler {
    /// Handler posting to `config.webhook_url`.
    #[must_use]
    pub fn new(config: HandlerConfig) -> Self {
        let channel = SlackChannel::new(config.webhook_url.clone());
        Self::with_channel(config, Box::new(channel))
    }

    /// Handler delivering through a custom channel.
    #[must_use]
    pub fn with_channel(config: HandlerConfig, channel: Box<dyn NotifyChannel>) -> Self {
        Self { config, channel }
    }

    /// Settings this handler was built with.
    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Check configuration and event before any network activity.
    pub fn validate(&self, event: &Event) -> Result<(), ConfigError> {
        self.config.validate()?;
        Ok(event.validate()?)
    }

    /// Build the message for `event` and deliver it once.
    pub async fn execute(&self, event: &Event) -> Result<(), DeliveryError> {
        let message = message::build(&self.config, event);

        debug!(
            channel = self.channel.name(),
            event = %format::event_key(event),
            status = event.check.status.code(),
            "Sending notification"
        );

        self.channel.send(&message).await?;

        debug!(destination = %self.config.channel, "Notification delivered");
        Ok(())
    }

    /// `validate` then `execute`.
    pub async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.validate(event)?;
        self.execute(event).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingChannel {
        sent: Arc<Mutex<Vec<WebhookMessage>>>,
    }

    #[async_trait]
    impl NotifyChannel for RecordingChannel {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, message: &WebhookMessage) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn config() -> HandlerConfig {
        HandlerConfig {
            webhook_url: "http://example.com/webhook".to_string(),
            ui_url: "http://example.com/ui".to_string(),
            channel: "#ops".to_string(),
            ..HandlerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_handle_delivers_one_message() {
        let channel = RecordingChannel::default();
        let sent = Arc::clone(&channel.sent);
        let handler = SlackHandler::with_channel(config(), Box::new(channel));

        let mut event = Event::fixture("entity1", "check1");
        event.check.status = CheckStatus::Warning;
        handler.handle(&event).await.unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].channel, "#ops");
        assert_eq!(sent[0].attachments[0].color, "#ffcc00");
        assert_eq!(
            sent[0].attachments[0].actions[0].url,
            "http://example.com/ui/n/default/events/entity1/check1"
        );
    }

    #[tokio::test]
    async fn test_handle_stops_on_config_error() {
        let channel = RecordingChannel::default();
        let sent = Arc::clone(&channel.sent);
        let config = HandlerConfig {
            ui_url: String::new(),
            ..config()
        };
        let handler = SlackHandler::with_channel(config, Box::new(channel));

        let err = handler
            .handle(&Event::fixture("entity1", "check1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HandlerError::Config(ConfigError::MissingUiUrl)
        ));
        assert!(sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_nameless_event() {
        let handler = SlackHandler::new(config());
        let err = handler.validate(&Event::fixture("", "check1")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEvent(EventError::MissingEntityName)
        ));
        assert_eq!(err.to_string(), "invalid event: entity name must not be empty");
    }
}
