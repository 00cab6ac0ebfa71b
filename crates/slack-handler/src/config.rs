//! Handler configuration.
//!
//! Values are layered as command-line argument > environment variable >
//! compiled default by clap. Two more layers are applied once, before the
//! event is handled:
//!
//! 1. Per-event annotation overrides under [`ANNOTATION_KEYSPACE`]
//! 2. Deprecated `SENSU_SLACK_*` environment variables
//!
//! Deprecated values only replace settings still at their defaults, so they
//! are compared against the post-override values. After that the
//! [`HandlerConfig`] is frozen and only read.

use std::fmt;

use clap::Args;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::event::Event;
use crate::template::DEFAULT_TEMPLATE;

pub const DEFAULT_CHANNEL: &str = "#general";
pub const DEFAULT_USERNAME: &str = "sensu";
pub const DEFAULT_ICON_URL: &str = "https://www.sensu.io/img/sensu-logo.png";

/// Annotation prefix for per-event configuration overrides.
pub const ANNOTATION_KEYSPACE: &str = "sensu.io/plugins/slack/config";

const ENV_DEPRECATED_WEBHOOK_URL: &str = "SENSU_SLACK_WEBHOOK_URL";
const ENV_DEPRECATED_CHANNEL: &str = "SENSU_SLACK_CHANNEL";
const ENV_DEPRECATED_USERNAME: &str = "SENSU_SLACK_USERNAME";
const ENV_DEPRECATED_ICON_URL: &str = "SENSU_SLACK_ICON_URL";

/// Command-line and environment options.
#[derive(Debug, Clone, Args)]
pub struct HandlerArgs {
    /// The Sensu UI URL
    #[arg(short = 's', long = "ui-url", env = "SENSU_UI_URL")]
    pub ui_url: Option<String>,

    /// The webhook url to send messages to
    #[arg(
        short = 'w',
        long = "webhook-url",
        env = "SLACK_WEBHOOK_URL",
        hide_env_values = true
    )]
    pub webhook_url: Option<String>,

    /// The channel to post messages to
    #[arg(short, long, env = "SLACK_CHANNEL", default_value = DEFAULT_CHANNEL)]
    pub channel: String,

    /// The username that messages will be sent as
    #[arg(short, long, env = "SLACK_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// A URL to an image to use as the user avatar
    #[arg(short, long = "icon-url", env = "SLACK_ICON_URL", default_value = DEFAULT_ICON_URL)]
    pub icon_url: String,

    /// The Slack notification output template, in Handlebars format
    #[arg(
        short = 't',
        long = "description-template",
        env = "SLACK_DESCRIPTION_TEMPLATE",
        default_value = DEFAULT_TEMPLATE,
        hide_default_value = true
    )]
    pub description_template: String,

    /// The Slack notification will alert the channel with @channel
    #[arg(short = 'a', long = "alert-on-critical", env = "SLACK_ALERT_ON_CRITICAL")]
    pub alert_on_critical: bool,
}

/// Resolved handler settings.
#[derive(Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub webhook_url: String,
    pub ui_url: String,
    pub channel: String,
    pub username: String,
    pub icon_url: String,
    pub description_template: String,
    /// Accepted for compatibility; message assembly does not consult it.
    pub alert_on_critical: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            ui_url: String::new(),
            channel: DEFAULT_CHANNEL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            icon_url: DEFAULT_ICON_URL.to_string(),
            description_template: DEFAULT_TEMPLATE.to_string(),
            alert_on_critical: false,
        }
    }
}

impl fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let webhook = if self.webhook_url.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("HandlerConfig")
            .field("webhook_url", &webhook)
            .field("ui_url", &self.ui_url)
            .field("channel", &self.channel)
            .field("username", &self.username)
            .field("icon_url", &self.icon_url)
            .field("description_template", &self.description_template)
            .field("alert_on_critical", &self.alert_on_critical)
            .finish()
    }
}

impl From<HandlerArgs> for HandlerConfig {
    fn from(args: HandlerArgs) -> Self {
        Self {
            webhook_url: args.webhook_url.unwrap_or_default(),
            ui_url: args.ui_url.unwrap_or_default(),
            channel: args.channel,
            username: args.username,
            icon_url: args.icon_url,
            description_template: args.description_template,
            alert_on_critical: args.alert_on_critical,
        }
    }
}

impl HandlerConfig {
    /// Resolve the settings used for `event`: annotation overrides first,
    /// then the deprecated variables read through `lookup`.
    #[must_use]
    pub fn for_event<F>(self, event: &Event, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.with_annotation_overrides(event)
            .with_deprecated_env(lookup)
    }

    /// Apply the deprecated `SENSU_SLACK_*` variables from the process environment.
    #[must_use]
    pub fn with_process_env(self) -> Self {
        self.with_deprecated_env(|key| std::env::var(key).ok())
    }

    /// Apply deprecated variables read through `lookup`.
    ///
    /// A set webhook variable always wins. Channel, username and icon only
    /// replace values still at their compiled defaults. Empty values count as unset.
    #[must_use]
    pub fn with_deprecated_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(webhook) = get(ENV_DEPRECATED_WEBHOOK_URL) {
            debug!(variable = ENV_DEPRECATED_WEBHOOK_URL, "Using deprecated variable");
            self.webhook_url = webhook;
        }
        if let Some(channel) = get(ENV_DEPRECATED_CHANNEL) {
            if self.channel == DEFAULT_CHANNEL {
                debug!(variable = ENV_DEPRECATED_CHANNEL, "Using deprecated variable");
                self.channel = channel;
            }
        }
        if let Some(username) = get(ENV_DEPRECATED_USERNAME) {
            if self.username == DEFAULT_USERNAME {
                debug!(variable = ENV_DEPRECATED_USERNAME, "Using deprecated variable");
                self.username = username;
            }
        }
        if let Some(icon) = get(ENV_DEPRECATED_ICON_URL) {
            if self.icon_url == DEFAULT_ICON_URL {
                debug!(variable = ENV_DEPRECATED_ICON_URL, "Using deprecated variable");
                self.icon_url = icon;
            }
        }

        self
    }

    /// Apply `sensu.io/plugins/slack/config/<option>` annotations from `event`.
    ///
    /// Check annotations take precedence over entity annotations. The webhook
    /// URL is a secret and is never read from annotations.
    #[must_use]
    pub fn with_annotation_overrides(mut self, event: &Event) -> Self {
        let lookup = |option: &str| {
            let key = format!("{ANNOTATION_KEYSPACE}/{option}");
            event
                .check
                .metadata
                .annotations
                .get(&key)
                .or_else(|| event.entity.metadata.annotations.get(&key))
                .cloned()
        };

        let targets: [(&str, &mut String); 5] = [
            ("ui-url", &mut self.ui_url),
            ("channel", &mut self.channel),
            ("username", &mut self.username),
            ("icon-url", &mut self.icon_url),
            ("description-template", &mut self.description_template),
        ];
        for (option, field) in targets {
            if let Some(value) = lookup(option) {
                debug!(option, "Applying annotation override");
                *field = value;
            }
        }

        if let Some(value) = lookup("alert-on-critical") {
            match value.trim().parse::<bool>() {
                Ok(flag) => self.alert_on_critical = flag,
                Err(_) => warn!(
                    option = "alert-on-critical",
                    value = %value,
                    "Ignoring annotation override that is not a boolean"
                ),
            }
        }

        self
    }

    /// Ensure the required destinations are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_url.is_empty() {
            return Err(ConfigError::MissingWebhookUrl);
        }
        if self.ui_url.is_empty() {
            return Err(ConfigError::MissingUiUrl);
        }
        Ok(())
    }
}
