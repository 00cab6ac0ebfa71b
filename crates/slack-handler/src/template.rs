//! Description templates rendered with Handlebars.
//!
//! Templates see a fixed context rather than the raw event:
//!
//! - `check.name`, `check.namespace`, `check.status`, `check.occurrences`,
//!   `check.output`, `check.annotations.<key>`, `check.labels.<key>`
//! - `entity.name`, `entity.namespace`, `entity.annotations.<key>`,
//!   `entity.labels.<key>`
//! - `timestamp` (Unix seconds)
//!
//! Helpers on top of the Handlebars built-ins (`eq`, `or`, `lookup`, ...):
//!
//! - `{{unix_time timestamp}}` formats Unix seconds as `2006-01-02 15:04:05 +0000 UTC`
//! - `{{status_label check.status}}` yields `OK`, `WARNING`, `CRITICAL` or `UNKNOWN`

use chrono::DateTime;
use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::TemplateError;
use crate::event::{CheckStatus, Event};

/// Template used when none is configured.
///
/// The `\n` sequences are literal backslash-n and become newlines after rendering.
pub const DEFAULT_TEMPLATE: &str = r#"{{#if (eq check.status 0)}}:white_check_mark:{{else}}{{#if (eq check.occurrences 1)}}:warning:{{else}}:repeat:{{/if}}{{/if}} *{{status_label check.status}}* *<{{#if check.annotations.runbook_url}}{{check.annotations.runbook_url}}{{else}}https://sensu.io{{/if}}|{{check.name}}>* on {{entity.name}}\n_{{unix_time timestamp}}_\n{{check.output}}"#;

const TEMPLATE_NAME: &str = "description";

handlebars_helper!(unix_time: |secs: i64| {
    DateTime::from_timestamp(secs, 0)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S %z %Z").to_string())
        .unwrap_or_else(|| secs.to_string())
});

handlebars_helper!(status_label: |status: u64| {
    CheckStatus::from(u32::try_from(status).unwrap_or(u32::MAX)).label()
});

/// Values exposed to description templates.
#[derive(Debug, Serialize)]
pub struct TemplateContext<'a> {
    pub check: CheckContext<'a>,
    pub entity: EntityContext<'a>,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct CheckContext<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    pub status: u32,
    pub occurrences: i64,
    pub output: &'a str,
    pub annotations: &'a HashMap<String, String>,
    pub labels: &'a HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct EntityContext<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    pub annotations: &'a HashMap<String, String>,
    pub labels: &'a HashMap<String, String>,
}

impl<'a> From<&'a Event> for TemplateContext<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            check: CheckContext {
                name: &event.check.metadata.name,
                namespace: &event.check.metadata.namespace,
                status: event.check.status.code(),
                occurrences: event.check.occurrences,
                output: &event.check.output,
                annotations: &event.check.metadata.annotations,
                labels: &event.check.metadata.labels,
            },
            entity: EntityContext {
                name: &event.entity.metadata.name,
                namespace: &event.entity.metadata.namespace,
                annotations: &event.entity.metadata.annotations,
                labels: &event.entity.metadata.labels,
            },
            timestamp: event.timestamp,
        }
    }
}

/// A compiled description template.
pub struct DescriptionTemplate {
    registry: Handlebars<'static>,
}

impl DescriptionTemplate {
    /// Compile `source`, failing on malformed syntax.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();

        // Output is Slack mrkdwn, not HTML
        registry.register_escape_fn(no_escape);
        registry.set_strict_mode(false);

        registry.register_helper("unix_time", Box::new(unix_time));
        registry.register_helper("status_label", Box::new(status_label));

        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(|e| TemplateError::Compile(Box::new(e)))?;

        Ok(Self { registry })
    }

    /// Evaluate against `event`. Literal `\n` sequences are left untouched.
    pub fn render(&self, event: &Event) -> Result<String, TemplateError> {
        let context = TemplateContext::from(event);
        Ok(self.registry.render(TEMPLATE_NAME, &context)?)
    }
}

/// Turns escaped `\n` sequences into real newlines.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Best-effort rendering: any template failure yields an empty description.
#[must_use]
pub fn render_description(source: &str, event: &Event) -> String {
    let rendered = DescriptionTemplate::compile(source).and_then(|template| template.render(event));

    match rendered {
        Ok(text) => {
            debug!(length = text.len(), "Description template rendered");
            normalize_newlines(&text)
        }
        Err(e) => {
            warn!(error = %e, "Template rendering failed, sending empty description");
            String::new()
        }
    }
}
