//! Pure formatting of event fields into message fragments.

use crate::event::{CheckStatus, Event};

/// Truncation length used for the plain-text fallback.
pub const FALLBACK_SUMMARY_LENGTH: usize = 100;

const ELLIPSIS: &str = "...";

/// "RESOLVED" for a passing check, "ALERT" for everything else.
#[must_use]
pub fn action(event: &Event) -> &'static str {
    match event.check.status {
        CheckStatus::Ok => "RESOLVED",
        _ => "ALERT",
    }
}

/// Strips trailing `\n` and `\r` characters, leaving interior content alone.
#[must_use]
pub fn trim_trailing_line_endings(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// `<entity>/<check>`
#[must_use]
pub fn event_key(event: &Event) -> String {
    format!("{}/{}", event.entity_name(), event.check_name())
}

/// `<entity>/<check>:<output>` with the output cut to `max_length` characters.
///
/// The length test runs against the raw output while the slice is taken from
/// the trimmed output, so an output padded with line endings past the limit
/// gets an ellipsis even when its trimmed form would fit.
#[must_use]
pub fn summary(event: &Event, max_length: usize) -> String {
    let raw = event.check.output.as_str();
    let trimmed = trim_trailing_line_endings(raw);

    let output = if raw.chars().count() > max_length {
        let mut cut: String = trimmed.chars().take(max_length).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        trimmed.to_string()
    };

    format!("{}:{output}", event_key(event))
}

#[must_use]
pub fn color(event: &Event) -> &'static str {
    event.check.status.color()
}

/// Link to the event page in the Sensu web UI.
#[must_use]
pub fn deep_link(event: &Event, ui_base_url: &str) -> String {
    format!(
        "{ui_base_url}/n/{}/events/{}/{}",
        event.namespace(),
        event.entity_name(),
        event.check_name()
    )
}

/// Plain-text rendering for clients that cannot show attachments.
#[must_use]
pub fn fallback_message(event: &Event) -> String {
    format!(
        "{} - {}",
        action(event),
        summary(event, FALLBACK_SUMMARY_LENGTH)
    )
}
