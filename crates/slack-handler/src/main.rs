//! Sensu Slack handler.
//!
//! Reads a Sensu event as JSON on stdin and posts it to a Slack webhook.
//! Run `sensu-slack-handler --help` for options.

// CLI binaries legitimately need println! for user output
#![allow(clippy::disallowed_macros)]

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use slack_handler::{Event, HandlerArgs, HandlerConfig, SlackHandler};

#[derive(Parser)]
#[command(name = "sensu-slack-handler")]
#[command(about = "The Sensu Go Slack handler for notifying a channel")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    handler: HandlerArgs,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the confirmation line
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read event from stdin")?;
    let event: Event = serde_json::from_str(&input).context("failed to parse event from stdin")?;

    let config =
        HandlerConfig::from(cli.handler).for_event(&event, |key| std::env::var(key).ok());
    debug!(?config, "Resolved configuration");

    let handler = SlackHandler::new(config);
    handler.validate(&event)?;
    handler.execute(&event).await?;

    println!(
        "Notification sent to Slack channel {}",
        handler.config().channel
    );
    Ok(())
}
