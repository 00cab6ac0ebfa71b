//! Delivery channels for assembled messages.

pub mod slack;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::message::WebhookMessage;

/// A destination that accepts one webhook message per call.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel.
    fn name(&self) -> &'static str;

    /// Deliver `message` once. No retries.
    async fn send(&self, message: &WebhookMessage) -> Result<(), DeliveryError>;
}
