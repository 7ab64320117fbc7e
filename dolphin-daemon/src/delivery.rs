//! Delivery stage -- POSTs each classified message to the configured receiver.
//!
//! The stage is the single consumer of the watcher channel. Every failure
//! (serialization or network) is logged and the message is dropped; there is
//! no retry. A non-2xx status is not treated as a failure.

use std::time::Duration;

use anyhow::Result;
use reqwest::header::CONTENT_TYPE;
use tokio::sync::mpsc;

use dolphin_core::config::DeliveryConfig;
use dolphin_core::error::DeliveryError;
use dolphin_core::event::MinecraftMessage;
use dolphin_core::metrics as m;
use dolphin_core::pipeline::MessageSink;

/// HTTP sink posting messages as JSON to `http://{host}:{port}`.
#[derive(Clone)]
pub struct HttpSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSink {
    /// Build a sink from the `[delivery]` section.
    ///
    /// A `timeout_secs` of 0 disables the request timeout.
    pub fn new(config: &DeliveryConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    /// Destination URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl MessageSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn deliver(&self, message: &MinecraftMessage) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(message)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Request {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!(status = response.status().as_u16(), "POST response");
        Ok(())
    }
}

/// Consume messages until the channel closes.
///
/// Returns the number of messages delivered successfully.
pub async fn run_delivery<S: MessageSink>(
    mut rx: mpsc::Receiver<MinecraftMessage>,
    sink: S,
) -> u64 {
    let mut delivered: u64 = 0;

    while let Some(message) = rx.recv().await {
        tracing::debug!(sink = sink.name(), message = %message, "sending a message from Minecraft");

        match sink.deliver(&message).await {
            Ok(()) => {
                delivered += 1;
                metrics::counter!(m::DELIVERY_MESSAGES_SENT_TOTAL).increment(1);
            }
            Err(e) => {
                tracing::error!(sink = sink.name(), error = %e, "failed to deliver message");
                metrics::counter!(m::DELIVERY_FAILURES_TOTAL).increment(1);
            }
        }
    }

    tracing::debug!(delivered, "message channel closed, delivery stage finished");
    delivered
}
