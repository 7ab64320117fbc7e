//! Process orchestration -- wiring, lifecycle and shutdown.
//!
//! The [`Orchestrator`] connects the watch pipeline (producer) to the
//! delivery stage (consumer) through a bounded channel and runs until a
//! shutdown signal arrives or the watcher fails.
//!
//! # Shutdown Order
//!
//! 1. Watch pipeline (stop reading, release the log file)
//! 2. Channel sender dropped
//! 3. Delivery stage drains what is left and exits

use std::future::Future;

use anyhow::Result;
use tokio::sync::mpsc;

use dolphin_core::config::DolphinConfig;
use dolphin_core::event::MinecraftMessage;
use dolphin_core::pipeline::{MessageSink, Pipeline};
use dolphin_log_watcher::{WatchConfig, WatchPipeline, WatchPipelineBuilder};

use crate::delivery::{HttpSink, run_delivery};
use crate::metrics_server;

/// The main process orchestrator.
pub struct Orchestrator<S: MessageSink + 'static = HttpSink> {
    config: DolphinConfig,
    pipeline: WatchPipeline,
    message_rx: mpsc::Receiver<MinecraftMessage>,
    sink: S,
}

impl Orchestrator<HttpSink> {
    /// Build from an already-merged configuration, delivering over HTTP.
    ///
    /// Installs the metrics recorder when `[metrics] enabled = true`.
    pub fn build_from_config(config: DolphinConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let sink = HttpSink::new(&config.delivery)?;
        tracing::info!(endpoint = sink.endpoint(), "delivering messages over HTTP");

        Self::with_sink(config, sink)
    }
}

impl<S: MessageSink + 'static> Orchestrator<S> {
    /// Build with a custom delivery sink.
    pub fn with_sink(config: DolphinConfig, sink: S) -> Result<Self> {
        let watch_config = WatchConfig::from_core(&config.watcher);
        let (pipeline, message_rx) = WatchPipelineBuilder::new()
            .config(watch_config)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build watch pipeline: {}", e))?;
        let message_rx =
            message_rx.ok_or_else(|| anyhow::anyhow!("watch pipeline returned no receiver"))?;

        tracing::debug!(
            channel_capacity = config.watcher.channel_capacity,
            sink = sink.name(),
            "orchestrator initialized"
        );

        Ok(Self {
            config,
            pipeline,
            message_rx,
            sink,
        })
    }

    /// Get a reference to the loaded configuration.
    pub fn config(&self) -> &DolphinConfig {
        &self.config
    }

    /// Run until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<()> {
        self.run_until(wait_for_shutdown_signal()).await
    }

    /// Run until `shutdown` resolves or the watcher stops on its own.
    ///
    /// Returns an error if the watcher cannot start, fails while running,
    /// or fails to stop.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = Result<&'static str>>,
    {
        let Self {
            mut pipeline,
            message_rx,
            sink,
            ..
        } = self;

        pipeline
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start log watcher: {}", e))?;

        let delivery_task = tokio::spawn(run_delivery(message_rx, sink));

        let mut failed = false;
        let watcher_running = tokio::select! {
            signal = shutdown => {
                match signal {
                    Ok(signal) => tracing::info!(signal, "shutdown signal received"),
                    Err(e) => {
                        tracing::error!(error = %e, "signal handling failed, shutting down");
                        failed = true;
                    }
                }
                true
            }
            result = pipeline.wait() => {
                match result {
                    Ok(sent) => tracing::error!(messages = sent, "log watcher stopped unexpectedly"),
                    Err(e) => tracing::error!(error = %e, "log watcher failed"),
                }
                failed = true;
                false
            }
        };

        let health = pipeline.health_check().await;
        if watcher_running {
            tracing::debug!(%health, "closing log watcher");
            if let Err(e) = pipeline.stop().await {
                tracing::error!(error = %e, "error while closing log watcher");
                failed = true;
            }
        } else {
            tracing::error!(%health, "log watcher is no longer running");
        }

        // Dropping the pipeline releases the last sender so delivery can drain.
        drop(pipeline);
        match delivery_task.await {
            Ok(delivered) => tracing::debug!(delivered, "delivery stage stopped"),
            Err(e) => {
                tracing::error!(error = %e, "delivery task panicked");
                failed = true;
            }
        }

        if failed {
            return Err(anyhow::anyhow!("dolphin sender did not shut down cleanly"));
        }

        tracing::info!("dolphin sender shut down successfully");
        Ok(())
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Returns the name of the signal that triggered the shutdown.
async fn wait_for_shutdown_signal() -> Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}
