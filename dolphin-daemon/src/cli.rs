//! CLI argument definitions for dolphin-send.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.
//! Command-line values take precedence over environment variables,
//! which take precedence over the optional TOML file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

use dolphin_core::config::DolphinConfig;

/// Watches a Minecraft server log and sends chat, join/leave, advancement,
/// death and server status messages to an HTTP endpoint as JSON.
#[derive(Parser, Debug)]
#[command(name = "dolphin-send")]
#[command(version = concat!("version ", env!("CARGO_PKG_VERSION")))]
#[command(about, long_about = None, disable_version_flag = true)]
pub struct SendCli {
    /// Hostname to send Minecraft messages to.
    #[arg(short = 'a', long)]
    pub address: Option<String>,

    /// Port of the receiving server.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to the server log to watch.
    #[arg(short, long)]
    pub log: Option<PathBuf>,

    /// Print additional debugging messages.
    #[arg(long)]
    pub debug: bool,

    /// Print version information and exit.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Optional dolphin.toml configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log format (compact, json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate the merged configuration and exit without watching.
    #[arg(long)]
    pub validate: bool,
}

impl SendCli {
    /// Build the effective configuration.
    ///
    /// Layers, lowest to highest: defaults, `--config` file,
    /// `DOLPHIN_*` environment variables, command-line flags.
    /// The merged result is validated before it is returned.
    pub async fn load_config(&self) -> Result<DolphinConfig> {
        let mut config = match &self.config {
            Some(path) => DolphinConfig::load(path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?,
            None => {
                let mut config = DolphinConfig::default();
                config.apply_env_overrides();
                config
            }
        };

        self.apply_overrides(&mut config);

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;
        Ok(config)
    }

    /// Apply command-line values on top of an existing configuration.
    pub fn apply_overrides(&self, config: &mut DolphinConfig) {
        if let Some(address) = &self.address {
            config.delivery.host = address.clone();
        }
        if let Some(port) = self.port {
            config.delivery.port = port;
        }
        if let Some(log) = &self.log {
            config.watcher.log_path = log.display().to_string();
        }
        if let Some(format) = &self.log_format {
            config.general.log_format = format.clone();
        }
    }
}
