//! Configuration management for the fraud rules pipeline

use crate::error::ConfigError;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub rules: RulesConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming transactions
    pub transaction_subject: String,
    /// Subject for outgoing fraud alerts and error records
    pub alert_subject: String,
}

/// Parameters for the built-in rule set
#[derive(Debug, Clone, Deserialize)]
pub struct RulesConfig {
    /// Amounts strictly above this value trigger the high-amount rule.
    #[serde(default = "default_high_amount_threshold")]
    pub high_amount_threshold: f64,
    /// Merchants matched (case-sensitively) by the suspicious-merchant rule
    #[serde(default = "default_suspicious_merchants")]
    pub suspicious_merchants: Vec<String>,
    /// Location sentinel matched by the unusual-location rule
    #[serde(default = "default_unusual_location")]
    pub unusual_location: String,
}

fn default_high_amount_threshold() -> f64 {
    3000.0
}

fn default_suspicious_merchants() -> Vec<String> {
    vec!["Unknown_Merchant".to_string(), "Suspicious_Store".to_string()]
}

fn default_unusual_location() -> String {
    "International".to_string()
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of records processed concurrently
    pub workers: usize,
    /// How many raw records to log at startup for inspection
    #[serde(default = "default_sample_log_count")]
    pub sample_log_count: usize,
}

fn default_sample_log_count() -> usize {
    3
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Check invariants that must hold before any record is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if !self.rules.high_amount_threshold.is_finite() || self.rules.high_amount_threshold < 0.0
        {
            return Err(ConfigError::InvalidThreshold(
                self.rules.high_amount_threshold,
            ));
        }
        if self.rules.unusual_location.is_empty() {
            return Err(ConfigError::EmptyLocationSentinel);
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                transaction_subject: "transactions".to_string(),
                alert_subject: "fraud.alerts".to_string(),
            },
            rules: RulesConfig::default(),
            pipeline: PipelineConfig {
                workers: 4,
                sample_log_count: default_sample_log_count(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            high_amount_threshold: default_high_amount_threshold(),
            suspicious_merchants: default_suspicious_merchants(),
            unusual_location: default_unusual_location(),
        }
    }
}
