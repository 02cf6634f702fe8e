//! Fraud Rules Pipeline Library
//!
//! A real-time fraud detection pipeline that fans every incoming transaction
//! out across a set of independent, stateless rules and merges the per-rule
//! alert streams into one outcome stream.

pub mod config;
pub mod consumer;
pub mod error;
pub mod metrics;
pub mod producer;
pub mod router;
pub mod rules;
pub mod synthesizer;
pub mod types;

pub use config::AppConfig;
pub use consumer::TransactionConsumer;
pub use producer::AlertProducer;
pub use router::FanOutRouter;
pub use rules::FraudRule;
pub use synthesizer::AlertSynthesizer;
pub use types::{ErrorRecord, FraudAlert, FraudType, Outcome, Transaction};
