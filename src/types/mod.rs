//! Type definitions for the fraud rules pipeline

pub mod alert;
pub mod transaction;

pub use alert::{ErrorRecord, FraudAlert, FraudType, Outcome};
pub use transaction::Transaction;
