//! Fraud alert, error record, and the outcome union emitted by the pipeline

use crate::error::MalformedRecord;
use crate::types::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fraud pattern identity stamped on an alert.
///
/// The three built-in variants serialize to the wire names understood by
/// downstream consumers (`HIGH_AMOUNT_FRAUD`, ...). `Other` carries the
/// fraud type of an externally registered rule verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FraudType {
    HighAmountFraud,
    MerchantFraud,
    LocationFraud,
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for FraudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FraudType::HighAmountFraud => f.write_str("HIGH_AMOUNT_FRAUD"),
            FraudType::MerchantFraud => f.write_str("MERCHANT_FRAUD"),
            FraudType::LocationFraud => f.write_str("LOCATION_FRAUD"),
            FraudType::Other(name) => f.write_str(name),
        }
    }
}

/// Fraud alert generated when a transaction matches a rule.
///
/// Self-contained snapshot: the triggering transaction is embedded in full
/// for audit, and no alert references another alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAlert {
    /// Unique alert identifier, generated at synthesis time
    pub alert_id: String,

    /// Identifier of the triggering transaction
    pub transaction_id: String,

    /// User the triggering transaction belongs to
    pub user_id: String,

    /// Which fraud pattern matched
    pub fraud_type: FraudType,

    /// Severity estimate, always within [0, 100]
    pub risk_score: f64,

    /// Human-readable explanation derived from the fraud type and
    /// transaction fields
    pub reason: String,

    /// Timestamp copied from the triggering transaction (epoch millis)
    pub timestamp: i64,

    /// Full copy of the triggering transaction
    pub original_transaction: Transaction,
}

impl FraudAlert {
    /// Create a new alert for a transaction. The risk score is clamped to
    /// [0, 100].
    pub fn new(
        transaction: &Transaction,
        fraud_type: FraudType,
        risk_score: f64,
        reason: String,
    ) -> Self {
        Self {
            alert_id: Uuid::new_v4().to_string(),
            transaction_id: transaction.transaction_id.clone(),
            user_id: transaction.user_id.clone(),
            fraud_type,
            risk_score: risk_score.clamp(0.0, 100.0),
            reason,
            timestamp: transaction.timestamp,
            original_transaction: transaction.clone(),
        }
    }
}

/// Structured failure emitted in place of an alert when a record cannot be
/// processed.
///
/// On the wire this is discriminated from [`FraudAlert`] by the presence of
/// the `error` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// What went wrong
    pub error: String,

    /// Truncated copy of the offending raw input
    pub original_data: String,
}

impl ErrorRecord {
    /// Maximum number of characters of raw input carried for audit.
    pub const MAX_ORIGINAL_DATA: usize = 200;

    /// Build an error record from a rejected raw payload.
    pub fn from_malformed(err: &MalformedRecord, raw: &str) -> Self {
        Self {
            error: err.to_string(),
            original_data: raw.chars().take(Self::MAX_ORIGINAL_DATA).collect(),
        }
    }
}

/// One emission of the pipeline: either a fraud alert or a structured
/// failure.
///
/// Serialized untagged so the wire shapes stay exactly those of the two
/// variants; consumers deserializing the stream pattern-match instead of
/// probing for keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Alert(FraudAlert),
    Failure(ErrorRecord),
}

impl Outcome {
    pub fn is_alert(&self) -> bool {
        matches!(self, Outcome::Alert(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The alert, if this outcome is one.
    pub fn as_alert(&self) -> Option<&FraudAlert> {
        match self {
            Outcome::Alert(alert) => Some(alert),
            Outcome::Failure(_) => None,
        }
    }
}
