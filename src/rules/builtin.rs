//! Built-in single-record fraud rules.

use super::FraudRule;
use crate::types::alert::FraudType;
use crate::types::transaction::Transaction;
use std::collections::HashSet;

/// Matches transactions whose amount strictly exceeds the configured
/// threshold. An amount equal to the threshold does not match.
pub struct HighAmountRule {
    threshold: f64,
}

impl HighAmountRule {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl FraudRule for HighAmountRule {
    fn name(&self) -> &str {
        "high_amount"
    }

    fn fraud_type(&self) -> FraudType {
        FraudType::HighAmountFraud
    }

    fn base_risk_score(&self) -> f64 {
        90.0
    }

    fn evaluate(&self, tx: &Transaction) -> bool {
        tx.amount > self.threshold
    }
}

/// Matches transactions whose merchant is on the blocklist.
/// Membership is a case-sensitive exact match.
pub struct SuspiciousMerchantRule {
    blocklist: HashSet<String>,
}

impl SuspiciousMerchantRule {
    pub fn new<I: IntoIterator<Item = String>>(blocklist: I) -> Self {
        Self {
            blocklist: blocklist.into_iter().collect(),
        }
    }
}

impl FraudRule for SuspiciousMerchantRule {
    fn name(&self) -> &str {
        "suspicious_merchant"
    }

    fn fraud_type(&self) -> FraudType {
        FraudType::MerchantFraud
    }

    fn base_risk_score(&self) -> f64 {
        85.0
    }

    fn evaluate(&self, tx: &Transaction) -> bool {
        self.blocklist.contains(&tx.merchant)
    }
}

/// Matches transactions reported from the unusual-location sentinel, a
/// location outside every user's normal geography.
pub struct UnusualLocationRule {
    sentinel: String,
}

impl UnusualLocationRule {
    pub fn new(sentinel: &str) -> Self {
        Self {
            sentinel: sentinel.to_string(),
        }
    }
}

impl FraudRule for UnusualLocationRule {
    fn name(&self) -> &str {
        "unusual_location"
    }

    fn fraud_type(&self) -> FraudType {
        FraudType::LocationFraud
    }

    fn base_risk_score(&self) -> f64 {
        80.0
    }

    fn evaluate(&self, tx: &Transaction) -> bool {
        tx.location == self.sentinel
    }
}
