//! Fraud rule capability and the built-in rule registry

pub mod builtin;

pub use builtin::{HighAmountRule, SuspiciousMerchantRule, UnusualLocationRule};

use crate::config::RulesConfig;
use crate::types::alert::FraudType;
use crate::types::transaction::Transaction;

/// Risk score floor for rules that do not override
/// [`FraudRule::base_risk_score`].
pub const DEFAULT_BASE_RISK_SCORE: f64 = 75.0;

/// A stateless predicate classifying a single transaction as matching a
/// named fraud pattern.
///
/// Implementations must be pure functions of the transaction and their own
/// configuration: no cross-transaction state, no side effects, and no panic
/// for any well-formed input. That is what allows the router to evaluate
/// branches in any order, concurrently, against the same record.
pub trait FraudRule: Send + Sync {
    /// Short identifier used in logs and metrics.
    fn name(&self) -> &str;

    /// Fraud type stamped on alerts produced from this rule's matches.
    fn fraud_type(&self) -> FraudType;

    /// Risk score handed to the synthesizer as a floor for fraud types
    /// without a dedicated scoring formula.
    fn base_risk_score(&self) -> f64 {
        DEFAULT_BASE_RISK_SCORE
    }

    /// Whether the transaction matches this rule's fraud pattern.
    fn evaluate(&self, tx: &Transaction) -> bool;
}

/// Build the built-in rule set from configuration.
///
/// Adding a detection pattern means adding an entry here; the router treats
/// every rule uniformly, so no new branch wiring is needed.
pub fn default_rules(config: &RulesConfig) -> Vec<Box<dyn FraudRule>> {
    vec![
        Box::new(HighAmountRule::new(config.high_amount_threshold)),
        Box::new(SuspiciousMerchantRule::new(
            config.suspicious_merchants.iter().cloned(),
        )),
        Box::new(UnusualLocationRule::new(&config.unusual_location)),
    ]
}
