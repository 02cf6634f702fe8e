//! Alert synthesis: turning a matched (transaction, rule) pair into a
//! fully-populated fraud alert.

use crate::types::alert::{FraudAlert, FraudType};
use crate::types::transaction::Transaction;
use tracing::warn;

/// Builds scored, explained alerts from rule matches.
///
/// Stateless. The scoring and reason policies live entirely here so rules
/// stay pure predicates; the same synthesizer serves every branch.
pub struct AlertSynthesizer;

impl AlertSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce an alert for a transaction known to match `fraud_type`.
    ///
    /// `base_risk_score` is only consulted for fraud types without a
    /// dedicated scoring formula; the resulting score is clamped to
    /// [0, 100] either way.
    pub fn synthesize(
        &self,
        tx: &Transaction,
        fraud_type: FraudType,
        base_risk_score: f64,
    ) -> FraudAlert {
        let risk_score = self.risk_score(tx, &fraud_type, base_risk_score);
        let reason = self.reason(tx, &fraud_type);
        FraudAlert::new(tx, fraud_type, risk_score, reason)
    }

    /// Scoring policy:
    /// - `HIGH_AMOUNT_FRAUD`: `min(100, amount / 1000 * 10)`
    /// - `LOCATION_FRAUD`: constant 80
    /// - `MERCHANT_FRAUD`: constant 85
    /// - anything else: the base risk score as given
    fn risk_score(&self, tx: &Transaction, fraud_type: &FraudType, base_risk_score: f64) -> f64 {
        match fraud_type {
            FraudType::HighAmountFraud => (tx.amount / 1000.0 * 10.0).min(100.0),
            FraudType::LocationFraud => 80.0,
            FraudType::MerchantFraud => 85.0,
            FraudType::Other(name) => {
                // Degraded mode, not an error record.
                warn!(
                    fraud_type = %name,
                    base_risk_score = base_risk_score,
                    "No scoring formula for fraud type, using base risk score"
                );
                base_risk_score
            }
        }
    }

    fn reason(&self, tx: &Transaction, fraud_type: &FraudType) -> String {
        match fraud_type {
            FraudType::HighAmountFraud => {
                format!("Transaction amount ${:.2} exceeds normal limits", tx.amount)
            }
            FraudType::LocationFraud => {
                format!("Transaction from suspicious location: {}", tx.location)
            }
            FraudType::MerchantFraud => {
                format!("Transaction with suspicious merchant: {}", tx.merchant)
            }
            FraudType::Other(_) => "Suspicious transaction detected".to_string(),
        }
    }
}

impl Default for AlertSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_tx(amount: f64) -> Transaction {
        Transaction {
            transaction_id: "txn_1700000000000_0001".to_string(),
            user_id: "user_0001".to_string(),
            amount,
            merchant: "Unknown_Merchant".to_string(),
            category: "other".to_string(),
            timestamp: 1_700_000_000_000,
            location: "International".to_string(),
        }
    }

    #[test]
    fn high_amount_score_scales_linearly() {
        let synthesizer = AlertSynthesizer::new();
        let alert =
            synthesizer.synthesize(&make_test_tx(5000.0), FraudType::HighAmountFraud, 90.0);
        assert!((alert.risk_score - 50.0).abs() < 1e-9);

        let alert =
            synthesizer.synthesize(&make_test_tx(6000.0), FraudType::HighAmountFraud, 90.0);
        assert!((alert.risk_score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn high_amount_score_caps_at_100() {
        let synthesizer = AlertSynthesizer::new();
        let alert =
            synthesizer.synthesize(&make_test_tx(12_000.0), FraudType::HighAmountFraud, 90.0);
        assert_eq!(alert.risk_score, 100.0);
    }

    #[test]
    fn high_amount_score_ignores_base() {
        let synthesizer = AlertSynthesizer::new();
        let alert = synthesizer.synthesize(&make_test_tx(5000.0), FraudType::HighAmountFraud, 5.0);
        assert!((alert.risk_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn location_score_is_constant() {
        let synthesizer = AlertSynthesizer::new();
        for amount in [10.0, 500.0, 50_000.0] {
            let alert = synthesizer.synthesize(&make_test_tx(amount), FraudType::LocationFraud, 10.0);
            assert_eq!(alert.risk_score, 80.0);
        }
    }

    #[test]
    fn merchant_score_is_constant() {
        let synthesizer = AlertSynthesizer::new();
        for amount in [10.0, 500.0, 50_000.0] {
            let alert = synthesizer.synthesize(&make_test_tx(amount), FraudType::MerchantFraud, 10.0);
            assert_eq!(alert.risk_score, 85.0);
        }
    }

    #[test]
    fn unrecognized_type_uses_base_verbatim() {
        let synthesizer = AlertSynthesizer::new();
        let alert = synthesizer.synthesize(
            &make_test_tx(500.0),
            FraudType::Other("VELOCITY_FRAUD".to_string()),
            72.5,
        );
        assert_eq!(alert.risk_score, 72.5);
        assert_eq!(alert.reason, "Suspicious transaction detected");
    }

    #[test]
    fn unrecognized_type_base_still_clamped() {
        let synthesizer = AlertSynthesizer::new();
        let alert = synthesizer.synthesize(
            &make_test_tx(500.0),
            FraudType::Other("VELOCITY_FRAUD".to_string()),
            130.0,
        );
        assert_eq!(alert.risk_score, 100.0);
    }

    #[test]
    fn reasons_embed_transaction_fields() {
        let synthesizer = AlertSynthesizer::new();
        let tx = make_test_tx(6000.0);

        let alert = synthesizer.synthesize(&tx, FraudType::HighAmountFraud, 90.0);
        assert_eq!(alert.reason, "Transaction amount $6000.00 exceeds normal limits");

        let alert = synthesizer.synthesize(&tx, FraudType::LocationFraud, 80.0);
        assert_eq!(alert.reason, "Transaction from suspicious location: International");

        let alert = synthesizer.synthesize(&tx, FraudType::MerchantFraud, 85.0);
        assert_eq!(alert.reason, "Transaction with suspicious merchant: Unknown_Merchant");
    }

    #[test]
    fn alert_ids_are_unique_per_invocation() {
        let synthesizer = AlertSynthesizer::new();
        let tx = make_test_tx(6000.0);
        let first = synthesizer.synthesize(&tx, FraudType::HighAmountFraud, 90.0);
        let second = synthesizer.synthesize(&tx, FraudType::HighAmountFraud, 90.0);
        assert_ne!(first.alert_id, second.alert_id);
    }
}
