//! Fan-out / union routing of records across the rule set.

use crate::rules::FraudRule;
use crate::synthesizer::AlertSynthesizer;
use crate::types::alert::{ErrorRecord, Outcome};
use crate::types::transaction::Transaction;
use tracing::debug;

/// Applies every registered rule to each incoming record and merges the
/// per-rule alert streams into one outcome stream.
///
/// The merge is a union, not a deduplication: a transaction matching two
/// rules yields two independent alerts with distinct ids and fraud types.
/// Outcomes for a single record follow rule registration order; the router
/// holds no state between records, so records may be routed concurrently.
pub struct FanOutRouter {
    rules: Vec<Box<dyn FraudRule>>,
    synthesizer: AlertSynthesizer,
}

impl FanOutRouter {
    pub fn new(rules: Vec<Box<dyn FraudRule>>) -> Self {
        Self {
            rules,
            synthesizer: AlertSynthesizer::new(),
        }
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Register an additional rule behind the built-in set.
    pub fn register(&mut self, rule: Box<dyn FraudRule>) {
        self.rules.push(rule);
    }

    /// Evaluate one raw JSON record against every rule.
    ///
    /// A malformed record short-circuits to a single failure outcome; it
    /// never reaches rule evaluation or risk scoring.
    pub fn route_raw(&self, raw: &str) -> Vec<Outcome> {
        match Transaction::parse(raw) {
            Ok(tx) => self.route(&tx),
            Err(err) => {
                debug!(error = %err, "Rejected malformed record");
                vec![Outcome::Failure(ErrorRecord::from_malformed(&err, raw))]
            }
        }
    }

    /// Evaluate a well-formed transaction against every rule, exactly once
    /// per rule.
    pub fn route(&self, tx: &Transaction) -> Vec<Outcome> {
        self.rules
            .iter()
            .filter(|rule| rule.evaluate(tx))
            .map(|rule| {
                Outcome::Alert(self.synthesizer.synthesize(
                    tx,
                    rule.fraud_type(),
                    rule.base_risk_score(),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::rules::default_rules;
    use crate::types::alert::FraudType;

    fn make_router() -> FanOutRouter {
        FanOutRouter::new(default_rules(&RulesConfig::default()))
    }

    fn record(amount: f64, merchant: &str, location: &str) -> String {
        serde_json::json!({
            "transaction_id": "txn_1700000000000_0001",
            "user_id": "user_0001",
            "amount": amount,
            "merchant": merchant,
            "category": "gas",
            "timestamp": 1_700_000_000_000_i64,
            "location": location
        })
        .to_string()
    }

    #[test]
    fn clean_transaction_yields_no_outcomes() {
        let router = make_router();
        let outcomes = router.route_raw(&record(25.0, "Shell", "New York"));
        assert!(outcomes.is_empty());
    }

    #[test]
    fn high_amount_scenario_end_to_end() {
        // threshold 3000, amount 6000 -> exactly one HIGH_AMOUNT_FRAUD alert
        // scored 60.0
        let router = make_router();
        let outcomes = router.route_raw(&record(6000.0, "Shell", "New York"));

        assert_eq!(outcomes.len(), 1);
        let alert = outcomes[0].as_alert().expect("expected an alert");
        assert_eq!(alert.fraud_type, FraudType::HighAmountFraud);
        assert!((alert.risk_score - 60.0).abs() < 1e-9);
        assert_eq!(alert.original_transaction.merchant, "Shell");
    }

    #[test]
    fn multiple_matches_yield_independent_alerts() {
        let router = make_router();
        let outcomes = router.route_raw(&record(6000.0, "Shell", "International"));

        assert_eq!(outcomes.len(), 2);
        let first = outcomes[0].as_alert().unwrap();
        let second = outcomes[1].as_alert().unwrap();

        assert_ne!(first.alert_id, second.alert_id);
        assert_ne!(first.fraud_type, second.fraud_type);
        assert_eq!(first.original_transaction, second.original_transaction);
    }

    #[test]
    fn all_three_rules_can_fire_for_one_transaction() {
        let router = make_router();
        let outcomes = router.route_raw(&record(6000.0, "Unknown_Merchant", "International"));

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(Outcome::is_alert));
    }

    #[test]
    fn outcomes_follow_registration_order() {
        let router = make_router();
        let outcomes = router.route_raw(&record(6000.0, "Unknown_Merchant", "International"));

        let types: Vec<FraudType> = outcomes
            .iter()
            .map(|o| o.as_alert().unwrap().fraud_type.clone())
            .collect();
        assert_eq!(
            types,
            vec![
                FraudType::HighAmountFraud,
                FraudType::MerchantFraud,
                FraudType::LocationFraud
            ]
        );
    }

    #[test]
    fn missing_amount_yields_single_error_record() {
        let router = make_router();
        let raw = serde_json::json!({
            "transaction_id": "txn_1700000000000_0001",
            "user_id": "user_0001",
            "merchant": "Shell",
            "category": "gas",
            "timestamp": 1_700_000_000_000_i64,
            "location": "International"
        })
        .to_string();

        let outcomes = router.route_raw(&raw);
        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            Outcome::Failure(failure) => {
                assert!(failure.error.contains("amount"));
                assert!(!failure.original_data.is_empty());
            }
            Outcome::Alert(alert) => panic!("expected failure, got alert {}", alert.alert_id),
        }
    }

    #[test]
    fn invalid_json_yields_error_record() {
        let router = make_router();
        let outcomes = router.route_raw("{ this is not json");

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_failure());
    }

    #[test]
    fn routing_is_deterministic_for_identical_input() {
        let router = make_router();
        let raw = record(6000.0, "Unknown_Merchant", "New York");

        let first = router.route_raw(&raw);
        let second = router.route_raw(&raw);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            let a = a.as_alert().unwrap();
            let b = b.as_alert().unwrap();
            assert_eq!(a.fraud_type, b.fraud_type);
            assert_eq!(a.risk_score, b.risk_score);
            assert_eq!(a.reason, b.reason);
        }
    }

    #[test]
    fn registered_rule_extends_the_union() {
        struct RoundAmountRule;
        impl crate::rules::FraudRule for RoundAmountRule {
            fn name(&self) -> &str {
                "round_amount"
            }
            fn fraud_type(&self) -> FraudType {
                FraudType::Other("ROUND_AMOUNT_FRAUD".to_string())
            }
            fn evaluate(&self, tx: &Transaction) -> bool {
                tx.amount.fract() == 0.0 && tx.amount > 0.0
            }
        }

        let mut router = make_router();
        router.register(Box::new(RoundAmountRule));
        assert_eq!(router.rule_count(), 4);

        let outcomes = router.route_raw(&record(500.0, "Shell", "New York"));
        assert_eq!(outcomes.len(), 1);
        let alert = outcomes[0].as_alert().unwrap();
        assert_eq!(
            alert.fraud_type,
            FraudType::Other("ROUND_AMOUNT_FRAUD".to_string())
        );
        // No dedicated formula: falls back to the trait's default base score.
        assert_eq!(alert.risk_score, crate::rules::DEFAULT_BASE_RISK_SCORE);
    }
}
