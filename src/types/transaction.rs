//! Transaction data structures for the fraud rules pipeline

use crate::error::MalformedRecord;
use serde::{Deserialize, Serialize};

/// Fields that must be present (with the right JSON type) for a raw record
/// to deserialize into a well-formed [`Transaction`].
pub const REQUIRED_FIELDS: [&str; 7] = [
    "transaction_id",
    "user_id",
    "amount",
    "merchant",
    "category",
    "timestamp",
    "location",
];

/// A single financial purchase event.
///
/// Created once by the source, immutable afterwards: every rule branch reads
/// the same value and none may modify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub transaction_id: String,

    /// Owning user (existence is not validated here)
    pub user_id: String,

    /// Purchase amount, non-negative
    pub amount: f64,

    /// Merchant name
    pub merchant: String,

    /// Merchant category (open set: "groceries", "gas", ...)
    pub category: String,

    /// Milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Location the transaction was made from
    pub location: String,
}

impl Transaction {
    /// Parse a raw JSON record into a well-formed transaction.
    ///
    /// A malformed record is rejected, never repaired: invalid JSON, an
    /// absent or wrong-typed required field, or a negative amount all return
    /// a [`MalformedRecord`] describing exactly what was wrong.
    pub fn parse(raw: &str) -> Result<Self, MalformedRecord> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| MalformedRecord::Json(e.to_string()))?;

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|field| !field_is_well_typed(&value, field))
            .map(|field| field.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(MalformedRecord::MissingFields(missing));
        }

        let tx: Transaction =
            serde_json::from_value(value).map_err(|e| MalformedRecord::Json(e.to_string()))?;

        // Catches NaN as well as negative values.
        if !(tx.amount >= 0.0) {
            return Err(MalformedRecord::InvalidField {
                field: "amount".to_string(),
                reason: format!("must be non-negative, got {}", tx.amount),
            });
        }

        Ok(tx)
    }
}

fn field_is_well_typed(value: &serde_json::Value, field: &str) -> bool {
    let Some(v) = value.get(field) else {
        return false;
    };
    match field {
        "amount" => v.is_number(),
        "timestamp" => v.is_i64() || v.is_u64(),
        _ => v.is_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "transaction_id": "txn_1700000000000_1234",
            "user_id": "user_0042",
            "amount": 129.99,
            "merchant": "Shell",
            "category": "gas",
            "timestamp": 1_700_000_000_000_i64,
            "location": "New York"
        })
    }

    #[test]
    fn test_transaction_serialization() {
        let tx = Transaction::parse(&sample_json().to_string()).unwrap();

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(tx, deserialized);
    }

    #[test]
    fn parse_well_formed() {
        let tx = Transaction::parse(&sample_json().to_string()).unwrap();
        assert_eq!(tx.transaction_id, "txn_1700000000000_1234");
        assert_eq!(tx.amount, 129.99);
        assert_eq!(tx.location, "New York");
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = Transaction::parse("not json at all").unwrap_err();
        assert!(matches!(err, MalformedRecord::Json(_)));
    }

    #[test]
    fn parse_rejects_missing_amount() {
        let mut record = sample_json();
        record.as_object_mut().unwrap().remove("amount");

        let err = Transaction::parse(&record.to_string()).unwrap_err();
        match err {
            MalformedRecord::MissingFields(fields) => {
                assert_eq!(fields, vec!["amount".to_string()]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_wrong_typed_field() {
        let mut record = sample_json();
        record["amount"] = serde_json::json!("129.99");

        let err = Transaction::parse(&record.to_string()).unwrap_err();
        assert!(matches!(err, MalformedRecord::MissingFields(ref f) if f == &vec!["amount".to_string()]));
    }

    #[test]
    fn parse_reports_every_missing_field() {
        let record = serde_json::json!({ "transaction_id": "txn_1" });

        let err = Transaction::parse(&record.to_string()).unwrap_err();
        match err {
            MalformedRecord::MissingFields(fields) => {
                assert_eq!(fields.len(), 6);
                assert!(fields.contains(&"amount".to_string()));
                assert!(fields.contains(&"category".to_string()));
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_negative_amount() {
        let mut record = sample_json();
        record["amount"] = serde_json::json!(-10.0);

        let err = Transaction::parse(&record.to_string()).unwrap_err();
        assert!(err.to_string().contains("amount"));
    }
}
