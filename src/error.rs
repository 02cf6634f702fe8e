//! Error taxonomy for the fraud rules pipeline.

use thiserror::Error;

/// A raw record that cannot be turned into a well-formed transaction.
///
/// These are recovered locally: the record becomes an error outcome on the
/// alert stream and processing continues with the next record. They never
/// abort the pipeline.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MalformedRecord {
    /// The payload is not valid JSON.
    #[error("JSON decode error: {0}")]
    Json(String),

    /// One or more required fields are absent or carry the wrong JSON type.
    #[error("Missing fields: {0:?}")]
    MissingFields(Vec<String>),

    /// A field is present and well-typed but violates a value constraint.
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

/// Invalid rule or parallelism configuration, detected at startup.
///
/// Fatal: surfaced before any record is processed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("pipeline.workers must be at least 1")]
    NoWorkers,

    #[error("rules.high_amount_threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("rules.unusual_location must not be empty")]
    EmptyLocationSentinel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_names_the_fields() {
        let err = MalformedRecord::MissingFields(vec!["amount".to_string()]);
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn invalid_field_message_names_the_field() {
        let err = MalformedRecord::InvalidField {
            field: "amount".to_string(),
            reason: "must be non-negative".to_string(),
        };
        assert!(err.to_string().contains("amount"));
        assert!(err.to_string().contains("non-negative"));
    }
}
