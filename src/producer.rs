//! NATS message producer for the merged outcome stream

use crate::types::alert::Outcome;
use anyhow::Result;
use async_nats::Client;
use tracing::{debug, warn};

/// Producer publishing pipeline outcomes (fraud alerts and error records)
/// to NATS.
///
/// Both outcome variants go to the same subject; consumers tell them apart
/// by shape, so the sink stays a dumb byte pipe.
#[derive(Clone)]
pub struct AlertProducer {
    client: Client,
    subject: String,
}

impl AlertProducer {
    /// Create a new alert producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a single outcome
    pub async fn publish(&self, outcome: &Outcome) -> Result<()> {
        let payload = serde_json::to_vec(outcome)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        match outcome {
            Outcome::Alert(alert) => debug!(
                alert_id = %alert.alert_id,
                transaction_id = %alert.transaction_id,
                fraud_type = %alert.fraud_type,
                risk_score = alert.risk_score,
                "Published fraud alert"
            ),
            Outcome::Failure(failure) => warn!(
                error = %failure.error,
                "Published error record"
            ),
        }

        Ok(())
    }

    /// Publish every outcome produced for one record, in branch order
    pub async fn publish_all(&self, outcomes: &[Outcome]) -> Result<()> {
        for outcome in outcomes {
            self.publish(outcome).await?;
        }
        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}
