//! Test Transaction Producer
//!
//! Generates and publishes synthetic transactions to NATS for pipeline
//! testing, injecting the three built-in fraud patterns at a configurable
//! rate.

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// Transaction structure matching the pipeline's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Transaction {
    transaction_id: String,
    user_id: String,
    amount: f64,
    merchant: String,
    category: String,
    timestamp: i64,
    location: String,
}

const MERCHANTS: &[(&str, &[&str])] = &[
    ("groceries", &["Walmart", "Target", "Kroger", "Safeway"]),
    ("electronics", &["BestBuy", "Apple Store", "Microsoft Store"]),
    ("gas", &["Shell", "Exxon", "Chevron", "BP"]),
    ("food", &["McDonalds", "Starbucks", "Subway", "Chipotle"]),
    ("travel", &["United Airlines", "Hilton", "Uber", "Airbnb"]),
    ("other", &["Amazon", "Unknown_Merchant"]),
];

// The last entry is the unusual-location sentinel; user profiles only pick
// from the rest.
const LOCATIONS: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "International",
];

/// Spending habits a user's normal transactions are drawn from
struct UserProfile {
    avg_amount: f64,
    primary_location: String,
    favorite_categories: Vec<&'static str>,
}

/// Transaction generator with per-user profiles for realistic patterns
struct TransactionGenerator {
    rng: rand::rngs::ThreadRng,
    users: Vec<String>,
    profiles: HashMap<String, UserProfile>,
}

impl TransactionGenerator {
    fn new(num_users: usize) -> Self {
        let mut rng = rand::thread_rng();
        let users: Vec<String> = (1..=num_users).map(|i| format!("user_{:04}", i)).collect();

        let categories: Vec<&'static str> = MERCHANTS.iter().map(|(c, _)| *c).collect();
        let home_locations = &LOCATIONS[..LOCATIONS.len() - 1];

        let mut profiles = HashMap::new();
        for user in &users {
            profiles.insert(
                user.clone(),
                UserProfile {
                    avg_amount: rng.gen_range(20.0..200.0),
                    primary_location: home_locations.choose(&mut rng).unwrap().to_string(),
                    favorite_categories: categories
                        .choose_multiple(&mut rng, 3)
                        .copied()
                        .collect(),
                },
            );
        }

        Self {
            rng,
            users,
            profiles,
        }
    }

    /// Generate a transaction matching the user's normal spending pattern
    fn generate_legitimate(&mut self) -> Transaction {
        let user_id = self.users.choose(&mut self.rng).unwrap().clone();
        let profile = &self.profiles[&user_id];

        let amount = self.rng.gen_range(10.0..profile.avg_amount * 1.5);
        let category = *profile.favorite_categories.choose(&mut self.rng).unwrap();
        let location = if self.rng.gen_bool(0.9) {
            profile.primary_location.clone()
        } else {
            LOCATIONS[..LOCATIONS.len() - 1]
                .choose(&mut self.rng)
                .unwrap()
                .to_string()
        };

        let merchant = self.merchant_for(category);
        self.build(user_id, amount, merchant, category.to_string(), location)
    }

    /// Generate a transaction exhibiting one of the three fraud patterns
    fn generate_fraudulent(&mut self) -> Transaction {
        let user_id = self.users.choose(&mut self.rng).unwrap().clone();
        let profile = &self.profiles[&user_id];
        let primary_location = profile.primary_location.clone();
        let favorite = *profile.favorite_categories.choose(&mut self.rng).unwrap();

        match self.rng.gen_range(0..3) {
            // High amount in the user's usual location
            0 => {
                let amount = self.rng.gen_range(5000.0..15_000.0);
                let category = MERCHANTS.choose(&mut self.rng).unwrap().0;
                let merchant = self.merchant_for(category);
                self.build(user_id, amount, merchant, category.to_string(), primary_location)
            }
            // Normal-looking spend from the unusual location
            1 => {
                let amount = self.rng.gen_range(100.0..500.0);
                let merchant = self.merchant_for(favorite);
                self.build(
                    user_id,
                    amount,
                    merchant,
                    favorite.to_string(),
                    "International".to_string(),
                )
            }
            // Blocklisted merchant
            _ => {
                let amount = self.rng.gen_range(200.0..1000.0);
                self.build(
                    user_id,
                    amount,
                    "Unknown_Merchant".to_string(),
                    "other".to_string(),
                    primary_location,
                )
            }
        }
    }

    fn merchant_for(&mut self, category: &str) -> String {
        let merchants = MERCHANTS
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, m)| *m)
            .unwrap_or(&["Amazon"]);
        merchants.choose(&mut self.rng).unwrap().to_string()
    }

    fn build(
        &mut self,
        user_id: String,
        amount: f64,
        merchant: String,
        category: String,
        location: String,
    ) -> Transaction {
        let now_ms = Utc::now().timestamp_millis();
        Transaction {
            transaction_id: format!("txn_{}_{}", now_ms, self.rng.gen_range(1000..10000)),
            user_id,
            amount: (amount * 100.0).round() / 100.0,
            merchant,
            category,
            timestamp: now_ms,
            location,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Transaction Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("transactions");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(200);
    let fraud_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.15);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        fraud_rate = fraud_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, fraud_rate, delay_ms).await;
        }
    };

    // Generate and publish transactions
    let mut generator = TransactionGenerator::new(100);
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} transactions...", count);

    let mut legitimate_count = 0;
    let mut fraudulent_count = 0;

    for i in 0..count {
        let transaction = if rng.gen_bool(fraud_rate) {
            fraudulent_count += 1;
            generator.generate_fraudulent()
        } else {
            legitimate_count += 1;
            generator.generate_legitimate()
        };

        let payload = serde_json::to_vec(&transaction)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} transactions ({} legitimate, {} fraudulent)",
                i + 1,
                count,
                legitimate_count,
                fraudulent_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} transactions ({} legitimate, {} fraudulent)",
        count, legitimate_count, fraudulent_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, fraud_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = TransactionGenerator::new(100);
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let transaction = if rng.gen_bool(fraud_rate) {
            generator.generate_fraudulent()
        } else {
            generator.generate_legitimate()
        };

        let json = serde_json::to_string_pretty(&transaction)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample transaction {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
