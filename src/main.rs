//! Fraud Rules Pipeline - Main Entry Point
//!
//! Consumes transactions from NATS, evaluates every fraud rule against each
//! record, and publishes the merged alert stream. Supports parallel record
//! processing for high throughput.

use anyhow::Result;
use fraud_rules_pipeline::{
    config::AppConfig,
    consumer::TransactionConsumer,
    metrics::{MetricsReporter, PipelineMetrics},
    producer::AlertProducer,
    router::FanOutRouter,
    rules::default_rules,
    types::alert::Outcome,
};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fraud_rules_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Fraud Rules Pipeline");

    // Load and validate configuration before touching any record
    let config = AppConfig::load()?;
    config.validate()?;
    info!("Configuration loaded successfully");
    info!(
        "High-amount threshold: {:.2}, blocklisted merchants: {}, unusual location: {}",
        config.rules.high_amount_threshold,
        config.rules.suspicious_merchants.len(),
        config.rules.unusual_location
    );

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Build the rule registry and router
    let router = Arc::new(FanOutRouter::new(default_rules(&config.rules)));
    info!(
        "Rule registry initialized with {} rules: {:?}",
        router.rule_count(),
        router.rule_names()
    );

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and producer
    let consumer = TransactionConsumer::new(client.clone(), &config.nats.transaction_subject);
    let producer = Arc::new(AlertProducer::new(client.clone(), &config.nats.alert_subject));

    // Parallel processing configuration
    let num_workers = config.pipeline.workers;
    info!(
        "Starting transaction processing loop with {} parallel workers",
        num_workers
    );
    info!("Listening on subject: {}", config.nats.transaction_subject);
    info!("Publishing alerts to: {}", config.nats.alert_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process records in parallel
    let mut subscription = consumer.subscribe().await?;

    // Counter for logging the first few raw records, owned by this loop
    let sample_limit = config.pipeline.sample_log_count;
    let mut sampled = 0usize;

    while let Some(message) = subscription.next().await {
        // Non-UTF-8 payloads fall through to the router as undecodable JSON
        // and come back out as error records.
        let raw = String::from_utf8_lossy(&message.payload).into_owned();

        if sampled < sample_limit {
            sampled += 1;
            let preview: String = raw.chars().take(120).collect();
            info!(sample = sampled, payload = %preview, "Raw transaction sample");
        }

        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        // Clone shared resources for the spawned task
        let router = router.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to process this record
        tokio::spawn(async move {
            let start_time = Instant::now();

            // All branch evaluations complete before anything is emitted, so
            // an aborted task never leaves a half-published record behind.
            let outcomes = router.route_raw(&raw);
            let processing_time = start_time.elapsed();

            metrics.record_transaction(processing_time);

            for outcome in &outcomes {
                match outcome {
                    Outcome::Alert(alert) => {
                        metrics.record_alert(&alert.fraud_type.to_string(), alert.risk_score);
                        info!(
                            alert_id = %alert.alert_id,
                            transaction_id = %alert.transaction_id,
                            fraud_type = %alert.fraud_type,
                            risk_score = alert.risk_score,
                            reason = %alert.reason,
                            "Fraud alert detected"
                        );
                    }
                    Outcome::Failure(failure) => {
                        metrics.record_error();
                        warn!(error = %failure.error, "Record rejected");
                    }
                }

                if let Err(e) = producer.publish(outcome).await {
                    error!(error = %e, "Failed to publish outcome");
                }
            }

            if outcomes.is_empty() {
                debug!(
                    processing_time_us = processing_time.as_micros(),
                    "Record processed (no rules matched)"
                );
            }

            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

            // Log progress every 100 records
            if count % 100 == 0 {
                let throughput = metrics.get_throughput();
                let processing_stats = metrics.get_processing_stats();
                info!(
                    processed = count,
                    throughput = format!("{:.1} tx/s", throughput),
                    avg_latency_us = processing_stats.mean_us,
                    "Processing milestone"
                );
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
