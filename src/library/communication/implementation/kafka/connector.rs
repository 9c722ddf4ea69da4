use super::{ConnectorConsumer, ForwardingContext, KafkaQueueProvider};
use rdkafka::config::ClientConfig;
use rdkafka::consumer::Consumer;
use rdkafka::error::KafkaError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::{spawn_blocking, JoinError};
use tokio::time::sleep;
use tracing::{info, warn};

const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(5);
const SESSION_TIMEOUT_MS: &str = "6000";
const HEARTBEAT_INTERVAL_MS: &str = "2000";

/// Errors encountered while connecting to the broker cluster
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Client could not be created or the cluster did not respond
    #[error("unable to reach brokers")]
    Kafka(#[from] KafkaError),
    /// Metadata request against the cluster panicked or was cancelled
    #[error("metadata request did not complete")]
    MetadataRequest(#[from] JoinError),
}

/// Establishes consumer group memberships with a Kafka cluster
pub struct KafkaConnector {
    brokers: String,
    config: ClientConfig,
    retry_interval: Duration,
    metadata_timeout: Duration,
}

impl KafkaConnector {
    /// Creates a connector for the given bootstrap addresses which joins the provided group.
    ///
    /// Partitions without an acknowledged offset are consumed from their end. Offsets are stored
    /// explicitly by acknowledging entries and committed periodically by the client.
    pub fn new(bootstrap_servers: &[String], group: &str) -> Self {
        let brokers = bootstrap_servers.join(",");

        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &brokers)
            .set("group.id", group)
            .set("enable.auto.commit", "true")
            .set("enable.auto.offset.store", "false")
            .set("enable.partition.eof", "false")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", SESSION_TIMEOUT_MS)
            .set("heartbeat.interval.ms", HEARTBEAT_INTERVAL_MS);

        Self {
            brokers,
            config,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }

    /// Overrides the delay between two connection attempts
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Overrides how long a single connection attempt waits for the cluster to respond
    pub fn with_metadata_timeout(mut self, metadata_timeout: Duration) -> Self {
        self.metadata_timeout = metadata_timeout;
        self
    }

    /// Attempts to connect until the cluster is reachable. Never gives up.
    pub async fn connect(&self) -> KafkaQueueProvider {
        loop {
            match self.try_connect().await {
                Ok(provider) => {
                    info!(brokers = %self.brokers, "Connected to brokers");
                    return provider;
                }
                Err(error) => {
                    warn!(brokers = %self.brokers, %error, delay = ?self.retry_interval, "Waiting for brokers to come up");
                    sleep(self.retry_interval).await;
                }
            }
        }
    }

    /// Creates a consumer and verifies the connection by fetching the cluster metadata.
    /// The consumer is dropped again if the cluster does not respond.
    async fn try_connect(&self) -> Result<KafkaQueueProvider, BrokerError> {
        let (tx, rx) = unbounded_channel();
        let consumer: ConnectorConsumer = self
            .config
            .create_with_context(ForwardingContext::new(tx))?;
        let consumer = Arc::new(consumer);

        let client = consumer.clone();
        let timeout = self.metadata_timeout;
        spawn_blocking(move || client.fetch_metadata(None, timeout).map(|_| ())).await??;

        Ok(KafkaQueueProvider::new(consumer, rx))
    }
}
