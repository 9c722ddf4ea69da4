//! Forwards messages from broker topics to the gateway functions subscribed to them
//!
//! Two jobs run side by side. The [`RefreshJob`] periodically rebuilds the
//! [`TopicFunctionIndex`] from the function registry while the [`ConsumerJob`]
//! routes every consumed message through it. The index is the only state they share.

mod dispatcher;
mod index;
mod jobs;
mod options;
mod registry;

use crate::constants::CONSUMER_GROUP;
use crate::harness::{Heart, Module};
use crate::library::communication::implementation::kafka::{KafkaConnector, KafkaQueueProvider};
use crate::library::http::build_client;
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use jatsl::{schedule, JobScheduler};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub use dispatcher::{DispatchError, FunctionInvoker, GatewayInvoker};
pub use index::TopicFunctionIndex;
pub use jobs::{sync_index, ConsumerJob, ConsumerLoop, RefreshJob};
pub use options::{DispatchMode, Options, RegistryFailurePolicy};
pub use registry::{GatewayRegistry, RegistryError, SubscriptionSource};

/// Errors preventing the connector from starting
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// No topics have been configured
    #[error("no topics configured, provide a comma separated list through `topics`")]
    MissingTopics,
    /// Startup has not been completed before running
    #[error("module has not been started")]
    NotStarted,
}

/// Module implementation
pub struct Connector {
    options: Options,
    index: Arc<TopicFunctionIndex>,
    provider: Option<Arc<KafkaQueueProvider>>,
    registry: Option<Arc<GatewayRegistry>>,
}

impl Connector {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        Self {
            options,
            index: Arc::new(TopicFunctionIndex::default()),
            provider: None,
            registry: None,
        }
    }
}

#[async_trait]
impl Module for Connector {
    async fn pre_startup(&mut self) -> EmptyResult {
        let topics = self.options.broker.topics();
        if topics.is_empty() {
            return Err(ConnectorError::MissingTopics.into());
        }

        let brokers = self.options.broker.bootstrap_servers();
        info!(?brokers, ?topics, gateway = %self.options.gateway.url, "Starting connector");

        let connector = KafkaConnector::new(&brokers, CONSUMER_GROUP)
            .with_retry_interval(self.options.broker.connect_retry_interval)
            .with_metadata_timeout(self.options.broker.connect_timeout);
        self.provider = Some(Arc::new(connector.connect().await));

        let registry = Arc::new(GatewayRegistry::new(
            build_client(None),
            self.options.gateway.url.clone(),
        ));

        if let Err(error) = sync_index(registry.as_ref(), &self.index).await {
            match self.options.registry_failure {
                RegistryFailurePolicy::Exit => return Err(error.into()),
                RegistryFailurePolicy::KeepStale => {
                    warn!(%error, "Unable to build initial topic map, starting without subscribers")
                }
            }
        }

        self.registry = Some(registry);

        Ok(())
    }

    async fn run(&mut self, scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        let provider = self.provider.clone().ok_or(ConnectorError::NotStarted)?;
        let registry = self.registry.clone().ok_or(ConnectorError::NotStarted)?;
        let (heart, stone) = Heart::new();

        let invoker = GatewayInvoker::new(
            build_client(Some(self.options.gateway.upstream_timeout)),
            self.options.gateway.url.clone(),
            self.options.gateway.upstream_timeout,
        )
        .print_response(self.options.gateway.print_response);

        let refresh_job = RefreshJob::new(
            registry,
            self.index.clone(),
            self.options.rebuild_interval,
            self.options.registry_failure,
            stone,
        );

        let consumer_job = ConsumerJob::new(
            provider,
            self.index.clone(),
            Arc::new(invoker),
            self.options.broker.topics(),
            self.options.dispatch_mode,
        );

        schedule!(scheduler, {
            refresh_job,
            consumer_job,
        });

        Ok(Some(heart))
    }
}
