use super::super::index::TopicFunctionIndex;
use super::super::options::RegistryFailurePolicy;
use super::super::registry::{RegistryError, SubscriptionSource};
use crate::harness::HeartStone;
use crate::library::EmptyResult;
use async_trait::async_trait;
use jatsl::{Job, JobManager};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Fetches the subscriptions and publishes them into the index.
/// The index is left untouched if the lookup fails.
pub async fn sync_index<S>(source: &S, index: &TopicFunctionIndex) -> Result<(), RegistryError>
where
    S: SubscriptionSource + Send + Sync + ?Sized,
{
    let subscriptions = source.build().await?;
    let changed = index.sync(&subscriptions);
    let topics = index.snapshot().len();

    info!(
        topics,
        subscriptions = subscriptions.len(),
        changed,
        "Syncing topic map"
    );

    Ok(())
}

/// Periodically rebuilds the topic map from the function registry
pub struct RefreshJob<S> {
    source: Arc<S>,
    index: Arc<TopicFunctionIndex>,
    interval: Duration,
    policy: RegistryFailurePolicy,
    stone: HeartStone,
}

impl<S> RefreshJob<S>
where
    S: SubscriptionSource + Send + Sync,
{
    /// Creates a new job which kills the heart of the stone when the registry fails under [`RegistryFailurePolicy::Exit`]
    pub fn new(
        source: Arc<S>,
        index: Arc<TopicFunctionIndex>,
        interval: Duration,
        policy: RegistryFailurePolicy,
        stone: HeartStone,
    ) -> Self {
        Self {
            source,
            index,
            interval,
            policy,
            stone,
        }
    }

    /// Runs one refresh cycle, returning an error only if the failure is fatal
    async fn refresh(&self) -> Result<(), RegistryError> {
        match sync_index(self.source.as_ref(), &self.index).await {
            Ok(()) => Ok(()),
            Err(error) if self.policy == RegistryFailurePolicy::KeepStale => {
                warn!(%error, "Unable to rebuild topic map, keeping previous one");
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    async fn abort(&self, error: RegistryError) {
        error!(%error, "Unable to rebuild topic map");
        self.stone
            .clone()
            .kill(format!("unable to rebuild topic map: {}", error))
            .await;
    }
}

#[async_trait]
impl<S> Job for RefreshJob<S>
where
    S: SubscriptionSource + Send + Sync,
{
    const NAME: &'static str = module_path!();
    const SUPPORTS_GRACEFUL_TERMINATION: bool = true;

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let mut ticks = interval_at(Instant::now() + self.interval, self.interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        manager.ready().await;

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    if let Err(error) = self.refresh().await {
                        self.abort(error).await;
                        break;
                    }
                }
                _ = manager.termination_signal() => return Ok(()),
            }
        }

        manager.termination_signal().await;
        Ok(())
    }
}
