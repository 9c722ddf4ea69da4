use super::{QueueEntry, QueueEvent};
use crate::library::BoxedError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Allows consumption of topics as a member of a consumer group
#[async_trait]
pub trait QueueProvider {
    /// Type of [`QueueEntry`] returned by the provider
    type Entry: QueueEntry + Send + Sync;

    /// Subscribes to the given topics and streams every entry, error and rebalance
    /// notification of the consumer group membership as it occurs.
    async fn consume<'a>(
        &'a self,
        topics: &[String],
    ) -> Result<BoxStream<'a, QueueEvent<Self::Entry>>, BoxedError>;
}
