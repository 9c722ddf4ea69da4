use super::{ConsumerMessage, TopicPartition};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use std::fmt;

/// Entry retrieved from a partition which may be acknowledged once processed
#[async_trait]
pub trait QueueEntry {
    /// Message carried by the entry
    fn message(&self) -> &ConsumerMessage;

    /// Acknowledge the entry as processed, moving the position of its partition past it
    async fn acknowledge(&mut self) -> EmptyResult;
}

/// Change of the partition assignment within a consumer group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebalanceNotification {
    /// Partitions have been assigned to this consumer
    Assigned(Vec<TopicPartition>),
    /// Partitions have been taken away from this consumer
    Revoked(Vec<TopicPartition>),
    /// Rebalancing failed
    Failed(String),
}

impl fmt::Display for RebalanceNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (action, partitions) = match self {
            Self::Assigned(partitions) => ("assigned", partitions),
            Self::Revoked(partitions) => ("revoked", partitions),
            Self::Failed(reason) => return write!(f, "rebalance failed: {}", reason),
        };

        let partitions = partitions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{} [{}]", action, partitions)
    }
}

/// Event emitted while consuming from a consumer group
///
/// Entries, errors and rebalances originate from independent sources which are merged
/// without any priority among them.
#[derive(Debug)]
pub enum QueueEvent<E> {
    /// Message has been received
    Entry(E),
    /// Broker or client reported an error, consumption continues regardless
    Error(BoxedError),
    /// Partition assignment changed
    Rebalance(RebalanceNotification),
}
