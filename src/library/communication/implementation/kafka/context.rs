use crate::library::communication::event::{QueueEvent, RebalanceNotification, TopicPartition};
use rdkafka::client::ClientContext;
use rdkafka::consumer::{ConsumerContext, Rebalance};
use rdkafka::error::KafkaError;
use rdkafka::TopicPartitionList;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// Out-of-band notification raised by the client while consuming
#[derive(Debug)]
pub enum BrokerSignal {
    /// Client or broker reported an error
    Error {
        /// Error raised by the client
        error: KafkaError,
        /// Human readable explanation
        reason: String,
    },
    /// Partition assignment changed
    Rebalance(RebalanceNotification),
}

impl<E> From<BrokerSignal> for QueueEvent<E> {
    fn from(signal: BrokerSignal) -> Self {
        match signal {
            BrokerSignal::Error { error, reason } => {
                QueueEvent::Error(format!("{} ({})", error, reason).into())
            }
            BrokerSignal::Rebalance(notification) => QueueEvent::Rebalance(notification),
        }
    }
}

/// Client context which forwards errors and rebalances into a channel
///
/// The callbacks are invoked from within the client, the receiving half of the channel
/// is merged into the stream of consumed entries.
pub struct ForwardingContext {
    signals: UnboundedSender<BrokerSignal>,
}

impl ForwardingContext {
    /// Creates a new context which forwards into the given channel
    pub fn new(signals: UnboundedSender<BrokerSignal>) -> Self {
        Self { signals }
    }

    fn forward(&self, signal: BrokerSignal) {
        if let Err(e) = self.signals.send(signal) {
            trace!(signal = ?e.0, "Dropped broker signal without receiver");
        }
    }
}

impl ClientContext for ForwardingContext {
    fn error(&self, error: KafkaError, reason: &str) {
        self.forward(BrokerSignal::Error {
            error,
            reason: reason.to_owned(),
        });
    }
}

impl ConsumerContext for ForwardingContext {
    fn post_rebalance<'a>(&self, rebalance: &Rebalance<'a>) {
        let notification = match rebalance {
            Rebalance::Assign(assignment) => {
                RebalanceNotification::Assigned(partitions(assignment))
            }
            Rebalance::Revoke(revocation) => RebalanceNotification::Revoked(partitions(revocation)),
            Rebalance::Error(error) => RebalanceNotification::Failed(error.to_string()),
        };

        self.forward(BrokerSignal::Rebalance(notification));
    }
}

fn partitions(list: &TopicPartitionList) -> Vec<TopicPartition> {
    list.elements()
        .iter()
        .map(|element| TopicPartition::new(element.topic(), element.partition()))
        .collect()
}
