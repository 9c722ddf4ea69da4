//! [Kafka](https://kafka.apache.org) based implementation using `rdkafka`
//!
//! The [`KafkaConnector`] establishes the consumer group membership and hands out a
//! [`KafkaQueueProvider`] once the cluster is reachable. Offsets of acknowledged entries
//! are stored locally and committed to the cluster in the background by the client.

mod connector;
mod context;
mod queue_entry;
mod queue_provider;

pub use connector::{BrokerError, KafkaConnector};
pub use context::{BrokerSignal, ForwardingContext};
pub use queue_entry::KafkaQueueEntry;
pub use queue_provider::KafkaQueueProvider;

use rdkafka::consumer::StreamConsumer;

/// Consumer type used by all structures in this module
pub type ConnectorConsumer = StreamConsumer<ForwardingContext>;
