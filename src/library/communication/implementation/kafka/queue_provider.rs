use super::{BrokerSignal, ConnectorConsumer, KafkaQueueEntry};
use crate::library::communication::event::{QueueEvent, QueueProvider};
use crate::library::BoxedError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use rdkafka::consumer::Consumer;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Mutex;

/// Queue provider implementation using a Kafka consumer group membership
///
/// Every consumed message is accompanied by the errors and rebalance notifications
/// reported through the [`ForwardingContext`](super::ForwardingContext) of the consumer.
pub struct KafkaQueueProvider {
    consumer: Arc<ConnectorConsumer>,
    signals: Arc<Mutex<UnboundedReceiver<BrokerSignal>>>,
}

impl KafkaQueueProvider {
    pub(super) fn new(
        consumer: Arc<ConnectorConsumer>,
        signals: UnboundedReceiver<BrokerSignal>,
    ) -> Self {
        Self {
            consumer,
            signals: Arc::new(Mutex::new(signals)),
        }
    }
}

#[async_trait]
impl QueueProvider for KafkaQueueProvider {
    type Entry = KafkaQueueEntry;

    /// Consumes the topics using the following steps:
    ///
    /// 1. Subscribe to the topics, joining the consumer group
    /// 2. Convert every received message into a [`KafkaQueueEntry`]
    /// 3. Merge the resulting stream with the signals raised by the client context
    async fn consume<'a>(
        &'a self,
        topics: &[String],
    ) -> Result<BoxStream<'a, QueueEvent<Self::Entry>>, BoxedError> {
        let topics: Vec<&str> = topics.iter().map(String::as_str).collect();
        self.consumer.subscribe(&topics)?;

        let consumer = self.consumer.clone();
        let entries = self.consumer.stream().map(move |result| match result {
            Ok(message) => QueueEvent::Entry(KafkaQueueEntry::new(&message, consumer.clone())),
            Err(error) => QueueEvent::Error(error.into()),
        });

        let signals = stream::unfold(self.signals.clone(), |signals| async move {
            let signal = signals.lock().await.recv().await?;
            let event: QueueEvent<KafkaQueueEntry> = signal.into();
            Some((event, signals))
        });

        Ok(stream::select(entries, signals).boxed())
    }
}
