use super::ConnectorConsumer;
use crate::library::communication::event::{ConsumerMessage, QueueEntry};
use crate::library::EmptyResult;
use async_trait::async_trait;
use rdkafka::consumer::Consumer;
use rdkafka::{Message, Offset, TopicPartitionList};
use std::sync::Arc;

/// Kafka based implementation of the [`QueueEntry`] trait
pub struct KafkaQueueEntry {
    consumer: Arc<ConnectorConsumer>,
    message: ConsumerMessage,
}

impl KafkaQueueEntry {
    pub(super) fn new<M: Message>(message: &M, consumer: Arc<ConnectorConsumer>) -> Self {
        let message = ConsumerMessage {
            topic: message.topic().to_owned(),
            partition: message.partition(),
            offset: message.offset(),
            payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        };

        Self { consumer, message }
    }
}

#[async_trait]
impl QueueEntry for KafkaQueueEntry {
    fn message(&self) -> &ConsumerMessage {
        &self.message
    }

    /// Stores the position after this entry which is then committed by the client in the background
    async fn acknowledge(&mut self) -> EmptyResult {
        let mut list = TopicPartitionList::new();
        list.add_partition_offset(
            &self.message.topic,
            self.message.partition,
            Offset::Offset(self.message.offset + 1),
        )?;

        self.consumer.store_offsets(&list)?;

        Ok(())
    }
}
