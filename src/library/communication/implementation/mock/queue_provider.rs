use crate::library::communication::event::{
    ConsumerMessage, QueueEntry, QueueEvent, QueueProvider, RebalanceNotification,
};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::{Arc, Mutex};

type AcknowledgementLog = Arc<Mutex<Vec<ConsumerMessage>>>;

#[derive(Debug)]
pub struct MockQueueEntry {
    message: ConsumerMessage,
    acknowledged: AcknowledgementLog,
}

#[async_trait]
impl QueueEntry for MockQueueEntry {
    fn message(&self) -> &ConsumerMessage {
        &self.message
    }

    async fn acknowledge(&mut self) -> EmptyResult {
        self.acknowledged.lock().unwrap().push(self.message.clone());
        Ok(())
    }
}

/// Replays a prepared sequence of events and records every acknowledgement
#[derive(Default)]
pub struct MockQueueProvider {
    events: Mutex<Vec<QueueEvent<MockQueueEntry>>>,
    subscriptions: Mutex<Vec<String>>,
    acknowledged: AcknowledgementLog,
}

impl MockQueueProvider {
    pub fn push_message(&self, topic: &str, partition: i32, offset: i64, payload: &[u8]) {
        let entry = MockQueueEntry {
            message: ConsumerMessage {
                topic: topic.to_owned(),
                partition,
                offset,
                payload: payload.to_vec(),
            },
            acknowledged: self.acknowledged.clone(),
        };

        self.events.lock().unwrap().push(QueueEvent::Entry(entry));
    }

    pub fn push_error(&self, error: &str) {
        let error: BoxedError = error.into();
        self.events.lock().unwrap().push(QueueEvent::Error(error));
    }

    pub fn push_rebalance(&self, notification: RebalanceNotification) {
        self.events
            .lock()
            .unwrap()
            .push(QueueEvent::Rebalance(notification));
    }

    /// Acknowledged `(topic, partition, offset)` triples in order
    pub fn acknowledged(&self) -> Vec<(String, i32, i64)> {
        self.acknowledged
            .lock()
            .unwrap()
            .iter()
            .map(|message| (message.topic.clone(), message.partition, message.offset))
            .collect()
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueProvider for MockQueueProvider {
    type Entry = MockQueueEntry;

    async fn consume<'a>(
        &'a self,
        topics: &[String],
    ) -> Result<BoxStream<'a, QueueEvent<Self::Entry>>, BoxedError> {
        self.subscriptions.lock().unwrap().extend_from_slice(topics);

        let events = std::mem::take(&mut *self.events.lock().unwrap());
        Ok(stream::iter(events).boxed())
    }
}
