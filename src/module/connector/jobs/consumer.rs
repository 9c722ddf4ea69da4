use super::super::dispatcher::FunctionInvoker;
use super::super::index::TopicFunctionIndex;
use super::super::options::DispatchMode;
use crate::library::communication::event::{
    OffsetTracker, QueueEntry, QueueEvent, QueueProvider,
};
use crate::library::EmptyResult;
use async_trait::async_trait;
use futures::future::join_all;
use futures::stream::{Stream, StreamExt};
use jatsl::{Job, JobManager};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
enum ConsumerError {
    #[error("event stream ended unexpectedly")]
    UnexpectedTermination,
}

/// Consumes the configured topics and forwards every message to its subscribers
pub struct ConsumerJob<P, I> {
    provider: Arc<P>,
    index: Arc<TopicFunctionIndex>,
    invoker: Arc<I>,
    topics: Vec<String>,
    mode: DispatchMode,
}

impl<P, I> ConsumerJob<P, I> {
    /// Creates a new instance from raw parts
    pub fn new(
        provider: Arc<P>,
        index: Arc<TopicFunctionIndex>,
        invoker: Arc<I>,
        topics: Vec<String>,
        mode: DispatchMode,
    ) -> Self {
        Self {
            provider,
            index,
            invoker,
            topics,
            mode,
        }
    }
}

#[async_trait]
impl<P, I> Job for ConsumerJob<P, I>
where
    P: QueueProvider + Send + Sync,
    I: FunctionInvoker + Send + Sync,
{
    const NAME: &'static str = module_path!();

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let events = self.provider.consume(&self.topics).await?;
        info!(topics = ?self.topics, "Binding to topics");

        manager.ready().await;

        ConsumerLoop::new(self.index.clone(), self.invoker.clone(), self.mode)
            .run(events)
            .await;

        Err(ConsumerError::UnexpectedTermination.into())
    }
}

/// Processes the events of a consumer group membership
///
/// Messages are handled one at a time. Each message is acknowledged only after
/// all its invocations completed, regardless of their outcome.
pub struct ConsumerLoop<I> {
    index: Arc<TopicFunctionIndex>,
    invoker: Arc<I>,
    mode: DispatchMode,
    offsets: OffsetTracker,
    received: u32,
}

impl<I> ConsumerLoop<I>
where
    I: FunctionInvoker + Send + Sync,
{
    /// Creates a new loop with no processed messages
    pub fn new(index: Arc<TopicFunctionIndex>, invoker: Arc<I>, mode: DispatchMode) -> Self {
        Self {
            index,
            invoker,
            mode,
            offsets: OffsetTracker::default(),
            received: 0,
        }
    }

    /// Handles events until the stream ends
    pub async fn run<E, S>(&mut self, mut events: S)
    where
        E: QueueEntry + Send + Sync,
        S: Stream<Item = QueueEvent<E>> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.handle(event).await;
        }

        warn!("Event stream has ended");
    }

    async fn handle<E>(&mut self, event: QueueEvent<E>)
    where
        E: QueueEntry + Send + Sync,
    {
        match event {
            QueueEvent::Entry(entry) => self.process(entry).await,
            QueueEvent::Error(error) => warn!(%error, "Consumer error"),
            QueueEvent::Rebalance(notification) => info!(%notification, "Rebalanced"),
        }
    }

    async fn process<E>(&mut self, mut entry: E)
    where
        E: QueueEntry + Send + Sync,
    {
        self.received = (self.received + 1) % i32::MAX as u32;

        let message = entry.message();
        info!(
            "[#{}] Received on [{},{}]",
            self.received, message.topic, message.partition
        );

        if message.payload.is_empty() {
            debug!(offset = message.offset, "Dropping message without payload");
        } else {
            self.dispatch(&message.topic, &message.payload).await;
        }

        if self.offsets.advance(entry.message()) {
            if let Err(error) = entry.acknowledge().await {
                let message = entry.message();
                warn!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    %error,
                    "Unable to acknowledge message"
                );
            }
        }
    }

    #[instrument(skip(self, payload), fields(bytes = payload.len()))]
    async fn dispatch(&self, topic: &str, payload: &[u8]) {
        let functions = self.index.matching(topic);

        if functions.is_empty() {
            debug!("No subscribers");
            return;
        }

        match self.mode {
            DispatchMode::Sequential => {
                for function in &functions {
                    self.invoker.invoke(function, payload).await;
                }
            }
            DispatchMode::Concurrent => {
                join_all(
                    functions
                        .iter()
                        .map(|function| self.invoker.invoke(function, payload)),
                )
                .await;
            }
        }
    }
}

#[cfg(test)]
mod does {
    use super::super::super::dispatcher::mock::RecordingInvoker;
    use super::*;
    use crate::domain::SubscriptionRecord;
    use crate::library::communication::event::{RebalanceNotification, TopicPartition};
    use crate::library::communication::implementation::mock::MockQueueProvider;
    use pretty_assertions::assert_eq;

    fn index(records: &[(&str, &str)]) -> Arc<TopicFunctionIndex> {
        let index = TopicFunctionIndex::default();
        let records: Vec<_> = records
            .iter()
            .map(|(function, topic)| SubscriptionRecord::new(*function, *topic))
            .collect();

        index.sync(&records);
        Arc::new(index)
    }

    async fn consume(
        provider: &MockQueueProvider,
        index: Arc<TopicFunctionIndex>,
        invoker: Arc<RecordingInvoker>,
        mode: DispatchMode,
    ) {
        let events = provider.consume(&["orders".to_owned()]).await.unwrap();
        ConsumerLoop::new(index, invoker, mode).run(events).await;
    }

    fn acked(topic: &str, partition: i32, offset: i64) -> (String, i32, i64) {
        (topic.to_owned(), partition, offset)
    }

    #[tokio::test]
    async fn route_messages_to_subscribers() {
        let provider = MockQueueProvider::default();
        provider.push_message("payments", 0, 0, b"paid");
        provider.push_message("shipping", 0, 0, b"shipped");

        let invoker = Arc::new(RecordingInvoker::default());
        let index = index(&[("f1", "orders"), ("f2", "orders"), ("f1", "payments")]);

        consume(&provider, index, invoker.clone(), DispatchMode::Sequential).await;

        assert_eq!(invoker.invocations(), vec![("f1".to_owned(), b"paid".to_vec())]);
        assert_eq!(
            provider.acknowledged(),
            vec![acked("payments", 0, 0), acked("shipping", 0, 0)]
        );
    }

    #[tokio::test]
    async fn fan_out_identical_payloads() {
        let payload = vec![0u8, 1, 2, 255, b'\n'];
        let provider = MockQueueProvider::default();
        provider.push_message("orders", 0, 5, &payload);

        let invoker = Arc::new(RecordingInvoker::default());
        consume(
            &provider,
            index(&[("f1", "orders"), ("f2", "orders")]),
            invoker.clone(),
            DispatchMode::Sequential,
        )
        .await;

        assert_eq!(
            invoker.invocations(),
            vec![("f1".to_owned(), payload.clone()), ("f2".to_owned(), payload)]
        );
        assert_eq!(provider.acknowledged(), vec![acked("orders", 0, 5)]);
    }

    #[tokio::test]
    async fn acknowledge_empty_payloads_without_dispatch() {
        let provider = MockQueueProvider::default();
        provider.push_message("orders", 0, 0, b"");

        let invoker = Arc::new(RecordingInvoker::default());
        consume(&provider, index(&[("f1", "orders")]), invoker.clone(), DispatchMode::Sequential).await;

        assert!(invoker.invocations().is_empty());
        assert_eq!(provider.acknowledged(), vec![acked("orders", 0, 0)]);
    }

    #[tokio::test]
    async fn acknowledge_in_receive_order() {
        let provider = MockQueueProvider::default();
        provider.push_message("orders", 0, 0, b"a");
        provider.push_message("orders", 1, 0, b"b");
        provider.push_message("orders", 0, 1, b"c");
        provider.push_message("orders", 0, 2, b"d");
        provider.push_message("orders", 1, 1, b"e");

        let invoker = Arc::new(RecordingInvoker::default());
        consume(&provider, index(&[("f1", "orders")]), invoker.clone(), DispatchMode::Sequential).await;

        let partition_zero: Vec<i64> = provider
            .acknowledged()
            .into_iter()
            .filter(|(_, partition, _)| *partition == 0)
            .map(|(_, _, offset)| offset)
            .collect();

        assert_eq!(partition_zero, vec![0, 1, 2]);
        assert_eq!(provider.acknowledged().len(), 5);
        assert_eq!(invoker.invocations().len(), 5);
    }

    #[tokio::test]
    async fn not_acknowledge_redelivered_messages_twice() {
        let provider = MockQueueProvider::default();
        provider.push_message("orders", 0, 3, b"a");
        provider.push_message("orders", 0, 4, b"b");
        provider.push_rebalance(RebalanceNotification::Assigned(vec![TopicPartition::new(
            "orders", 0,
        )]));
        provider.push_message("orders", 0, 4, b"b");

        let invoker = Arc::new(RecordingInvoker::default());
        consume(&provider, index(&[("f1", "orders")]), invoker.clone(), DispatchMode::Sequential).await;

        assert_eq!(invoker.invocations().len(), 3);
        assert_eq!(
            provider.acknowledged(),
            vec![acked("orders", 0, 3), acked("orders", 0, 4)]
        );
    }

    #[tokio::test]
    async fn continue_after_errors_and_rebalances() {
        let provider = MockQueueProvider::default();
        provider.push_error("broker transport failure");
        provider.push_rebalance(RebalanceNotification::Revoked(vec![]));
        provider.push_message("orders", 0, 0, b"a");

        let invoker = Arc::new(RecordingInvoker::default());
        consume(&provider, index(&[("f1", "orders")]), invoker.clone(), DispatchMode::Sequential).await;

        assert_eq!(invoker.invoked_functions(), vec!["f1"]);
        assert_eq!(provider.acknowledged(), vec![acked("orders", 0, 0)]);
    }

    #[tokio::test]
    async fn acknowledge_despite_failed_invocations() {
        let provider = MockQueueProvider::default();
        provider.push_message("orders", 0, 0, b"a");

        let invoker = Arc::new(RecordingInvoker::failing());
        consume(&provider, index(&[("f1", "orders")]), invoker.clone(), DispatchMode::Sequential).await;

        assert_eq!(invoker.invoked_functions(), vec!["f1"]);
        assert_eq!(provider.acknowledged(), vec![acked("orders", 0, 0)]);
    }

    #[tokio::test]
    async fn dispatch_concurrently() {
        let provider = MockQueueProvider::default();
        provider.push_message("orders", 0, 0, b"a");

        let invoker = Arc::new(RecordingInvoker::default());
        consume(
            &provider,
            index(&[("f1", "orders"), ("f2", "orders"), ("f3", "orders")]),
            invoker.clone(),
            DispatchMode::Concurrent,
        )
        .await;

        let mut functions = invoker.invoked_functions();
        functions.sort();

        assert_eq!(functions, vec!["f1", "f2", "f3"]);
        assert_eq!(provider.acknowledged(), vec![acked("orders", 0, 0)]);
    }

    #[tokio::test]
    async fn subscribe_to_topics() {
        let provider = Arc::new(MockQueueProvider::default());
        let job = ConsumerJob::new(
            provider.clone(),
            index(&[]),
            Arc::new(RecordingInvoker::default()),
            vec!["orders".to_owned(), "payments".to_owned()],
            DispatchMode::Sequential,
        );

        let events = job.provider.consume(&job.topics).await.unwrap();
        drop(events);

        assert_eq!(provider.subscriptions(), vec!["orders", "payments"]);
    }
}
