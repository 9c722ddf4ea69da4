use std::fmt;

/// Partition of a topic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicPartition {
    /// Name of the topic
    pub topic: String,
    /// Index of the partition within the topic
    pub partition: i32,
}

impl TopicPartition {
    /// Creates a new instance from raw parts
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.topic, self.partition)
    }
}

/// Message read from a partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerMessage {
    /// Topic the message was published on
    pub topic: String,
    /// Partition of the topic which contained the message
    pub partition: i32,
    /// Position of the message within its partition
    pub offset: i64,
    /// Raw message value, empty for tombstones
    pub payload: Vec<u8>,
}

impl ConsumerMessage {
    /// Partition this message originates from
    pub fn topic_partition(&self) -> TopicPartition {
        TopicPartition::new(self.topic.clone(), self.partition)
    }
}
