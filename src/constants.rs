//! Values shared by all instances of a deployment

/// Consumer group joined by every connector instance
///
/// All instances of a deployment share it and thus split the partitions between each other.
pub const CONSUMER_GROUP: &str = "faas-kafka-queue-workers";

/// Port appended to broker hosts which do not specify one
pub const DEFAULT_BROKER_PORT: u16 = 9092;

/// Function annotation listing the topics a function subscribes to
pub const TOPIC_ANNOTATION: &str = "topic";
