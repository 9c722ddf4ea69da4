/// Name of a function deployed behind the gateway
pub type FunctionIdentifier = String;

/// Name of a topic on the broker
pub type Topic = String;

/// Declaration that a function wants to receive messages published on a topic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionRecord {
    /// Function to invoke
    pub function: FunctionIdentifier,
    /// Topic the function listens on
    pub topic: Topic,
}

impl SubscriptionRecord {
    /// Creates a new instance from raw parts
    pub fn new(function: impl Into<FunctionIdentifier>, topic: impl Into<Topic>) -> Self {
        Self {
            function: function.into(),
            topic: topic.into(),
        }
    }
}
