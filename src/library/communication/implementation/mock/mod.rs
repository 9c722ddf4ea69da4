mod queue_provider;

pub use queue_provider::MockQueueProvider;
