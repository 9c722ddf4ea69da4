//! Structures to realise a reliable, event-driven consumer
//!
//! Messages are read from topics which are split into partitions. Within a partition, every
//! message is identified by a monotonically increasing offset. Consumers join a
//! consumer group and the broker assigns each partition to exactly
//! one member of the group (effectively implementing load balancing and simple, dynamic
//! scalability). Whenever members join or leave, partitions are redistributed and a
//! [`RebalanceNotification`] is emitted.
//!
//! All messages have to be acknowledged once processing concludes. Upon crashing, the group
//! resumes from the last acknowledged offset of each partition. This ensures that no
//! [`QueueEntries`](QueueEntry) are left unprocessed, at the price of potentially processing
//! a message more than once. The [`OffsetTracker`] helps consumers to only ever move the
//! acknowledged position of a partition forward.

mod message;
mod offset;
mod queue;
mod queue_provider;

pub use message::*;
pub use offset::*;
pub use queue::*;
pub use queue_provider::*;
