use super::{ConsumerMessage, TopicPartition};
use std::collections::HashMap;
use tracing::debug;

/// Bookkeeping of the last acknowledged offset for each partition
///
/// Entries are acknowledged strictly in the order they are received. Redelivered entries
/// (e.g. after a partition moved back to this consumer) are processed again but never move
/// the acknowledged position backwards.
#[derive(Debug, Default)]
pub struct OffsetTracker {
    acknowledged: HashMap<TopicPartition, i64>,
}

impl OffsetTracker {
    /// Records the message as processed and returns whether its partition moved forward,
    /// i.e. whether the message has to be acknowledged.
    pub fn advance(&mut self, message: &ConsumerMessage) -> bool {
        let partition = message.topic_partition();

        match self.acknowledged.get(&partition).copied() {
            Some(last) if message.offset <= last => {
                debug!(%partition, offset = message.offset, last, "Offset already acknowledged");
                false
            }
            Some(last) => {
                if message.offset != last + 1 {
                    debug!(%partition, offset = message.offset, last, "Skipped over offsets");
                }

                self.acknowledged.insert(partition, message.offset);
                true
            }
            None => {
                self.acknowledged.insert(partition, message.offset);
                true
            }
        }
    }
}
