use crate::domain::{FunctionIdentifier, SubscriptionRecord, Topic};
use arc_swap::ArcSwap;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

type TopicMap = HashMap<Topic, BTreeSet<FunctionIdentifier>>;

/// Routing table from topics to their subscribed functions
///
/// Readers always observe a complete snapshot. Every [`sync`](Self::sync) builds a new
/// map and publishes it in one atomic swap without blocking concurrent lookups.
#[derive(Default)]
pub struct TopicFunctionIndex {
    current: ArcSwap<TopicMap>,
}

impl TopicFunctionIndex {
    /// Replaces the routing table with one built from the given records.
    /// Returns whether the new table differs from the previous one.
    pub fn sync(&self, subscriptions: &[SubscriptionRecord]) -> bool {
        let mut map = TopicMap::new();

        for record in subscriptions {
            map.entry(record.topic.clone())
                .or_default()
                .insert(record.function.clone());
        }

        let map = Arc::new(map);
        let previous = self.current.swap(map.clone());
        previous != map
    }

    /// Functions subscribed to the topic, empty if there are none
    pub fn matching(&self, topic: &str) -> BTreeSet<FunctionIdentifier> {
        self.current.load().get(topic).cloned().unwrap_or_default()
    }

    /// Current routing table
    pub fn snapshot(&self) -> Arc<TopicMap> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn set(functions: &[&str]) -> BTreeSet<FunctionIdentifier> {
        functions.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn start_empty() {
        let index = TopicFunctionIndex::default();

        assert!(index.matching("orders").is_empty());
        assert!(index.snapshot().is_empty());
    }

    #[test]
    fn group_functions_by_topic() {
        let index = TopicFunctionIndex::default();

        index.sync(&[
            SubscriptionRecord::new("f1", "orders"),
            SubscriptionRecord::new("f2", "orders"),
            SubscriptionRecord::new("f1", "payments"),
        ]);

        assert_eq!(index.matching("orders"), set(&["f1", "f2"]));
        assert_eq!(index.matching("payments"), set(&["f1"]));
        assert_eq!(index.matching("shipping"), set(&[]));
    }

    #[test]
    fn replace_previous_table_entirely() {
        let index = TopicFunctionIndex::default();

        index.sync(&[SubscriptionRecord::new("f1", "orders")]);
        index.sync(&[SubscriptionRecord::new("f2", "payments")]);

        assert!(index.matching("orders").is_empty());
        assert_eq!(index.matching("payments"), set(&["f2"]));
    }

    #[test]
    fn report_changes() {
        let index = TopicFunctionIndex::default();
        let records = [SubscriptionRecord::new("f1", "orders")];

        assert!(index.sync(&records));
        assert!(!index.sync(&records));
        assert!(index.sync(&[]));
    }

    #[test]
    fn never_expose_partial_tables() {
        let index = Arc::new(TopicFunctionIndex::default());
        let done = Arc::new(AtomicBool::new(false));

        let first = vec![
            SubscriptionRecord::new("a1", "orders"),
            SubscriptionRecord::new("a2", "orders"),
            SubscriptionRecord::new("a3", "orders"),
        ];
        let second = vec![
            SubscriptionRecord::new("b1", "orders"),
            SubscriptionRecord::new("b2", "orders"),
        ];

        index.sync(&first);

        let writer = {
            let index = index.clone();
            let done = done.clone();

            thread::spawn(move || {
                for i in 0..2_000 {
                    index.sync(if i % 2 == 0 { &second } else { &first });
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let expected_first = set(&["a1", "a2", "a3"]);
        let expected_second = set(&["b1", "b2"]);

        while !done.load(Ordering::SeqCst) {
            let functions = index.matching("orders");
            assert!(functions == expected_first || functions == expected_second);
        }

        writer.join().unwrap();
    }
}
