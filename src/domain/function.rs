use super::{SubscriptionRecord, Topic};
use crate::constants::TOPIC_ANNOTATION;
use crate::library::helpers::split_list;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

/// Function as listed by the gateway registry
///
/// Only the fields relevant for routing are deserialized, everything else the
/// registry reports (replicas, image, labels, ...) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionDescription {
    /// Unique name of the function
    pub name: String,
    /// Free-form metadata attached to the deployment
    #[serde(default)]
    pub annotations: Option<HashMap<String, String>>,
}

impl FunctionDescription {
    /// Topics listed in the `topic` annotation
    pub fn topics(&self) -> BTreeSet<Topic> {
        self.annotations
            .as_ref()
            .and_then(|annotations| annotations.get(TOPIC_ANNOTATION))
            .map(|topics| split_list(topics).into_iter().collect())
            .unwrap_or_default()
    }

    /// One record for each topic the function subscribed to
    pub fn subscriptions(&self) -> impl Iterator<Item = SubscriptionRecord> + '_ {
        self.topics()
            .into_iter()
            .map(move |topic| SubscriptionRecord::new(self.name.clone(), topic))
    }
}
