//! Persistent subscriber lists keyed by envelope type.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use log::error;
use serde_json::Value;

/// Callback invoked with the payload of every envelope of its type.
pub type Subscriber = Arc<dyn Fn(&Value) + Send + Sync>;

/// Subscriber lists in registration order. Entries are never removed.
#[derive(Default)]
pub(crate) struct SubscriberTable {
    lists: HashMap<String, Vec<Subscriber>>,
}

impl std::fmt::Debug for SubscriberTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .lists
            .iter()
            .map(|(kind, list)| (kind.as_str(), list.len()))
            .collect();
        f.debug_struct("SubscriberTable")
            .field("lists", &counts)
            .finish()
    }
}

impl SubscriberTable {
    pub(crate) fn add(&mut self, kind: &str, subscriber: Subscriber) {
        self.lists.entry(kind.to_string()).or_default().push(subscriber);
    }

    /// Clone the current list for `kind` so it can be invoked without the lock.
    pub(crate) fn snapshot(&self, kind: &str) -> Vec<Subscriber> {
        self.lists.get(kind).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, kind: &str) -> usize {
        self.lists.get(kind).map_or(0, Vec::len)
    }
}

/// Invoke each subscriber with `data`, isolating panics per subscriber.
pub(crate) fn notify_all(kind: &str, subscribers: &[Subscriber], data: &Value) {
    for subscriber in subscribers {
        if catch_unwind(AssertUnwindSafe(|| subscriber(data))).is_err() {
            error!(
                target: "ipc_bridge::router",
                "Subscriber for '{}' panicked, continuing with the rest",
                kind
            );
        }
    }
}
