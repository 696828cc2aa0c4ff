//! One-shot waiter queues keyed by envelope type.

use std::collections::{HashMap, VecDeque};

use log::debug;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::WaiterPolicy;

/// FIFO queues of single-use reply slots, one queue per response type.
#[derive(Debug, Default)]
pub(crate) struct WaiterTable {
    queues: HashMap<String, VecDeque<oneshot::Sender<Value>>>,
}

impl WaiterTable {
    /// Queue a waiter for the next envelope of `kind` and return its receiver.
    pub(crate) fn register(&mut self, kind: &str) -> oneshot::Receiver<Value> {
        let (tx, rx) = oneshot::channel();
        self.queues.entry(kind.to_string()).or_default().push_back(tx);
        rx
    }

    /// Detach the waiters one envelope of `kind` releases under `policy`.
    ///
    /// Empty queues are removed so the map only holds types with waiters.
    pub(crate) fn take(
        &mut self,
        kind: &str,
        policy: WaiterPolicy,
    ) -> Vec<oneshot::Sender<Value>> {
        match policy {
            WaiterPolicy::Broadcast => self
                .queues
                .remove(kind)
                .map(Vec::from)
                .unwrap_or_default(),
            WaiterPolicy::Fifo => {
                let Some(queue) = self.queues.get_mut(kind) else {
                    return Vec::new();
                };
                let head = queue.pop_front();
                if queue.is_empty() {
                    self.queues.remove(kind);
                }
                head.into_iter().collect()
            }
        }
    }

    pub(crate) fn pending_count(&self, kind: &str) -> usize {
        self.queues.get(kind).map_or(0, VecDeque::len)
    }
}

/// Hand `data` to each detached waiter, in order.
///
/// A waiter whose caller dropped its reply future still consumed its slot;
/// the payload is discarded.
pub(crate) fn resolve_all(kind: &str, waiters: Vec<oneshot::Sender<Value>>, data: &Value) {
    for waiter in waiters {
        if waiter.send(data.clone()).is_err() {
            debug!(
                target: "ipc_bridge::router",
                "Waiter for '{}' went away before its reply, discarding",
                kind
            );
        }
    }
}
