use serde::{Deserialize, Serialize};

/// How queued one-shot waiters are released when a matching envelope arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaiterPolicy {
    /// Each envelope resolves only the oldest waiter of its type.
    #[default]
    Fifo,
    /// Each envelope drains and resolves every waiter of its type at once.
    Broadcast,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Debug-log every inbound envelope at the adapter.
    pub trace_envelopes: bool,
    pub waiter_policy: WaiterPolicy,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}
