//! Application-facing operations for the object-search host.
//!
//! Thin wrappers that pin each call to its pre-agreed message kinds and
//! payload types. Everything here goes through [`Router`].

pub mod search;

use serde_json::Value;

use crate::error::BridgeResult;
use crate::router::Router;
pub use search::{Candidate, ReloadResult, SearchResult};
use search::{Reload, Search, Select};

#[derive(Debug, Clone)]
pub struct IpcClient {
    router: Router,
}

impl IpcClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Ask the host for candidates matching `query`.
    pub async fn search_query(&self, query: &str) -> BridgeResult<SearchResult> {
        log::info!(target: "ipc_bridge::client", "searching '{}'", query);
        let result = self.router.call::<Search>(query)?.await?;
        log::debug!(
            target: "ipc_bridge::client",
            "search returned {} candidate(s)",
            result.candidates.len()
        );
        Ok(result)
    }

    /// Ask the host to reload its candidate list.
    ///
    /// Returns the host's `completed` flag, `false` when it sent none.
    pub async fn reload_list(&self) -> BridgeResult<bool> {
        log::info!(target: "ipc_bridge::client", "reloading candidate list");
        let result = self.router.call::<Reload>(&())?.await?;
        Ok(result.and_then(|r| r.completed).unwrap_or(false))
    }

    /// Tell the host which candidate was chosen.
    pub fn confirm_candidate(&self, name: &str) -> BridgeResult<()> {
        self.router.notify::<Select>(name)
    }

    /// Subscribe to host-pushed `kind` events.
    pub fn on<F>(&self, kind: &str, callback: F) -> BridgeResult<()>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.router.subscribe(kind, callback)
    }
}
