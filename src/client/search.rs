//! Payload shapes and operation contracts for the object-search host.

use serde::{Deserialize, Serialize};

use crate::router::{Notification, Request};

/// A search candidate as sent by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub key: String,
    pub label: String,
}

/// Full search result payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub candidates: Vec<Candidate>,
}

/// Completion flag for a candidate list reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadResult {
    #[serde(default)]
    pub completed: Option<bool>,
}

/// `search` with the query text, answered by `search_result`.
pub struct Search;

impl Request for Search {
    const KIND: &'static str = "search";
    const RESPONSE_KIND: &'static str = "search_result";
    type Params = str;
    type Response = SearchResult;
}

/// `reload` with no payload, answered by `reload_result`.
pub struct Reload;

impl Request for Reload {
    const KIND: &'static str = "reload";
    const RESPONSE_KIND: &'static str = "reload_result";
    type Params = ();
    // A host may answer with a bare `null`
    type Response = Option<ReloadResult>;
}

/// `select` with the chosen candidate name; no reply.
pub struct Select;

impl Notification for Select {
    const KIND: &'static str = "select";
    type Params = str;
}
