//! Correlation of inbound envelopes with one-shot waiters and subscribers.
//!
//! # Dispatch
//!
//! The router installs a single listener on the bridge. For every inbound
//! envelope it:
//! 1. detaches the waiters the envelope releases (per [`WaiterPolicy`]) and
//!    resolves them in FIFO order
//! 2. invokes every subscriber of the same type in registration order
//!
//! Both steps always run; one envelope can satisfy a waiter and all
//! subscribers of its type at once. No lock is held while callbacks run.

use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, error, trace};
use serde::Serialize;
use serde_json::Value;

use super::operation::{Notification, Request, Topic};
use super::pending::PendingReply;
use super::subscribers::{self, Subscriber, SubscriberTable};
use super::waiters::{self, WaiterTable};
use crate::bridge::{Bridge, BridgeContext};
use crate::config::WaiterPolicy;
use crate::error::{BridgeError, BridgeResult, lock_recovering};

/// Typed request/response and subscription API over the bridge.
///
/// Cheap to clone; clones share the same waiter and subscriber tables.
#[derive(Debug, Clone)]
pub struct Router {
    context: Arc<BridgeContext>,
    state: Arc<RouterState>,
}

/// State reachable from the bridge listener. Holds no reference back to
/// the context, so the bridge owning the listener creates no cycle.
#[derive(Debug)]
struct RouterState {
    tables: Mutex<RouterTables>,
    policy: WaiterPolicy,
    /// Set once the dispatch listener is installed on the bridge.
    attached: OnceLock<()>,
}

#[derive(Debug, Default)]
struct RouterTables {
    waiters: WaiterTable,
    subscribers: SubscriberTable,
}

impl Router {
    /// Create a router using the waiter policy from the context's settings.
    pub fn new(context: Arc<BridgeContext>) -> Self {
        let policy = context.settings().waiter_policy;
        Self::with_policy(context, policy)
    }

    pub fn with_policy(context: Arc<BridgeContext>, policy: WaiterPolicy) -> Self {
        Self {
            context,
            state: Arc::new(RouterState {
                tables: Mutex::new(RouterTables::default()),
                policy,
                attached: OnceLock::new(),
            }),
        }
    }

    pub fn policy(&self) -> WaiterPolicy {
        self.state.policy
    }

    /// Resolve the bridge, installing the dispatch listener on first success.
    fn bridge(&self) -> BridgeResult<Arc<Bridge>> {
        let bridge = self.context.bridge()?;
        self.state.attached.get_or_init(|| {
            let state = Arc::clone(&self.state);
            bridge.on_message(move |kind, data| state.dispatch(kind, data));
            debug!(target: "ipc_bridge::router", "Router attached to bridge");
        });
        Ok(bridge)
    }

    /// Fire-and-forget send.
    ///
    /// Only fails with [`BridgeError::NotReady`]; transport failures are
    /// logged by the bridge.
    pub fn send<P: Serialize + ?Sized>(&self, kind: &str, params: &P) -> BridgeResult<()> {
        self.bridge()?.send(kind, params);
        Ok(())
    }

    /// Send `kind` and wait for the next unclaimed `response_kind` envelope.
    ///
    /// The waiter is queued before the envelope is transmitted, so calls
    /// made back-to-back are paired with responses in call order. Nothing is
    /// sent if the bridge is not ready.
    pub fn request<P: Serialize + ?Sized>(
        &self,
        kind: &str,
        params: &P,
        response_kind: &str,
    ) -> BridgeResult<PendingReply> {
        self.request_as(kind, params, response_kind)
    }

    fn request_as<P, T>(
        &self,
        kind: &str,
        params: &P,
        response_kind: &str,
    ) -> BridgeResult<PendingReply<T>>
    where
        P: Serialize + ?Sized,
    {
        let bridge = self.bridge()?;
        let rx = self
            .state
            .lock_tables("Router::request")
            .waiters
            .register(response_kind);
        bridge.send(kind, params);
        Ok(PendingReply::new(response_kind, rx))
    }

    /// Typed request for a declared [`Request`] operation.
    pub fn call<R: Request>(
        &self,
        params: &R::Params,
    ) -> BridgeResult<PendingReply<R::Response>> {
        self.request_as(R::KIND, params, R::RESPONSE_KIND)
    }

    /// Typed fire-and-forget for a declared [`Notification`].
    pub fn notify<N: Notification>(&self, params: &N::Params) -> BridgeResult<()> {
        self.send(N::KIND, params)
    }

    /// Invoke `callback` with the payload of every future `kind` envelope.
    ///
    /// Subscriptions last for the life of the router; there is no removal.
    pub fn subscribe<F>(&self, kind: &str, callback: F) -> BridgeResult<()>
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.bridge()?;
        let subscriber: Subscriber = Arc::new(callback);
        self.state
            .lock_tables("Router::subscribe")
            .subscribers
            .add(kind, subscriber);
        Ok(())
    }

    /// Typed subscription for a declared [`Topic`].
    ///
    /// Payloads that fail to decode are logged and skipped for this
    /// subscriber only.
    pub fn subscribe_to<T, F>(&self, callback: F) -> BridgeResult<()>
    where
        T: Topic + 'static,
        F: Fn(T::Payload) + Send + Sync + 'static,
    {
        self.subscribe(T::KIND, move |data| {
            match serde_json::from_value::<T::Payload>(data.clone()) {
                Ok(payload) => callback(payload),
                Err(e) => error!(
                    target: "ipc_bridge::router",
                    "{}",
                    BridgeError::decode(T::KIND, e)
                ),
            }
        })
    }

    /// Number of one-shot waiters queued for `kind`.
    pub fn pending_count(&self, kind: &str) -> usize {
        self.state
            .lock_tables("Router::pending_count")
            .waiters
            .pending_count(kind)
    }

    pub fn subscriber_count(&self, kind: &str) -> usize {
        self.state
            .lock_tables("Router::subscriber_count")
            .subscribers
            .count(kind)
    }
}

impl RouterState {
    fn lock_tables(&self, context: &str) -> std::sync::MutexGuard<'_, RouterTables> {
        lock_recovering(self.tables.lock(), context)
    }

    fn dispatch(&self, kind: &str, data: &Value) {
        let (released, subscribers) = {
            let mut tables = self.lock_tables("Router::dispatch");
            (
                tables.waiters.take(kind, self.policy),
                tables.subscribers.snapshot(kind),
            )
        };

        if released.is_empty() && subscribers.is_empty() {
            trace!(
                target: "ipc_bridge::router",
                "No waiters or subscribers for '{}'",
                kind
            );
            return;
        }

        waiters::resolve_all(kind, released, data);
        subscribers::notify_all(kind, &subscribers, data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{Envelope, QueueTransmit};
    use serde_json::json;

    type SentQueue = tokio::sync::mpsc::UnboundedReceiver<String>;

    fn ready_router(policy: WaiterPolicy) -> (Router, Arc<Bridge>, SentQueue) {
        let context = Arc::new(BridgeContext::new());
        let (transmit, sent) = QueueTransmit::channel();
        let bridge = context.init(transmit);
        (Router::with_policy(context, policy), bridge, sent)
    }

    #[test]
    fn router_takes_policy_from_settings() {
        let settings = crate::config::BridgeSettings {
            waiter_policy: WaiterPolicy::Broadcast,
            ..Default::default()
        };
        let router = Router::new(Arc::new(BridgeContext::with_settings(settings)));
        assert_eq!(router.policy(), WaiterPolicy::Broadcast);
    }

    #[test]
    fn request_queues_waiter_then_sends() {
        let (router, _bridge, mut sent) = ready_router(WaiterPolicy::Fifo);

        let _reply = router.request("search", "abc", "search_result").unwrap();

        assert_eq!(router.pending_count("search_result"), 1);
        assert_eq!(
            sent.try_recv().unwrap(),
            r#"{"type":"search","data":"abc"}"#
        );
    }

    #[test]
    fn router_attaches_single_listener() {
        let (router, bridge, _sent) = ready_router(WaiterPolicy::Fifo);

        router.send("select", "a").unwrap();
        router.subscribe("tick", |_| {}).unwrap();
        router.clone().send("select", "b").unwrap();

        assert_eq!(bridge.listener_count(), 1);
    }

    #[tokio::test]
    async fn broadcast_policy_resolves_all_queued_waiters_with_one_envelope() {
        let (router, bridge, _sent) = ready_router(WaiterPolicy::Broadcast);

        let first = router.request("reload", &(), "reload_result").unwrap();
        let second = router.request("reload", &(), "reload_result").unwrap();

        bridge.emit(Envelope::new("reload_result", json!({"completed": true})));

        assert_eq!(first.await.unwrap(), json!({"completed": true}));
        assert_eq!(second.await.unwrap(), json!({"completed": true}));
        assert_eq!(router.pending_count("reload_result"), 0);
    }

    #[tokio::test]
    async fn unrelated_envelope_leaves_waiters_queued() {
        let (router, bridge, _sent) = ready_router(WaiterPolicy::Fifo);
        let _reply = router.request("search", "q", "search_result").unwrap();

        bridge.emit(Envelope::new("reload_result", json!({})));

        assert_eq!(router.pending_count("search_result"), 1);
    }

    #[test]
    fn subscriber_registered_during_dispatch_sees_next_envelope_only() {
        let (router, bridge, _sent) = ready_router(WaiterPolicy::Fifo);
        let hits = Arc::new(Mutex::new(Vec::new()));

        let inner_router = router.clone();
        let inner_hits = Arc::clone(&hits);
        router
            .subscribe("tick", move |data| {
                inner_hits.lock().unwrap().push(format!("outer:{}", data));
                let late_hits = Arc::clone(&inner_hits);
                if data == &json!(1) {
                    inner_router
                        .subscribe("tick", move |data| {
                            late_hits.lock().unwrap().push(format!("late:{}", data));
                        })
                        .unwrap();
                }
            })
            .unwrap();

        bridge.emit(Envelope::new("tick", json!(1)));
        bridge.emit(Envelope::new("tick", json!(2)));

        assert_eq!(
            *hits.lock().unwrap(),
            vec!["outer:1", "outer:2", "late:2"]
        );
    }
}
