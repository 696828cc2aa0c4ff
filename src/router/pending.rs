//! Future for an in-flight one-shot request.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{BridgeError, BridgeResult};

/// Resolves with the payload of the envelope that released this waiter.
///
/// There is no timeout: if the host never answers, this stays pending.
/// Dropping it does not unregister the waiter; its queue position is still
/// consumed by the next matching envelope.
#[must_use = "the reply is only observed by awaiting it"]
#[derive(Debug)]
pub struct PendingReply<T = Value> {
    kind: String,
    rx: oneshot::Receiver<Value>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PendingReply<T> {
    pub(crate) fn new(kind: &str, rx: oneshot::Receiver<Value>) -> Self {
        Self {
            kind: kind.to_string(),
            rx,
            _marker: PhantomData,
        }
    }

    /// The envelope type this reply is waiting for.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl<T: DeserializeOwned> Future for PendingReply<T> {
    type Output = BridgeResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(data)) => Poll::Ready(
                serde_json::from_value(data).map_err(|e| BridgeError::decode(&this.kind, e)),
            ),
            Poll::Ready(Err(_)) => Poll::Ready(Err(BridgeError::closed(&this.kind))),
            Poll::Pending => Poll::Pending,
        }
    }
}
