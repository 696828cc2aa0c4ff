//! Inbound pump task.
//!
//! Hosts that hand over raw messages on a queue instead of calling
//! [`Bridge::deliver`] directly can spawn this task to do the delivery.
//!
//! The task:
//! - Runs in a spawned tokio task
//! - Reads raw wire strings from an mpsc receiver
//! - Feeds each one to `Bridge::deliver` in arrival order
//! - Stops when the queue closes or its handle is dropped

use std::sync::Arc;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::adapter::Bridge;

/// Handle to a running inbound pump.
///
/// Dropping the handle cancels the task.
pub struct InboundTaskHandle {
    join_handle: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl InboundTaskHandle {
    /// Stop the pump and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }
}

impl Drop for InboundTaskHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

/// Spawn a task delivering raw messages from `rx` into `bridge`.
pub fn spawn_inbound_task(
    bridge: Arc<Bridge>,
    rx: mpsc::UnboundedReceiver<String>,
) -> InboundTaskHandle {
    let cancel_token = CancellationToken::new();
    let join_handle = tokio::spawn(inbound_loop(bridge, rx, cancel_token.clone()));

    InboundTaskHandle {
        join_handle: Some(join_handle),
        cancel_token,
    }
}

async fn inbound_loop(
    bridge: Arc<Bridge>,
    mut rx: mpsc::UnboundedReceiver<String>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                debug!(
                    target: "ipc_bridge::pump",
                    "Inbound task cancelled, shutting down"
                );
                break;
            }

            raw = rx.recv() => {
                match raw {
                    Some(raw) => bridge.deliver(&raw),
                    None => {
                        debug!(
                            target: "ipc_bridge::pump",
                            "Inbound queue closed, shutting down"
                        );
                        break;
                    }
                }
            }
        }
    }
}
