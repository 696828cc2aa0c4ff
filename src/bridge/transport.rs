//! Host-side raw transmit primitive.
//!
//! The host exposes exactly one outbound operation: hand it a serialized
//! message string. Anything implementing [`Transmit`] can stand in for it,
//! including plain closures.

use tokio::sync::mpsc;

use crate::error::TransmitError;

/// The host's raw `transmit(serializedMessage)` primitive.
pub trait Transmit: Send + Sync {
    fn transmit(&self, message: String) -> Result<(), TransmitError>;
}

impl<F> Transmit for F
where
    F: Fn(String) -> Result<(), TransmitError> + Send + Sync,
{
    fn transmit(&self, message: String) -> Result<(), TransmitError> {
        self(message)
    }
}

/// Transmit primitive backed by an unbounded queue.
///
/// The receiving half is typically drained by a host writer task. Sending
/// fails with [`TransmitError::Closed`] once that receiver is dropped.
#[derive(Debug, Clone)]
pub struct QueueTransmit {
    tx: mpsc::UnboundedSender<String>,
}

impl QueueTransmit {
    /// Create a transmit primitive and the receiver the host reads from.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transmit for QueueTransmit {
    fn transmit(&self, message: String) -> Result<(), TransmitError> {
        self.tx.send(message).map_err(|_| TransmitError::Closed)
    }
}
