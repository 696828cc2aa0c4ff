//! Process-scoped home of the single [`Bridge`] instance.
//!
//! The application constructs one `BridgeContext` at startup and hands it
//! (behind an `Arc`) to every router that needs the channel. The bridge
//! inside is created on the first `init()` and never replaced; any later
//! `init()` returns the existing instance and has no side effects.

use std::sync::{Arc, OnceLock};

use log::debug;

use super::adapter::Bridge;
use super::transport::Transmit;
use crate::config::BridgeSettings;
use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Default)]
pub struct BridgeContext {
    bridge: OnceLock<Arc<Bridge>>,
    settings: BridgeSettings,
}

impl BridgeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BridgeSettings) -> Self {
        Self {
            bridge: OnceLock::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Install the bridge over `transport`, exactly once.
    ///
    /// If a bridge already exists, `transport` is dropped unused and the
    /// existing instance is returned.
    pub fn init<T>(&self, transport: T) -> Arc<Bridge>
    where
        T: Transmit + 'static,
    {
        let bridge = self.bridge.get_or_init(|| {
            debug!(target: "ipc_bridge::adapter", "IPC bridge initialized");
            Arc::new(Bridge::new(
                Box::new(transport),
                self.settings.trace_envelopes,
            ))
        });
        Arc::clone(bridge)
    }

    /// The installed bridge, or [`BridgeError::NotReady`] before `init()`.
    pub fn bridge(&self) -> BridgeResult<Arc<Bridge>> {
        self.bridge.get().cloned().ok_or(BridgeError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.bridge.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransmitError;
    use std::sync::Mutex;

    fn counting_transport(
        sink: Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl Transmit {
        move |_: String| -> Result<(), TransmitError> {
            sink.lock().unwrap().push(tag);
            Ok(())
        }
    }

    #[test]
    fn bridge_before_init_is_not_ready() {
        let context = BridgeContext::new();
        assert!(!context.is_ready());
        assert!(matches!(context.bridge(), Err(BridgeError::NotReady)));
    }

    #[test]
    fn second_init_returns_existing_instance() {
        let context = BridgeContext::new();
        let sent = Arc::new(Mutex::new(Vec::new()));

        let first = context.init(counting_transport(Arc::clone(&sent), "first"));
        let second = context.init(counting_transport(Arc::clone(&sent), "second"));

        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &context.bridge().unwrap()));

        second.send("ping", &());
        assert_eq!(*sent.lock().unwrap(), vec!["first"], "second transport unused");
    }

    #[test]
    fn init_applies_trace_setting() {
        let settings = BridgeSettings {
            trace_envelopes: true,
            ..Default::default()
        };
        let context = BridgeContext::with_settings(settings);
        let bridge = context.init(|_: String| -> Result<(), TransmitError> { Ok(()) });

        assert!(format!("{:?}", bridge).contains("trace_envelopes: true"));
        assert!(context.settings().trace_envelopes);
    }
}
