//! Connection supervision.
//!
//! The supervisor owns the device handle lifecycle: open the serial link,
//! pump its chunks through the pipeline, detect loss, and reconnect after a
//! fixed delay, forever. There is no retry limit, no backoff, and no
//! fatal state; the only externally visible condition is "not currently
//! connected, retrying", published through a watch channel.
//!
//! # Example
//!
//! ```ignore
//! use zwave_bridge::{Bridge, BridgeConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bridge = Bridge::builder(BridgeConfig::default()).start();
//!     // ... observe bridge.state_watch(), then:
//!     bridge.shutdown().await;
//! }
//! ```

use std::path::Path;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::handler::{ApplicationEventHandler, FrameHandler, HandlerRegistry};
use crate::notify::Notifier;
use crate::pipeline::{ack_bytes, Pipeline};
use crate::protocol::{commands, DataFrame};
use crate::transport::SerialLink;

/// Connection lifecycle of one supervised device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not yet opened, or shut down.
    Closed,
    /// Device open, pipeline attached.
    Open,
    /// Device lost or absent; a retry is pending.
    Reconnecting,
}

/// What the supervise loop needs from an open device connection.
///
/// `SerialLink` is the production implementation; tests substitute a fake.
pub(crate) trait DeviceLink: Send {
    /// Next chunk of raw bytes, or `None` once the device is gone.
    async fn recv_chunk(&mut self) -> Option<Vec<u8>>;
    /// Queue raw bytes for transmission.
    fn send(&self, bytes: Vec<u8>) -> Result<()>;
}

impl DeviceLink for SerialLink {
    async fn recv_chunk(&mut self) -> Option<Vec<u8>> {
        SerialLink::recv_chunk(self).await
    }

    fn send(&self, bytes: Vec<u8>) -> Result<()> {
        SerialLink::send(self, bytes)
    }
}

/// Builder for configuring and starting a bridge.
///
/// Handlers are registered by command name. If no handler is registered for
/// the application command report, the built-in dedup-and-notify handler is
/// installed from the configuration at start.
pub struct BridgeBuilder {
    config: BridgeConfig,
    registry: HandlerRegistry,
}

impl BridgeBuilder {
    /// Create a builder for the given configuration.
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::new(),
        }
    }

    /// Register a handler for a command name.
    pub fn handler<H>(mut self, name: &'static str, handler: H) -> Self
    where
        H: FrameHandler + 'static,
    {
        self.registry.register(name, handler);
        self
    }

    /// Register a closure handler for a command name.
    pub fn handler_fn<F>(mut self, name: &'static str, handler: F) -> Self
    where
        F: FnMut(&DataFrame) + Send + 'static,
    {
        self.registry.register_fn(name, handler);
        self
    }

    /// Start the bridge: spawn the supervise task and return its handle.
    pub fn start(self) -> Bridge {
        let mut registry = self.registry;
        if !registry.contains(commands::APPLICATION_COMMAND_HANDLER_NAME) {
            let notifier = Notifier::from_config(&self.config);
            registry.register(
                commands::APPLICATION_COMMAND_HANDLER_NAME,
                ApplicationEventHandler::new(notifier),
            );
        }

        let pipeline = Pipeline::new(registry, self.config.checksum_policy);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Closed);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(supervise(
            self.config,
            pipeline,
            state_tx,
            cancel.clone(),
            |config: &BridgeConfig| SerialLink::open(&config.device, config.baud_rate),
        ));

        Bridge {
            state_rx,
            cancel,
            task,
        }
    }
}

/// A running bridge.
pub struct Bridge {
    state_rx: watch::Receiver<ConnectionState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Bridge {
    /// Create a bridge builder.
    pub fn builder(config: BridgeConfig) -> BridgeBuilder {
        BridgeBuilder::new(config)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch channel for observing state transitions.
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Stop the bridge: cancels any pending reconnect, closes the device,
    /// and waits for the supervise task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// The supervise loop: open, pump, reconnect, repeat until cancelled.
async fn supervise<L, F>(
    config: BridgeConfig,
    mut pipeline: Pipeline,
    state_tx: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    mut open_link: F,
) where
    L: DeviceLink,
    F: FnMut(&BridgeConfig) -> Result<L>,
{
    let delay = config.reconnect_delay();

    'outer: while !cancel.is_cancelled() {
        // A device node that is not present cannot be opened; just wait out
        // the delay and look again.
        if !Path::new(&config.device).exists() {
            debug!(device = %config.device, "device path absent, retrying");
            let _ = state_tx.send(ConnectionState::Reconnecting);
            if sleep_or_cancelled(&cancel, delay).await {
                break;
            }
            continue;
        }

        let mut link = match open_link(&config) {
            Ok(link) => link,
            Err(err) => {
                warn!(device = %config.device, error = %err, "failed to open device");
                let _ = state_tx.send(ConnectionState::Reconnecting);
                if sleep_or_cancelled(&cancel, delay).await {
                    break;
                }
                continue;
            }
        };

        info!(device = %config.device, "serial device open");
        let _ = state_tx.send(ConnectionState::Open);
        pipeline.reset();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break 'outer,
                chunk = link.recv_chunk() => match chunk {
                    Some(bytes) => {
                        // One acknowledgment per drained batch of data
                        // frames, not one per frame.
                        if pipeline.feed(&bytes) {
                            if let Err(err) = link.send(ack_bytes()) {
                                warn!(error = %err, "failed to queue acknowledgment");
                            }
                        }
                    }
                    None => break,
                },
            }
        }

        warn!(device = %config.device, "serial connection lost, scheduling reconnect");
        let _ = state_tx.send(ConnectionState::Reconnecting);
        if sleep_or_cancelled(&cancel, delay).await {
            break;
        }
    }

    let _ = state_tx.send(ConnectionState::Closed);
}

/// Wait out the reconnect delay. Returns `true` when cancelled instead, so
/// shutting down cannot resurrect a deliberately closed connection.
async fn sleep_or_cancelled(cancel: &CancellationToken, delay: std::time::Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => true,
        _ = tokio::time::sleep(delay) => false,
    }
}
