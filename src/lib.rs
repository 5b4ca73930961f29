//! # zwave-bridge
//!
//! Host-side bridge between a Z-Wave serial controller and an automation
//! service.
//!
//! The bridge decodes the controller's framed binary protocol from the
//! serial link, deduplicates application events per source node, and
//! forwards fresh events to a downstream automation service as a
//! fire-and-forget remote call.
//!
//! ## Architecture
//!
//! - **Protocol** (`protocol`): control bytes and length-prefixed data
//!   frames with an XOR checksum; a receive buffer restartable across
//!   arbitrary chunk boundaries.
//! - **Dispatch** (`handler`): command-name → handler map; unknown commands
//!   are dropped silently.
//! - **Supervision** (`supervisor`): one task owns the device lifecycle and
//!   reconnects forever at a fixed delay.
//!
//! ## Example
//!
//! ```ignore
//! use zwave_bridge::{Bridge, BridgeConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = BridgeConfig {
//!         device: "/dev/ttyUSB0".into(),
//!         downstream_host: "automation.local:8089".into(),
//!         ..BridgeConfig::default()
//!     };
//!
//!     let bridge = Bridge::builder(config).start();
//!     bridge.shutdown().await;
//! }
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod handler;
pub mod notify;
pub mod pipeline;
pub mod protocol;
pub mod supervisor;
pub mod transport;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use notify::Notifier;
pub use supervisor::{Bridge, BridgeBuilder, ConnectionState};
