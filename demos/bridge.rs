//! Minimal bridge wiring: open the controller, forward events, log frames.
//!
//! ```sh
//! cargo run --example bridge -- /dev/ttyUSB0 automation.local:8089
//! ```

use zwave_bridge::protocol::DataFrame;
use zwave_bridge::{Bridge, BridgeConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zwave_bridge=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = BridgeConfig {
        device: args.next().unwrap_or_else(|| "/dev/ttyUSB0".into()),
        downstream_host: args.next().unwrap_or_else(|| "localhost:8089".into()),
        ..BridgeConfig::default()
    };

    let bridge = Bridge::builder(config)
        .handler_fn("ApplicationUpdate", |frame: &DataFrame| {
            tracing::info!(payload = ?frame.payload(), "node info changed");
        })
        .start();

    let mut state = bridge.state_watch();
    tokio::spawn(async move {
        while state.changed().await.is_ok() {
            tracing::info!(state = ?*state.borrow(), "connection state");
        }
    });

    tokio::signal::ctrl_c().await.expect("signal handler");
    bridge.shutdown().await;
}
