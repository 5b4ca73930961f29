//! Downstream notification of accepted application events.
//!
//! Delivery is fire-and-forget: the call runs as a detached task so a slow
//! or unreachable automation service can never stall the serial reader.
//! Failures are logged and otherwise ignored; nothing is retried.

use serde_json::json;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::protocol::ApplicationEvent;

/// Fixed remote procedure prefix; the local host identity is appended to
/// form the full target name.
const TARGET_PREFIX: &str = "zwave_event_";

/// Sends accepted events to the automation service as a named remote call.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    /// Endpoint URL of the automation service.
    url: String,
    /// Remote procedure name: [`TARGET_PREFIX`] plus the host identity.
    target: String,
    /// Explicit gate; a disabled notifier drops events without spawning.
    enabled: bool,
}

impl Notifier {
    /// Build a notifier for the configured downstream service.
    pub fn new(downstream_host: &str, host_id: &str, enabled: bool) -> Self {
        let url = if downstream_host.contains("://") {
            downstream_host.to_string()
        } else {
            format!("http://{downstream_host}/")
        };
        Self {
            client: reqwest::Client::new(),
            url,
            target: format!("{TARGET_PREFIX}{host_id}"),
            enabled,
        }
    }

    /// Build a notifier from the bridge configuration.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(&config.downstream_host, &config.host_id, config.notify_enabled)
    }

    /// The remote procedure name this notifier calls.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether events are forwarded at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Action payload for an event: zero-padded node id then sub-node id.
    pub fn action_payload(event: &ApplicationEvent) -> String {
        format!("{:03}{:03}", event.node, event.sub_node)
    }

    /// Send the remote call for an accepted event.
    ///
    /// Spawns a detached task on the current runtime and returns
    /// immediately. A delivery failure is logged at warn level and never
    /// surfaces to the caller.
    pub fn notify(&self, event: &ApplicationEvent) {
        if !self.enabled {
            debug!(node = event.node, "notification disabled, dropping event");
            return;
        }

        let payload = Self::action_payload(event);
        let method = self.target.clone();
        debug!(%method, %payload, "forwarding event downstream");

        let request = self
            .client
            .post(&self.url)
            .json(&json!({ "method": method, "params": [payload] }));

        tokio::spawn(async move {
            if let Err(err) = request.send().await {
                warn!(error = %err, "downstream notification failed");
            }
        });
    }
}
