//! Handler module - frame dispatch by command name.
//!
//! Provides:
//! - [`HandlerRegistry`] - maps command names to handlers
//! - [`ApplicationEventHandler`] - the built-in dedup-and-forward handler
//!
//! # Example
//!
//! ```
//! use zwave_bridge::handler::HandlerRegistry;
//! use zwave_bridge::protocol::DataFrame;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn("ApplicationUpdate", |frame: &DataFrame| {
//!     println!("node info changed: {:?}", frame.payload());
//! });
//! ```

mod application;
mod registry;

pub use application::{ApplicationEventHandler, EventSink};
pub use registry::{FrameHandler, HandlerRegistry};
