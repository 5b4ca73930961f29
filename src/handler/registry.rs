//! Handler registry for dispatching data frames by command name.
//!
//! The registry maps semantic command names to handlers, populated once at
//! initialization. Frames whose command id has no table entry, or whose
//! name has no registered handler, are dropped silently: unrecognized
//! commands from newer controller firmware must not be an error.
//!
//! # Example
//!
//! ```
//! use zwave_bridge::handler::HandlerRegistry;
//! use zwave_bridge::protocol::DataFrame;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_fn("SendData", |frame: &DataFrame| {
//!     println!("transmit result: {:?}", frame.payload());
//! });
//! ```

use std::collections::HashMap;

use tracing::trace;

use crate::protocol::DataFrame;

/// Trait for frame handlers.
///
/// Dispatch is strictly sequential on the ingestion path, so handlers get
/// `&mut self` and may keep their own state without locking.
pub trait FrameHandler: Send {
    /// Handle a decoded data frame addressed to this handler's command.
    fn on_frame(&mut self, frame: &DataFrame);
}

/// Adapter that turns a closure into a [`FrameHandler`].
pub struct FnHandler<F> {
    handler: F,
}

impl<F> FnHandler<F>
where
    F: FnMut(&DataFrame) + Send,
{
    /// Wrap a closure handler.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> FrameHandler for FnHandler<F>
where
    F: FnMut(&DataFrame) + Send,
{
    fn on_frame(&mut self, frame: &DataFrame) {
        (self.handler)(frame)
    }
}

/// Registry mapping command names to handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Box<dyn FrameHandler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a command name.
    ///
    /// Replaces any handler previously registered under the same name.
    pub fn register<H>(&mut self, name: &'static str, handler: H)
    where
        H: FrameHandler + 'static,
    {
        self.handlers.insert(name, Box::new(handler));
    }

    /// Register a closure handler for a command name.
    pub fn register_fn<F>(&mut self, name: &'static str, handler: F)
    where
        F: FnMut(&DataFrame) + Send + 'static,
    {
        self.register(name, FnHandler::new(handler));
    }

    /// Check whether a handler is registered for a command name.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Dispatch a decoded data frame to its handler.
    ///
    /// Unknown command ids and unregistered names are dropped silently.
    pub fn dispatch(&mut self, frame: &DataFrame) {
        let name = match frame.command {
            Some(name) => name,
            None => {
                trace!(command_id = frame.command_id, "unknown command id, dropping frame");
                return;
            }
        };

        match self.handlers.get_mut(name) {
            Some(handler) => handler.on_frame(frame),
            None => trace!(command = name, "no handler registered, dropping frame"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Direction;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn frame(command_id: u8) -> DataFrame {
        DataFrame {
            direction: Direction::Request,
            command_id,
            command: crate::protocol::commands::command_name(command_id),
            payload: Bytes::new(),
            checksum: 0x00,
        }
    }

    #[test]
    fn test_registered_handler_is_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_handler = calls.clone();

        let mut registry = HandlerRegistry::new();
        registry.register_fn("ApplicationCommandHandler", move |_: &DataFrame| {
            calls_in_handler.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&frame(0x04));
        registry.dispatch(&frame(0x04));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_command_id_dropped_silently() {
        let mut registry = HandlerRegistry::new();
        registry.register_fn("ApplicationCommandHandler", |_: &DataFrame| {
            panic!("must not be called for an unknown id");
        });

        registry.dispatch(&frame(0xEE));
    }

    #[test]
    fn test_unregistered_name_dropped_silently() {
        let mut registry = HandlerRegistry::new();
        // SendData resolves to a name but nothing is registered for it.
        registry.dispatch(&frame(0x13));
    }

    #[test]
    fn test_register_replaces_previous_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = calls.clone();
        let second = calls.clone();

        let mut registry = HandlerRegistry::new();
        registry.register_fn("SendData", move |_: &DataFrame| {
            first.fetch_add(100, Ordering::SeqCst);
        });
        registry.register_fn("SendData", move |_: &DataFrame| {
            second.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&frame(0x13));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_contains() {
        let mut registry = HandlerRegistry::new();
        assert!(!registry.contains("SendData"));
        registry.register_fn("SendData", |_: &DataFrame| {});
        assert!(registry.contains("SendData"));
    }

    #[test]
    fn test_stateful_handler_keeps_state() {
        struct Counting {
            seen: usize,
        }
        impl FrameHandler for Counting {
            fn on_frame(&mut self, _frame: &DataFrame) {
                self.seen += 1;
            }
        }

        let mut registry = HandlerRegistry::new();
        registry.register("GetVersion", Counting { seen: 0 });
        registry.dispatch(&frame(0x15));
    }
}
