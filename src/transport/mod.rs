//! Transport module - the serial device boundary.
//!
//! A blocking `serialport` handle in a dedicated thread, bridged to the
//! async pipeline with channels.

mod serial;

pub use serial::SerialLink;
