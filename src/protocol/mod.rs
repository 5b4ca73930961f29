//! Protocol module - wire framing, frame types, and semantic decoding.
//!
//! This module implements the controller's serial protocol:
//! - control bytes and length-prefixed data frames with an XOR checksum
//! - a receive buffer that extracts complete frames from partial reads
//! - the static command identifier table
//! - application event decoding from data-frame payloads

pub mod commands;
mod event;
mod frame;
mod frame_buffer;
mod wire_format;

pub use event::ApplicationEvent;
pub use frame::{DataFrame, Direction, Frame};
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    checksum, classify_control, decode_data_frame, encode_frame, verify_checksum, ChecksumPolicy,
    ACK, CAN, CHECKSUM_SEED, MIN_DECLARED_LENGTH, NAK, SOF,
};
