//! Wire format encoding and decoding.
//!
//! Implements the controller's serial framing:
//! ```text
//! ┌────────┬────────┬───────────┬────────────┬─────────┬──────────┐
//! │ SOF    │ Length │ Direction │ Command ID │ Payload │ Checksum │
//! │ 1 byte │ 1 byte │ 1 byte    │ 1 byte     │ L-3     │ 1 byte   │
//! └────────┴────────┴───────────┴────────────┴─────────┴──────────┘
//! ```
//!
//! `Length` counts every byte from `Direction` through `Checksum`, so the
//! payload occupies `length - 3` bytes and a complete frame is `length + 2`
//! bytes from the marker. Single-byte control frames (`ACK`, `NAK`, `CAN`)
//! carry no length or checksum.
//!
//! The checksum is an XOR over all bytes after the marker, seeded at `0xFF`.

use serde::Deserialize;

use super::frame::{DataFrame, Direction, Frame};
use crate::protocol::commands;

/// Start-of-frame marker introducing a data frame.
pub const SOF: u8 = 0x01;
/// Acknowledgment control byte.
pub const ACK: u8 = 0x06;
/// Negative-acknowledgment control byte.
pub const NAK: u8 = 0x15;
/// Cancel control byte.
pub const CAN: u8 = 0x18;

/// Seed for the running XOR checksum.
pub const CHECKSUM_SEED: u8 = 0xFF;

/// Smallest declared length a well-formed data frame can carry
/// (direction + command id + checksum).
pub const MIN_DECLARED_LENGTH: u8 = 3;

/// What to do with the checksum byte on received frames.
///
/// The controller firmware is assumed reliable by default and received
/// checksums are captured without verification. `Verify` drops mismatching
/// frames instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumPolicy {
    /// Capture the checksum byte, never reject a frame on mismatch.
    #[default]
    Trust,
    /// Drop frames whose checksum does not match the running XOR.
    Verify,
}

/// Map a single lookahead byte to a control frame.
///
/// Returns `None` for any non-control byte, which the reader treats as the
/// start-of-frame marker of a data frame.
#[inline]
pub fn classify_control(byte: u8) -> Option<Frame> {
    match byte {
        ACK => Some(Frame::Ack),
        NAK => Some(Frame::Nak),
        CAN => Some(Frame::Cancel),
        _ => None,
    }
}

/// Fold bytes into the running XOR checksum.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(CHECKSUM_SEED, |sum, &b| sum ^ b)
}

/// Encode an outbound frame.
///
/// The first byte (the frame marker) is written verbatim; every subsequent
/// byte is written and XOR-folded into a checksum seeded at `0xFF`. The
/// checksum byte is appended only when `include_checksum` is set; the
/// single-byte acknowledgment is sent without one.
pub fn encode_frame(bytes: &[u8], include_checksum: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 1);
    let mut sum = CHECKSUM_SEED;

    let mut iter = bytes.iter();
    if let Some(&marker) = iter.next() {
        out.push(marker);
    }
    for &b in iter {
        out.push(b);
        sum ^= b;
    }

    if include_checksum {
        out.push(sum);
    }
    out
}

/// Decode a data frame from a complete frame slice.
///
/// `buf[0]` must be the start-of-frame marker and the slice must hold at
/// least `buf[1] + 2` bytes; the frame buffer guarantees both before
/// calling. Returns the decoded frame and the number of bytes consumed.
pub fn decode_data_frame(buf: &[u8]) -> (DataFrame, usize) {
    let declared = buf[1] as usize;
    let payload_len = declared.saturating_sub(3);

    let direction = Direction::from_byte(buf[2]);
    let command_id = buf[3];
    let payload = buf[4..4 + payload_len].to_vec();
    let checksum = buf[4 + payload_len];

    let frame = DataFrame {
        direction,
        command_id,
        command: commands::command_name(command_id),
        payload: payload.into(),
        checksum,
    };
    (frame, declared + 2)
}

/// Check a complete frame slice against its trailing checksum byte.
///
/// The checksum covers every byte after the marker up to, but not
/// including, the checksum byte itself.
pub fn verify_checksum(frame_bytes: &[u8]) -> bool {
    let declared = frame_bytes[1] as usize;
    checksum(&frame_bytes[1..=declared]) == frame_bytes[declared + 1]
}
