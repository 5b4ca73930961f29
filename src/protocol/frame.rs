//! Frame types with typed accessors.
//!
//! A frame is one protocol-level unit on the wire: either a single control
//! byte or a length-prefixed data unit. Payloads use `bytes::Bytes` for
//! cheap sharing between the dispatcher and spawned handlers.

use bytes::Bytes;

/// Whether a data frame travels host → controller or controller → host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host-initiated command (direction byte `0x00`).
    Request,
    /// Controller reply or unsolicited report (any nonzero direction byte).
    Response,
}

impl Direction {
    /// Decode the direction byte. Zero is a request, anything else a response.
    #[inline]
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 {
            Direction::Request
        } else {
            Direction::Response
        }
    }

    /// Encode back to the wire byte.
    #[inline]
    pub fn to_byte(self) -> u8 {
        match self {
            Direction::Request => 0x00,
            Direction::Response => 0x01,
        }
    }
}

/// A decoded multi-byte data frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    /// Request or response.
    pub direction: Direction,
    /// Raw command identifier byte.
    pub command_id: u8,
    /// Semantic name from the command table, `None` for unlisted ids.
    pub command: Option<&'static str>,
    /// Payload bytes (`declared length - 3` of them).
    pub payload: Bytes,
    /// Trailing checksum byte as received. Captured, not necessarily verified.
    pub checksum: u8,
}

impl DataFrame {
    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Check whether this frame is a host-bound response/report.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.direction == Direction::Response
    }
}

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Acknowledgment control byte.
    Ack,
    /// Negative acknowledgment control byte.
    Nak,
    /// Cancel control byte.
    Cancel,
    /// Length-prefixed data unit.
    Data(DataFrame),
}

impl Frame {
    /// Check whether this is a data frame.
    #[inline]
    pub fn is_data(&self) -> bool {
        matches!(self, Frame::Data(_))
    }

    /// Get the contained data frame, if any.
    #[inline]
    pub fn as_data(&self) -> Option<&DataFrame> {
        match self {
            Frame::Data(frame) => Some(frame),
            _ => None,
        }
    }
}
