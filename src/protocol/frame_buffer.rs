//! Receive buffer for accumulating partial serial reads.
//!
//! Uses `bytes::BytesMut`: consumed frames are split off the front, which
//! realizes the append-only-buffer-plus-cursor model without keeping dead
//! bytes around. The drain is restartable across arbitrary chunk boundaries;
//! a serial read may deliver as little as one byte.
//!
//! # Example
//!
//! ```
//! use zwave_bridge::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//!
//! // Data arrives in chunks from the serial port
//! let frames = buffer.push(&[0x06]);
//! assert_eq!(frames.len(), 1);
//! ```

use bytes::BytesMut;
use tracing::warn;

use super::frame::Frame;
use super::wire_format::{self, ChecksumPolicy, MIN_DECLARED_LENGTH};

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated unconsumed bytes from serial reads.
    buffer: BytesMut,
    /// What to do with received checksum bytes.
    policy: ChecksumPolicy,
}

impl FrameBuffer {
    /// Create a frame buffer with the default trust-the-wire checksum policy.
    pub fn new() -> Self {
        Self::with_policy(ChecksumPolicy::Trust)
    }

    /// Create a frame buffer with an explicit checksum policy.
    pub fn with_policy(policy: ChecksumPolicy) -> Self {
        Self {
            buffer: BytesMut::with_capacity(256),
            policy,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// This is the main API for processing incoming serial data. Frames come
    /// back in arrival order; partial trailing data stays buffered for the
    /// next push. Malformed frames (under-length declaration, or checksum
    /// mismatch under [`ChecksumPolicy::Verify`]) are consumed and dropped
    /// with a warning; nothing here is fatal.
    pub fn push(&mut self, data: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(data);
        self.drain()
    }

    /// Extract complete frames already sitting in the buffer.
    pub fn drain(&mut self) -> Vec<Frame> {
        let mut frames = Vec::new();
        while self.has_complete_frame() {
            if let Some(frame) = self.extract_one() {
                frames.push(frame);
            }
        }
        frames
    }

    /// Peek at the buffer without consuming anything and report whether a
    /// complete frame is available.
    ///
    /// A control byte is always a complete one-byte frame. A start-of-frame
    /// marker needs its length byte plus `length` trailing bytes.
    pub fn has_complete_frame(&self) -> bool {
        let first = match self.buffer.first() {
            Some(&b) => b,
            None => return false,
        };
        if wire_format::classify_control(first).is_some() {
            return true;
        }
        if self.buffer.len() < 2 {
            return false;
        }
        let declared = self.buffer[1] as usize;
        self.buffer.len() - 2 >= declared
    }

    /// Consume exactly one complete frame from the front of the buffer.
    ///
    /// Returns `None` when the frame was consumed but dropped (malformed).
    /// Callers must have checked `has_complete_frame` first.
    fn extract_one(&mut self) -> Option<Frame> {
        if let Some(control) = wire_format::classify_control(self.buffer[0]) {
            let _ = self.buffer.split_to(1);
            return Some(control);
        }

        let declared = self.buffer[1];
        let total = declared as usize + 2;

        if declared < MIN_DECLARED_LENGTH {
            // A declared length that cannot even cover direction, command id
            // and checksum. Consume its declared extent so the drain loop
            // cannot spin on the same bytes.
            warn!(declared, "dropping data frame with under-length declaration");
            let _ = self.buffer.split_to(total.min(self.buffer.len()));
            return None;
        }

        let frame_bytes = self.buffer.split_to(total);

        if self.policy == ChecksumPolicy::Verify && !wire_format::verify_checksum(&frame_bytes) {
            warn!(
                received = frame_bytes[total - 1],
                "dropping data frame with checksum mismatch"
            );
            return None;
        }

        let (frame, consumed) = wire_format::decode_data_frame(&frame_bytes);
        debug_assert_eq!(consumed, total);
        Some(Frame::Data(frame))
    }

    /// Get the number of buffered, unconsumed bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard all buffered bytes, e.g. when the connection is reopened.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
