//! The sequential ingestion pipeline.
//!
//! One chunk of serial input flows through: buffer append → drain →
//! dispatch → batch acknowledgment. The pipeline owns the frame buffer and
//! the handler registry, so everything on this path is single-threaded and
//! lock-free; the supervisor drives it one chunk at a time.

use tracing::debug;

use crate::handler::HandlerRegistry;
use crate::protocol::{encode_frame, ChecksumPolicy, Frame, FrameBuffer, ACK};

/// The wire bytes of one acknowledgment. Control frames carry no checksum.
pub fn ack_bytes() -> Vec<u8> {
    encode_frame(&[ACK], false)
}

/// Drain/dispatch unit the supervisor feeds with raw chunks.
pub struct Pipeline {
    buffer: FrameBuffer,
    registry: HandlerRegistry,
}

impl Pipeline {
    /// Create a pipeline over a populated registry.
    pub fn new(registry: HandlerRegistry, policy: ChecksumPolicy) -> Self {
        Self {
            buffer: FrameBuffer::with_policy(policy),
            registry,
        }
    }

    /// Feed one input chunk, dispatching every frame that completed.
    ///
    /// Returns `true` when the drained batch contained at least one data
    /// frame, in which case the caller owes the controller a single
    /// acknowledgment for the whole batch.
    pub fn feed(&mut self, chunk: &[u8]) -> bool {
        let frames = self.buffer.push(chunk);
        let mut saw_data = false;

        for frame in &frames {
            match frame {
                Frame::Data(data) => {
                    saw_data = true;
                    self.registry.dispatch(data);
                }
                control => {
                    // Outbound command tracking is out of scope; control
                    // frames from the controller are only observed.
                    debug!(?control, "control frame received");
                }
            }
        }
        saw_data
    }

    /// Drop buffered partial input, e.g. after the device reconnects.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{DataFrame, SOF};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn data_frame_bytes(command_id: u8, payload: &[u8]) -> Vec<u8> {
        let mut raw = vec![SOF, (payload.len() + 3) as u8, 0x00, command_id];
        raw.extend_from_slice(payload);
        encode_frame(&raw, true)
    }

    fn counting_pipeline(calls: Arc<AtomicUsize>) -> Pipeline {
        let mut registry = HandlerRegistry::new();
        registry.register_fn("ApplicationCommandHandler", move |_: &DataFrame| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
        Pipeline::new(registry, ChecksumPolicy::Trust)
    }

    #[test]
    fn test_ack_is_the_bare_control_byte() {
        assert_eq!(ack_bytes(), vec![0x06]);
    }

    #[test]
    fn test_data_batch_requests_single_ack() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = counting_pipeline(calls.clone());

        let mut chunk = data_frame_bytes(0x04, &[0x02, 0x00, 0x2B, 0x00, 0x01, 0x00]);
        chunk.extend(data_frame_bytes(0x04, &[0x03, 0x00, 0x2B, 0x00, 0x01, 0x00]));

        assert!(pipeline.feed(&chunk));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_control_only_batch_requests_no_ack() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = counting_pipeline(calls.clone());

        assert!(!pipeline.feed(&[0x06, 0x15]));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_partial_chunk_requests_no_ack_until_complete() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = counting_pipeline(calls.clone());

        let bytes = data_frame_bytes(0x04, &[0x02, 0x00, 0x2B, 0x00, 0x01, 0x00]);
        let split = bytes.len() - 2;

        assert!(!pipeline.feed(&bytes[..split]));
        assert!(pipeline.feed(&bytes[split..]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_discards_partial_input() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pipeline = counting_pipeline(calls.clone());

        let bytes = data_frame_bytes(0x04, &[0x02, 0x00, 0x2B, 0x00, 0x01, 0x00]);
        pipeline.feed(&bytes[..3]);
        pipeline.reset();

        // The fresh frame decodes cleanly with no stale prefix in the way.
        assert!(pipeline.feed(&bytes));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
