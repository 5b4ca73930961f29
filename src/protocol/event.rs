//! Application event decoding.
//!
//! An application command report carries a small fixed-layout payload
//! describing a button press or sensor trigger on a mesh node. Fields sit
//! at fixed payload offsets; reports from older firmware can arrive short,
//! in which case the missing trailing fields read as zero.

use super::frame::DataFrame;

/// Semantic decode of an application command report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationEvent {
    /// Source node id within the mesh.
    pub node: u8,
    /// Receive status bits.
    pub status: u8,
    /// Command class of the report.
    pub class_id: u8,
    /// Undocumented byte carried between class and counter; kept verbatim.
    pub unknown1: u8,
    /// 8-bit sequence counter used to detect stale repeats.
    pub counter: u8,
    /// Sub-address (button / scene) within the node.
    pub sub_node: u8,
}

impl ApplicationEvent {
    /// Byte offsets of each field within the frame payload.
    const NODE: usize = 0;
    const STATUS: usize = 1;
    const CLASS_ID: usize = 2;
    const UNKNOWN1: usize = 3;
    const COUNTER: usize = 4;
    const SUB_NODE: usize = 5;

    /// Decode an event from a data frame's payload.
    ///
    /// Returns `None` only for an empty payload; short payloads decode with
    /// the absent fields defaulted to zero.
    pub fn from_frame(frame: &DataFrame) -> Option<Self> {
        let p = frame.payload();
        if p.is_empty() {
            return None;
        }
        let at = |idx: usize| p.get(idx).copied().unwrap_or(0);

        Some(Self {
            node: at(Self::NODE),
            status: at(Self::STATUS),
            class_id: at(Self::CLASS_ID),
            unknown1: at(Self::UNKNOWN1),
            counter: at(Self::COUNTER),
            sub_node: at(Self::SUB_NODE),
        })
    }
}
