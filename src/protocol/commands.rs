//! Static command identifier table.
//!
//! Maps the controller's numeric function identifiers to semantic names.
//! The table is lookup-only; identifiers missing from it decode with the
//! raw id retained and no name, and the dispatcher drops them silently.

/// Function id of the unsolicited application command report, the only
/// command this bridge acts on.
pub const APPLICATION_COMMAND_HANDLER: u8 = 0x04;

/// Dispatcher key for [`APPLICATION_COMMAND_HANDLER`] frames.
pub const APPLICATION_COMMAND_HANDLER_NAME: &str = "ApplicationCommandHandler";

/// Look up the semantic name for a command identifier.
pub fn command_name(id: u8) -> Option<&'static str> {
    Some(match id {
        0x02 => "SerialApiGetInitData",
        0x04 => APPLICATION_COMMAND_HANDLER_NAME,
        0x05 => "GetControllerCapabilities",
        0x07 => "SerialApiGetCapabilities",
        0x08 => "SerialApiSoftReset",
        0x13 => "SendData",
        0x15 => "GetVersion",
        0x20 => "MemoryGetId",
        0x41 => "GetNodeProtocolInfo",
        0x49 => "ApplicationUpdate",
        0x4A => "AddNodeToNetwork",
        0x4B => "RemoveNodeFromNetwork",
        0x56 => "SendSucId",
        0x60 => "RequestNodeInfo",
        _ => return None,
    })
}
