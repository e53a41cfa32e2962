//! Common LLC message fields.

use crate::util::hex_dump;

/// Internal message type assigned to non-LLC payloads, outside the u8
/// range of the wire types.
pub const TYPE_OTHER: u16 = 0x101;

/// Fields shared by all LLC/CDC messages: the raw bytes (copied on
/// parse) plus the type and length prefix.
#[derive(Clone, Debug, Default)]
pub struct BaseMsg {
    raw: Vec<u8>,
    pub msg_type: u16,
    pub length: usize,
}

impl BaseMsg {
    /// Capture the raw bytes and the two prefix fields.
    pub fn parse(buf: &[u8; super::LLC_MSG_LEN]) -> Self {
        BaseMsg {
            raw: buf.to_vec(),
            msg_type: u16::from(buf[0]),
            length: usize::from(buf[1]),
        }
    }

    /// Base for non-LLC payloads of any length.
    pub fn other(buf: &[u8]) -> Self {
        BaseMsg {
            raw: buf.to_vec(),
            msg_type: TYPE_OTHER,
            length: buf.len(),
        }
    }

    /// The raw message bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Canonical hex dump of the message bytes.
    pub fn dump(&self) -> String {
        hex_dump(&self.raw)
    }
}
