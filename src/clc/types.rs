//! Small value types shared by the CLC message records.

use std::fmt;

use crate::util::{hex_dump, MacAddr};

/// Raw bytes of a parsed message.
///
/// The bytes are copied out of the input buffer on parse so the record
/// stays valid when the caller reuses its buffer. Reserved regions render
/// from here and from the per-field copies in the records.
#[derive(Clone, Debug, Default)]
pub struct Raw(Vec<u8>);

impl Raw {
    /// Copy buf as the raw message bytes.
    pub fn copy_from(buf: &[u8]) -> Self {
        Raw(buf.to_vec())
    }

    /// The raw message bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Canonical hex dump of the message bytes.
    pub fn dump(&self) -> String {
        hex_dump(&self.0)
    }
}

/// Length of a peer ID in bytes.
pub const PEER_ID_LEN: usize = 8;

/// 8-byte SMC peer ID: big-endian instance number followed by the RoCE
/// MAC of the sender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerId(pub [u8; PEER_ID_LEN]);

impl PeerId {
    /// Copy a peer ID from the first eight bytes of buf.
    pub fn from_slice(buf: &[u8]) -> Self {
        let mut id = [0u8; PEER_ID_LEN];
        if buf.len() >= PEER_ID_LEN {
            id.copy_from_slice(&buf[..PEER_ID_LEN]);
        }
        PeerId(id)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = u16::from_be_bytes([self.0[0], self.0[1]]);
        let mac = MacAddr::from_slice(&self.0[2..PEER_ID_LEN]);
        write!(f, "{}@{}", instance, mac)
    }
}

/// Length of an EID in bytes.
pub const EID_LEN: usize = 32;

/// 32-byte printable endpoint identifier. Hostnames in the First Contact
/// Extension share the format. Renders as ASCII up to the first NUL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eid(pub [u8; EID_LEN]);

impl Eid {
    /// Copy an EID from the first 32 bytes of buf.
    pub fn from_slice(buf: &[u8]) -> Self {
        let mut eid = [0u8; EID_LEN];
        if buf.len() >= EID_LEN {
            eid.copy_from_slice(&buf[..EID_LEN]);
        }
        Eid(eid)
    }
}

impl Default for Eid {
    fn default() -> Self {
        Eid([0; EID_LEN])
    }
}

impl fmt::Display for Eid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(EID_LEN);
        write!(f, "{}", String::from_utf8_lossy(&self.0[..end]))
    }
}

/// Compressed RMBE/DMBE buffer size, a 4-bit code. The decompressed size
/// is `1 << (code + 14)` bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RmbeSize(pub u8);

impl fmt::Display for RmbeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = 1u32 << (u32::from(self.0 & 0b0000_1111) + 14);
        write!(f, "{} ({})", self.0, size)
    }
}

/// Compressed QP MTU, a 4-bit code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QpMtu(pub u8);

impl fmt::Display for QpMtu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mtu = match self.0 {
            1 => "256",
            2 => "512",
            3 => "1024",
            4 => "2048",
            5 => "4096",
            _ => "reserved",
        };
        write!(f, "{} ({})", self.0, mtu)
    }
}

/// Operating system type reported in SMCv2 messages (4 bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OsType(pub u8);

impl OsType {
    pub const ZOS: OsType = OsType(1);
    pub const LINUX: OsType = OsType(2);
    pub const AIX: OsType = OsType(3);
}

impl fmt::Display for OsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let os = match *self {
            OsType::ZOS => "z/OS",
            OsType::LINUX => "Linux",
            OsType::AIX => "AIX",
            _ => "unknown",
        };
        write!(f, "{} ({})", self.0, os)
    }
}
