//! Common CLC message header.

use std::fmt;

use super::eyecatcher::{Eyecatcher, EYECATCHER_LEN};

/// SMC protocol version 1.
pub const SMC_V1: u8 = 1;
/// SMC protocol version 2.
pub const SMC_V2: u8 = 2;

/// Length of the CLC header in bytes.
pub const HEADER_LEN: usize = 8;

/// CLC message type byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MsgType(pub u8);

impl MsgType {
    pub const PROPOSAL: MsgType = MsgType(0x01);
    pub const ACCEPT: MsgType = MsgType(0x02);
    pub const CONFIRM: MsgType = MsgType(0x03);
    pub const DECLINE: MsgType = MsgType(0x04);
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            MsgType::PROPOSAL => "Proposal",
            MsgType::ACCEPT => "Accept",
            MsgType::CONFIRM => "Confirm",
            MsgType::DECLINE => "Decline",
            _ => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// SMC path selector, two bits in the header bitfield.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Path(pub u8);

impl Path {
    /// SMC-R only.
    pub const SMC_R: Path = Path(0);
    /// SMC-D only.
    pub const SMC_D: Path = Path(1);
    /// Neither SMC-R nor SMC-D.
    pub const NONE: Path = Path(2);
    /// Both SMC-R and SMC-D.
    pub const BOTH: Path = Path(3);
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Path::SMC_R => "SMC-R",
            Path::SMC_D => "SMC-D",
            Path::NONE => "No SMC-R/SMC-D",
            Path::BOTH => "SMC-R + SMC-D",
            _ => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Common header shared by all CLC messages.
///
/// Byte 7 is bit-packed: version (4 bits), flag (1 bit), reserved
/// (1 bit), path (2 bits). SMCv2 Proposals reuse the flag and reserved
/// bits as the 2-bit pathv2 code, so both decodings are kept.
#[derive(Clone, Debug, Default)]
pub struct Header {
    pub eyecatcher: Eyecatcher,
    pub msg_type: MsgType,
    /// Total message length including header and trailer.
    pub length: u16,
    pub version: u8,
    /// Type-dependent flag bit: first contact (Accept), out of sync
    /// (Decline), plain flag otherwise.
    pub flag: u8,
    reserved: u8,
    /// SMCv2 path code built from the flag and reserved bits.
    pub pathv2: Path,
    pub path: Path,
}

impl Header {
    /// Parse the 8-byte header prefix. Shorter input gives an empty
    /// header.
    pub fn parse(buf: &[u8]) -> Self {
        if buf.len() < HEADER_LEN {
            return Header::default();
        }

        let bitfield = buf[7];
        Header {
            eyecatcher: Eyecatcher::from_slice(&buf[..EYECATCHER_LEN]),
            msg_type: MsgType(buf[4]),
            length: u16::from_be_bytes([buf[5], buf[6]]),
            version: (bitfield & 0b1111_0000) >> 4,
            flag: (bitfield & 0b0000_1000) >> 3,
            reserved: (bitfield & 0b0000_0100) >> 2,
            pathv2: Path((bitfield & 0b0000_1100) >> 2),
            path: Path(bitfield & 0b0000_0011),
        }
    }

    /// The flag bit carries a type-dependent label; SMCv2 proposals show
    /// the pathv2 code instead.
    fn flag_string(&self) -> String {
        match self.msg_type {
            MsgType::PROPOSAL if self.version == SMC_V2 => {
                format!("Pathv2: {}", self.pathv2)
            }
            MsgType::ACCEPT => format!("First Contact: {}", self.flag),
            // v2 Confirm carries the first contact flag as well
            MsgType::CONFIRM if self.version == SMC_V2 => {
                format!("First Contact: {}", self.flag)
            }
            MsgType::DECLINE => format!("Out of Sync: {}", self.flag),
            _ => format!("Flag: {}", self.flag),
        }
    }

    /// Header rendering including the reserved bit. SMCv2 proposals use
    /// that bit as part of pathv2 and omit the fragment.
    pub fn reserved(&self) -> String {
        if self.msg_type == MsgType::PROPOSAL && self.version == SMC_V2 {
            return self.to_string();
        }
        format!(
            "{}: Eyecatcher: {}, Type: {} ({}), Length: {}, Version: {}, {}, \
             Reserved: {:#x}, Path: {}",
            self.msg_type,
            self.eyecatcher,
            self.msg_type.0,
            self.msg_type,
            self.length,
            self.version,
            self.flag_string(),
            self.reserved,
            self.path
        )
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Eyecatcher: {}, Type: {} ({}), Length: {}, Version: {}, {}, Path: {}",
            self.msg_type,
            self.eyecatcher,
            self.msg_type.0,
            self.msg_type,
            self.length,
            self.version,
            self.flag_string(),
            self.path
        )
    }
}
