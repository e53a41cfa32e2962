//! LLC Delete Link message (type 4).

use std::fmt;

use super::{BaseMsg, LLC_MSG_LEN};

/// Reason code of a delete link message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DelLinkRsnCode(pub u32);

impl fmt::Display for DelLinkRsnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rsn = match self.0 {
            0x0001_0000 => "Lost path",
            0x0002_0000 => "Operator initiated termination",
            0x0003_0000 => "Program initiated termination (link inactivity)",
            0x0004_0000 => "LLC protocol violation",
            0x0005_0000 => "Asymmetric link no longer needed",
            0x0010_0000 => "Unknown link ID (no link)",
            _ => "unknown",
        };
        write!(f, "{} ({})", self.0, rsn)
    }
}

/// LLC Delete Link message, removing one link or the whole link group.
#[derive(Clone, Debug)]
pub struct DeleteLink {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    /// Delete the entire link group.
    pub all: bool,
    pub orderly: bool,
    reserved2: u8,
    pub link: u8,
    pub rsn_code: DelLinkRsnCode,
    reserved3: [u8; 35],
}

impl DeleteLink {
    /// Parse a delete link message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply, all, orderly, the rest of the byte is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let all = buf[3] & 0b0100_0000 > 0;
        let orderly = buf[3] & 0b0010_0000 > 0;
        let reserved2 = buf[3] & 0b0001_1111;

        let link = buf[4];
        let rsn_code = DelLinkRsnCode(u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]));

        let mut reserved3 = [0u8; 35];
        reserved3.copy_from_slice(&buf[9..44]);

        DeleteLink {
            base,
            reserved,
            reply,
            all,
            orderly,
            reserved2,
            link,
            rsn_code,
            reserved3,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "LLC Delete Link: Type: {}, Length: {}, Reserved: {:#x}, Reply: {}, \
             All: {}, Orderly: {}, Reserved: {:#x}, Link: {}, Reason Code: {}, \
             Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.all,
            self.orderly,
            self.reserved2,
            self.link,
            self.rsn_code,
            hex::encode(self.reserved3)
        )
    }
}

impl fmt::Display for DeleteLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Delete Link: Type: {}, Length: {}, Reply: {}, All: {}, Orderly: {}, \
             Link: {}, Reason Code: {}\n",
            self.base.msg_type,
            self.base.length,
            self.reply,
            self.all,
            self.orderly,
            self.link,
            self.rsn_code
        )
    }
}
