//! LLC RKey management messages: Confirm RKey (type 6), Confirm RKey
//! Continuation (type 8) and Delete RKey (type 9).

use std::fmt;

use super::{BaseMsg, LLC_MSG_LEN};

/// RMB specification for another link: link number, RKey and virtual
/// address of the RMB on that link (13 bytes on the wire).
#[derive(Clone, Copy, Debug, Default)]
pub struct RmbSpec {
    pub link: u8,
    pub rkey: u32,
    pub vaddr: u64,
}

impl RmbSpec {
    fn parse(buf: &[u8]) -> Self {
        RmbSpec {
            link: buf[0],
            rkey: u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]),
            vaddr: u64::from_be_bytes([
                buf[5], buf[6], buf[7], buf[8], buf[9], buf[10], buf[11], buf[12],
            ]),
        }
    }
}

impl fmt::Display for RmbSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Link: {}, RKey: {}, Virtual Address: {:#x}]",
            self.link, self.rkey, self.vaddr
        )
    }
}

/// LLC Confirm RKey message, registering a new RMB RKey on this link and
/// optionally on up to two other links.
#[derive(Clone, Debug)]
pub struct ConfirmRkey {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    reserved2: u8,
    /// Negative response.
    pub reject: bool,
    /// Configuration retry.
    pub retry: bool,
    reserved3: u8,
    pub num_tokens: u8,
    pub rkey: u32,
    pub vaddr: u64,
    pub other_rmbs: [RmbSpec; 2],
    reserved4: u8,
}

impl ConfirmRkey {
    /// Parse a confirm RKey message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply, reserved bit, negative response, configuration retry,
        // the rest of the byte is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reserved2 = (buf[3] & 0b0100_0000) >> 6;
        let reject = buf[3] & 0b0010_0000 > 0;
        let retry = buf[3] & 0b0001_0000 > 0;
        let reserved3 = buf[3] & 0b0000_1111;

        let num_tokens = buf[4];
        let rkey = u32::from_be_bytes([buf[5], buf[6], buf[7], buf[8]]);
        let vaddr = u64::from_be_bytes([
            buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15], buf[16],
        ]);

        // two other-link specifications, either may be all zero
        let other_rmbs = [RmbSpec::parse(&buf[17..30]), RmbSpec::parse(&buf[30..43])];

        let reserved4 = buf[43];

        ConfirmRkey {
            base,
            reserved,
            reply,
            reserved2,
            reject,
            retry,
            reserved3,
            num_tokens,
            rkey,
            vaddr,
            other_rmbs,
            reserved4,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        let mut others = String::new();
        for (i, rmb) in self.other_rmbs.iter().enumerate() {
            others.push_str(&format!("Other Link RMB {}: {}, ", i + 1, rmb));
        }

        format!(
            "LLC Confirm RKey: Type: {}, Length: {}, Reserved: {:#x}, Reply: {}, \
             Reserved: {:#x}, Negative Response: {}, Configuration Retry: {}, \
             Reserved: {:#x}, Number of Tokens: {}, This RKey: {}, This VAddr: {:#x}, \
             {}Reserved: {:#x}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.reserved2,
            self.reject,
            self.retry,
            self.reserved3,
            self.num_tokens,
            self.rkey,
            self.vaddr,
            others,
            self.reserved4
        )
    }
}

impl fmt::Display for ConfirmRkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Confirm RKey: Type: {}, Length: {}, Reply: {}, \
             Negative Response: {}, Configuration Retry: {}, Number of Tokens: {}, \
             This RKey: {}, This VAddr: {:#x}",
            self.base.msg_type,
            self.base.length,
            self.reply,
            self.reject,
            self.retry,
            self.num_tokens,
            self.rkey,
            self.vaddr
        )?;
        for (i, rmb) in self.other_rmbs.iter().enumerate() {
            write!(f, ", Other Link RMB {}: {}", i + 1, rmb)?;
        }
        writeln!(f)
    }
}

/// LLC Confirm RKey Continuation message, carrying up to three more
/// other-link RMB specifications.
#[derive(Clone, Debug)]
pub struct ConfirmRkeyCont {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    reserved2: u8,
    /// Negative response.
    pub reject: bool,
    reserved3: u8,
    pub num_tokens: u8,
    pub other_rmbs: [RmbSpec; 3],
    reserved4: u8,
}

impl ConfirmRkeyCont {
    /// Parse a confirm RKey continuation message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply, reserved bit, negative response, the rest is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reserved2 = (buf[3] & 0b0100_0000) >> 6;
        let reject = buf[3] & 0b0010_0000 > 0;
        let reserved3 = buf[3] & 0b0001_1111;

        let num_tokens = buf[4];

        // three other-link specifications, each may be all zero
        let other_rmbs = [
            RmbSpec::parse(&buf[5..18]),
            RmbSpec::parse(&buf[18..31]),
            RmbSpec::parse(&buf[31..44]),
        ];

        ConfirmRkeyCont {
            base,
            reserved,
            reply,
            reserved2,
            reject,
            reserved3,
            num_tokens,
            other_rmbs,
            reserved4: 0,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        let mut others = String::new();
        for (i, rmb) in self.other_rmbs.iter().enumerate() {
            others.push_str(&format!("Other Link RMB {}: {}, ", i + 1, rmb));
        }

        format!(
            "LLC Confirm RKey Continuation: Type: {}, Length: {}, Reserved: {:#x}, \
             Reply: {}, Reserved: {:#x}, Negative Response: {}, Reserved: {:#x}, \
             Number of Tokens: {}, {}Reserved: {:#x}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.reserved2,
            self.reject,
            self.reserved3,
            self.num_tokens,
            others,
            self.reserved4
        )
    }
}

impl fmt::Display for ConfirmRkeyCont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Confirm RKey Continuation: Type: {}, Length: {}, Reply: {}, \
             Negative Response: {}, Number of Tokens: {}",
            self.base.msg_type, self.base.length, self.reply, self.reject, self.num_tokens
        )?;
        for (i, rmb) in self.other_rmbs.iter().enumerate() {
            write!(f, ", Other Link RMB {}: {}", i + 1, rmb)?;
        }
        writeln!(f)
    }
}

/// LLC Delete RKey message, unregistering up to eight RKeys.
#[derive(Clone, Debug)]
pub struct DeleteRkey {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    reserved2: u8,
    /// Negative response.
    pub reject: bool,
    reserved3: u8,
    /// Number of RKeys to delete.
    pub count: u8,
    /// Per-RKey error bits in a negative response.
    pub error_mask: u8,
    reserved4: [u8; 2],
    pub rkeys: [u32; 8],
    reserved5: [u8; 4],
}

impl DeleteRkey {
    /// Parse a delete RKey message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply, reserved bit, negative response, the rest is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reserved2 = (buf[3] & 0b0100_0000) >> 6;
        let reject = buf[3] & 0b0010_0000 > 0;
        let reserved3 = buf[3] & 0b0001_1111;

        let count = buf[4];
        let error_mask = buf[5];

        let mut reserved4 = [0u8; 2];
        reserved4.copy_from_slice(&buf[6..8]);

        let mut rkeys = [0u32; 8];
        for (i, rkey) in rkeys.iter_mut().enumerate() {
            let at = 8 + i * 4;
            *rkey = u32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        }

        let mut reserved5 = [0u8; 4];
        reserved5.copy_from_slice(&buf[40..44]);

        DeleteRkey {
            base,
            reserved,
            reply,
            reserved2,
            reject,
            reserved3,
            count,
            error_mask,
            reserved4,
            rkeys,
            reserved5,
        }
    }

    fn rkeys_string(&self) -> String {
        let mut out = String::new();
        for (i, rkey) in self.rkeys.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("RKey {}: {}", i + 1, rkey));
        }
        out
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "LLC Delete RKey: Type: {}, Length: {}, Reserved: {:#x}, Reply: {}, \
             Reserved: {:#x}, Negative Response: {}, Reserved: {:#x}, Count: {}, \
             Error Mask: {:#b}, Reserved: 0x{}, {}, Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.reserved2,
            self.reject,
            self.reserved3,
            self.count,
            self.error_mask,
            hex::encode(self.reserved4),
            self.rkeys_string(),
            hex::encode(self.reserved5)
        )
    }
}

impl fmt::Display for DeleteRkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Delete RKey: Type: {}, Length: {}, Reply: {}, Negative Response: {}, \
             Count: {}, Error Mask: {:#b}, {}\n",
            self.base.msg_type,
            self.base.length,
            self.reply,
            self.reject,
            self.count,
            self.error_mask,
            self.rkeys_string()
        )
    }
}
