//! LLC Add Link (type 2) and Add Link Continuation (type 3) messages.

use std::fmt;
use std::net::Ipv6Addr;

use super::{BaseMsg, LLC_MSG_LEN};
use crate::clc::QpMtu;
use crate::util::MacAddr;

/// Reason code of an LLC add link message (4 bits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddLinkRsnCode(pub u8);

impl fmt::Display for AddLinkRsnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rsn = match self.0 {
            1 => "no alternate path available",
            2 => "invalid MTU value specified",
            _ => "unknown",
        };
        write!(f, "{} ({})", self.0, rsn)
    }
}

/// LLC Add Link message, requesting or answering an additional link in
/// the link group.
#[derive(Clone, Debug)]
pub struct AddLink {
    pub base: BaseMsg,
    reserved: u8,
    pub rsn_code: AddLinkRsnCode,
    pub reply: bool,
    pub reject: bool,
    reserved2: u8,
    pub sender_mac: MacAddr,
    // the linux code carries two reserved bytes here that are not in the RFC
    reserved3: [u8; 2],
    pub sender_gid: Ipv6Addr,
    /// Sender QP number, 3 bytes on the wire.
    pub sender_qp: u32,
    pub link: u8,
    reserved4: u8,
    pub mtu: QpMtu,
    /// Initial packet sequence number, 3 bytes on the wire.
    pub psn: u32,
    reserved5: [u8; 8],
}

impl AddLink {
    /// Parse an add link message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        // reserved (4 bits), reason code (4 bits)
        let reserved = buf[2] >> 4;
        let rsn_code = AddLinkRsnCode(buf[2] & 0b0000_1111);

        // reply flag, rejection flag, the rest of the byte is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reject = buf[3] & 0b0100_0000 > 0;
        let reserved2 = buf[3] & 0b0011_1111;

        let sender_mac = MacAddr::from_slice(&buf[4..10]);

        let mut reserved3 = [0u8; 2];
        reserved3.copy_from_slice(&buf[10..12]);

        let mut gid = [0u8; 16];
        gid.copy_from_slice(&buf[12..28]);
        let sender_gid = Ipv6Addr::from(gid);

        // QP number is 3 bytes
        let sender_qp = u32::from(buf[28]) << 16 | u32::from(buf[29]) << 8 | u32::from(buf[30]);

        let link = buf[31];

        // reserved (4 bits), mtu (4 bits)
        let reserved4 = buf[32] >> 4;
        let mtu = QpMtu(buf[32] & 0b0000_1111);

        // initial packet sequence number is 3 bytes
        let psn = u32::from(buf[33]) << 16 | u32::from(buf[34]) << 8 | u32::from(buf[35]);

        let mut reserved5 = [0u8; 8];
        reserved5.copy_from_slice(&buf[36..44]);

        AddLink {
            base,
            reserved,
            rsn_code,
            reply,
            reject,
            reserved2,
            sender_mac,
            reserved3,
            sender_gid,
            sender_qp,
            link,
            reserved4,
            mtu,
            psn,
            reserved5,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "LLC Add Link: Type: {}, Length: {}, Reserved: {:#x}, Reason Code: {}, \
             Reply: {}, Rejection: {}, Reserved: {:#x}, Sender MAC: {}, \
             Reserved: 0x{}, Sender GID: {}, Sender QP: {}, Link: {}, \
             Reserved: {:#x}, MTU: {}, Initial PSN: {}, Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.rsn_code,
            self.reply,
            self.reject,
            self.reserved2,
            self.sender_mac,
            hex::encode(self.reserved3),
            self.sender_gid,
            self.sender_qp,
            self.link,
            self.reserved4,
            self.mtu,
            self.psn,
            hex::encode(self.reserved5)
        )
    }
}

impl fmt::Display for AddLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Add Link: Type: {}, Length: {}, Reason Code: {}, Reply: {}, \
             Rejection: {}, Sender MAC: {}, Sender GID: {}, Sender QP: {}, \
             Link: {}, MTU: {}, Initial PSN: {}\n",
            self.base.msg_type,
            self.base.length,
            self.rsn_code,
            self.reply,
            self.reject,
            self.sender_mac,
            self.sender_gid,
            self.sender_qp,
            self.link,
            self.mtu,
            self.psn
        )
    }
}

/// RKey/RToken pair in an add link continuation message.
#[derive(Clone, Copy, Debug, Default)]
pub struct RKeyPair {
    pub reference_rkey: u32,
    pub new_rkey: u32,
    pub new_vaddr: u64,
}

impl RKeyPair {
    /// Parse a 16-byte RKey/RToken pair: reference key, new RKey, new
    /// virtual address.
    fn parse(buf: &[u8]) -> Self {
        RKeyPair {
            reference_rkey: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            new_rkey: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            new_vaddr: u64::from_be_bytes([
                buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
            ]),
        }
    }
}

impl fmt::Display for RKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Reference RKey: {}, New RKey: {}, New Virtual Address: {:#x}]",
            self.reference_rkey, self.new_rkey, self.new_vaddr
        )
    }
}

/// LLC Add Link Continuation message, carrying the RKey/RToken pairs for
/// the link announced in the preceding add link exchange.
#[derive(Clone, Debug)]
pub struct AddLinkCont {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    reserved2: u8,
    pub link: u8,
    pub num_rtokens: u8,
    reserved3: [u8; 2],
    pub rkey_pairs: [RKeyPair; 2],
    reserved4: [u8; 4],
}

impl AddLinkCont {
    /// Parse an add link continuation message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply is the first bit, the rest of the byte is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reserved2 = buf[3] & 0b0111_1111;

        let link = buf[4];
        let num_rtokens = buf[5];

        let mut reserved3 = [0u8; 2];
        reserved3.copy_from_slice(&buf[6..8]);

        // two 16-byte RKey/RToken pairs, the second may be all zero
        let rkey_pairs = [
            RKeyPair::parse(&buf[8..24]),
            RKeyPair::parse(&buf[24..40]),
        ];

        let mut reserved4 = [0u8; 4];
        reserved4.copy_from_slice(&buf[40..44]);

        AddLinkCont {
            base,
            reserved,
            reply,
            reserved2,
            link,
            num_rtokens,
            reserved3,
            rkey_pairs,
            reserved4,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        let mut pairs = String::new();
        for (i, pair) in self.rkey_pairs.iter().enumerate() {
            pairs.push_str(&format!("RKey Pair {}: {}, ", i + 1, pair));
        }

        format!(
            "LLC Add Link Continuation: Type: {}, Length: {}, Reserved: {:#x}, \
             Reply: {}, Reserved: {:#x}, Link: {}, Number of RTokens: {}, \
             Reserved: 0x{}, {}Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.reserved2,
            self.link,
            self.num_rtokens,
            hex::encode(self.reserved3),
            pairs,
            hex::encode(self.reserved4)
        )
    }
}

impl fmt::Display for AddLinkCont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Add Link Continuation: Type: {}, Length: {}, Reply: {}, Link: {}, \
             Number of RTokens: {}",
            self.base.msg_type, self.base.length, self.reply, self.link, self.num_rtokens
        )?;
        for (i, pair) in self.rkey_pairs.iter().enumerate() {
            write!(f, ", RKey Pair {}: {}", i + 1, pair)?;
        }
        writeln!(f)
    }
}
