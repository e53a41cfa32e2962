//! LLC Confirm Link message (type 1).

use std::fmt;
use std::net::Ipv6Addr;

use super::{BaseMsg, LLC_MSG_LEN};
use crate::util::MacAddr;

/// LLC Confirm Link message: the first message on a new link, carrying
/// the sender's RoCE addressing and link identifiers.
#[derive(Clone, Debug)]
pub struct ConfirmLink {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    reserved2: u8,
    pub sender_mac: MacAddr,
    pub sender_gid: Ipv6Addr,
    /// Sender QP number, 3 bytes on the wire.
    pub sender_qp: u32,
    pub link: u8,
    pub sender_link_user_id: u32,
    pub max_links: u8,
    reserved3: [u8; 9],
}

impl ConfirmLink {
    /// Parse a confirm link message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply is the first bit, the rest of the byte is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reserved2 = buf[3] & 0b0111_1111;

        let sender_mac = MacAddr::from_slice(&buf[4..10]);

        let mut gid = [0u8; 16];
        gid.copy_from_slice(&buf[10..26]);
        let sender_gid = Ipv6Addr::from(gid);

        // QP number is 3 bytes
        let sender_qp = u32::from(buf[26]) << 16 | u32::from(buf[27]) << 8 | u32::from(buf[28]);

        let link = buf[29];
        let sender_link_user_id = u32::from_be_bytes([buf[30], buf[31], buf[32], buf[33]]);
        let max_links = buf[34];

        let mut reserved3 = [0u8; 9];
        reserved3.copy_from_slice(&buf[35..44]);

        ConfirmLink {
            base,
            reserved,
            reply,
            reserved2,
            sender_mac,
            sender_gid,
            sender_qp,
            link,
            sender_link_user_id,
            max_links,
            reserved3,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "LLC Confirm Link: Type: {}, Length: {}, Reserved: {:#x}, Reply: {}, \
             Reserved: {:#x}, Sender MAC: {}, Sender GID: {}, Sender QP: {}, \
             Link: {}, Sender Link UserID: {}, Max Links: {}, Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.reserved2,
            self.sender_mac,
            self.sender_gid,
            self.sender_qp,
            self.link,
            self.sender_link_user_id,
            self.max_links,
            hex::encode(self.reserved3)
        )
    }
}

impl fmt::Display for ConfirmLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Confirm Link: Type: {}, Length: {}, Reply: {}, Sender MAC: {}, \
             Sender GID: {}, Sender QP: {}, Link: {}, Sender Link UserID: {}, \
             Max Links: {}\n",
            self.base.msg_type,
            self.base.length,
            self.reply,
            self.sender_mac,
            self.sender_gid,
            self.sender_qp,
            self.link,
            self.sender_link_user_id,
            self.max_links
        )
    }
}
