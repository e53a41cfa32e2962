//! SMC Link-Layer Control (LLC) and CDC message decoding.
//!
//! Once the CLC handshake upgrades a connection to SMC-R, link management
//! and flow control run over fixed 44-byte messages on the RDMA path:
//! LLC messages maintain links and RKeys, CDC messages carry the ring
//! cursors and connection flags.
//!
//! [`parse_llc`] dispatches on the type byte; any buffer that is not
//! exactly 44 bytes or carries an unknown type comes back as
//! [`Other`].

mod add_link;
mod base;
mod cdc;
mod confirm_link;
mod delete_link;
mod other;
mod rkey;
mod test_link;


pub use add_link::{AddLink, AddLinkCont, AddLinkRsnCode, RKeyPair};
pub use base::{BaseMsg, TYPE_OTHER};
pub use cdc::Cdc;
pub use confirm_link::ConfirmLink;
pub use delete_link::{DelLinkRsnCode, DeleteLink};
pub use other::Other;
pub use rkey::{ConfirmRkey, ConfirmRkeyCont, DeleteRkey, RmbSpec};
pub use test_link::TestLink;

use std::fmt;

/// LLC and CDC messages are fixed 44 bytes on the wire.
pub const LLC_MSG_LEN: usize = 44;

// LLC message types
pub const TYPE_CONFIRM_LINK: u8 = 1;
pub const TYPE_ADD_LINK: u8 = 2;
pub const TYPE_ADD_LINK_CONT: u8 = 3;
pub const TYPE_DELETE_LINK: u8 = 4;
pub const TYPE_CONFIRM_RKEY: u8 = 6;
pub const TYPE_TEST_LINK: u8 = 7;
pub const TYPE_CONFIRM_RKEY_CONT: u8 = 8;
pub const TYPE_DELETE_RKEY: u8 = 9;
pub const TYPE_CDC: u8 = 0xfe;

/// A parsed LLC/CDC message.
///
/// `Display` renders the values mode; [`LlcMessage::reserved`] adds the
/// reserved fields; [`LlcMessage::dump`] gives the raw-byte hex dump.
#[derive(Clone, Debug)]
pub enum LlcMessage {
    ConfirmLink(ConfirmLink),
    AddLink(AddLink),
    AddLinkCont(AddLinkCont),
    DeleteLink(DeleteLink),
    ConfirmRkey(ConfirmRkey),
    TestLink(TestLink),
    ConfirmRkeyCont(ConfirmRkeyCont),
    DeleteRkey(DeleteRkey),
    Cdc(Cdc),
    Other(Other),
}

/// Parse the LLC message in buf. Buffers that are not exactly 44 bytes
/// long or carry an unknown type byte are tagged as Other.
pub fn parse_llc(buf: &[u8]) -> LlcMessage {
    let buf: &[u8; LLC_MSG_LEN] = match buf.try_into() {
        Ok(buf) => buf,
        Err(_) => return LlcMessage::Other(Other::parse(buf)),
    };

    match buf[0] {
        TYPE_CONFIRM_LINK => LlcMessage::ConfirmLink(ConfirmLink::parse(buf)),
        TYPE_ADD_LINK => LlcMessage::AddLink(AddLink::parse(buf)),
        TYPE_ADD_LINK_CONT => LlcMessage::AddLinkCont(AddLinkCont::parse(buf)),
        TYPE_DELETE_LINK => LlcMessage::DeleteLink(DeleteLink::parse(buf)),
        TYPE_CONFIRM_RKEY => LlcMessage::ConfirmRkey(ConfirmRkey::parse(buf)),
        TYPE_TEST_LINK => LlcMessage::TestLink(TestLink::parse(buf)),
        TYPE_CONFIRM_RKEY_CONT => LlcMessage::ConfirmRkeyCont(ConfirmRkeyCont::parse(buf)),
        TYPE_DELETE_RKEY => LlcMessage::DeleteRkey(DeleteRkey::parse(buf)),
        TYPE_CDC => LlcMessage::Cdc(Cdc::parse(buf)),
        _ => LlcMessage::Other(Other::parse(buf)),
    }
}

impl LlcMessage {
    /// Common base fields of the parsed message.
    pub fn base(&self) -> &BaseMsg {
        match self {
            LlcMessage::ConfirmLink(m) => &m.base,
            LlcMessage::AddLink(m) => &m.base,
            LlcMessage::AddLinkCont(m) => &m.base,
            LlcMessage::DeleteLink(m) => &m.base,
            LlcMessage::ConfirmRkey(m) => &m.base,
            LlcMessage::TestLink(m) => &m.base,
            LlcMessage::ConfirmRkeyCont(m) => &m.base,
            LlcMessage::DeleteRkey(m) => &m.base,
            LlcMessage::Cdc(m) => &m.base,
            LlcMessage::Other(m) => &m.base,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        match self {
            LlcMessage::ConfirmLink(m) => m.reserved(),
            LlcMessage::AddLink(m) => m.reserved(),
            LlcMessage::AddLinkCont(m) => m.reserved(),
            LlcMessage::DeleteLink(m) => m.reserved(),
            LlcMessage::ConfirmRkey(m) => m.reserved(),
            LlcMessage::TestLink(m) => m.reserved(),
            LlcMessage::ConfirmRkeyCont(m) => m.reserved(),
            LlcMessage::DeleteRkey(m) => m.reserved(),
            LlcMessage::Cdc(m) => m.reserved(),
            LlcMessage::Other(m) => m.reserved(),
        }
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.base().dump()
    }
}

impl fmt::Display for LlcMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlcMessage::ConfirmLink(m) => m.fmt(f),
            LlcMessage::AddLink(m) => m.fmt(f),
            LlcMessage::AddLinkCont(m) => m.fmt(f),
            LlcMessage::DeleteLink(m) => m.fmt(f),
            LlcMessage::ConfirmRkey(m) => m.fmt(f),
            LlcMessage::TestLink(m) => m.fmt(f),
            LlcMessage::ConfirmRkeyCont(m) => m.fmt(f),
            LlcMessage::DeleteRkey(m) => m.fmt(f),
            LlcMessage::Cdc(m) => m.fmt(f),
            LlcMessage::Other(m) => m.fmt(f),
        }
    }
}
