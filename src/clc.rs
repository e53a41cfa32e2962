//! SMC Connection-Layer Control (CLC) handshake decoding.
//!
//! CLC messages travel over the seed TCP connection before data moves to
//! the RDMA path. Four message types exist (Proposal, Accept, Confirm,
//! Decline) in SMCv1 and SMCv2 encodings; Accept and Confirm additionally
//! split by path into SMC-R and SMC-D layouts.
//!
//! ## Wire format
//!
//! Every message is framed by 4-byte eyecatchers and starts with the
//! common 8-byte header:
//!
//! ```text
//! [eyecatcher:4][type:1][length:2 BE][version:4b|flag:1b|rsvd:1b|path:2b]
//! ```
//!
//! For SMCv2 Proposals the flag and reserved bits together form the 2-bit
//! pathv2 code.
//!
//! ## Usage
//!
//! [`recognize`] inspects the prefix and returns the concrete variant and
//! the declared message length; [`MessageKind::parse`] then builds the
//! typed record. Parsing is best-effort over untrusted input: malformed
//! messages are logged with a hex dump and come back partially populated,
//! never as a panic or an error.

mod accept_smcd;
mod accept_smcd_v2;
mod accept_smcr;
mod decline;
mod eyecatcher;
mod header;
mod proposal;
mod proposal_v2;
mod tcp_option;
mod types;

#[cfg(test)]
mod tests;

pub use accept_smcd::{AcceptSmcD, ACCEPT_SMCD_LEN};
pub use accept_smcd_v2::{AcceptSmcDv2, ACCEPT_SMCDV2_FCE_LEN, ACCEPT_SMCDV2_LEN};
pub use accept_smcr::{AcceptSmcR, ACCEPT_SMCR_LEN};
pub use decline::{Decline, DeclineV2, PeerDiagnosis, DECLINE_LEN};
pub use eyecatcher::{
    has_eyecatcher, Eyecatcher, Trailer, EYECATCHER_LEN, SMC_D_EYECATCHER, SMC_R_EYECATCHER,
    TRAILER_LEN,
};
pub use header::{Header, MsgType, Path, HEADER_LEN, SMC_V1, SMC_V2};
pub use proposal::{Ipv6Prefix, Proposal, IPV6_PREFIX_LEN, PROPOSAL_LEN, SMCD_IP_AREA_OFFSET};
pub use proposal_v2::{GidEntry, ProposalV2, PROPOSAL_V2_EXT_LEN, PROPOSAL_V2_LEN, SMCDV2_EXT_LEN};
pub use tcp_option::smc_option;
pub use types::{Eid, OsType, PeerId, QpMtu, Raw, RmbeSize, EID_LEN, PEER_ID_LEN};

use std::fmt;
use tracing::warn;

use crate::util::hex_dump;

/// Maximum accepted CLC message length in bytes (sanity cap).
pub const MAX_MESSAGE_SIZE: u16 = 1024;

/// Dump buffer content when a parse problem was hit.
pub(crate) fn err_dump(buf: &[u8]) {
    warn!("message buffer hex dump:\n{}", hex_dump(buf));
}

/// Concrete CLC message variant selected by [`recognize`].
///
/// Confirm variants share the Accept record layouts; the header type byte
/// keeps the rendered label distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Proposal,
    ProposalV2,
    AcceptSmcR,
    AcceptSmcD,
    AcceptSmcDv2,
    ConfirmSmcR,
    ConfirmSmcD,
    ConfirmSmcDv2,
    Decline,
    DeclineV2,
}

impl MessageKind {
    /// Parse the message in buf into a typed record. Callers normally
    /// slice buf to the length returned by [`recognize`] first; the
    /// parsers never read past the declared length or the buffer end
    /// either way.
    pub fn parse(self, buf: &[u8]) -> Message {
        match self {
            MessageKind::Proposal => Message::Proposal(Proposal::parse(buf)),
            MessageKind::ProposalV2 => Message::ProposalV2(ProposalV2::parse(buf)),
            MessageKind::AcceptSmcR => Message::AcceptSmcR(AcceptSmcR::parse(buf)),
            MessageKind::AcceptSmcD => Message::AcceptSmcD(AcceptSmcD::parse(buf)),
            MessageKind::AcceptSmcDv2 => Message::AcceptSmcDv2(AcceptSmcDv2::parse(buf)),
            MessageKind::ConfirmSmcR => Message::ConfirmSmcR(AcceptSmcR::parse(buf)),
            MessageKind::ConfirmSmcD => Message::ConfirmSmcD(AcceptSmcD::parse(buf)),
            MessageKind::ConfirmSmcDv2 => Message::ConfirmSmcDv2(AcceptSmcDv2::parse(buf)),
            MessageKind::Decline => Message::Decline(Decline::parse(buf)),
            MessageKind::DeclineV2 => Message::DeclineV2(DeclineV2::parse(buf)),
        }
    }
}

/// Check buf for a CLC message and return the concrete variant and the
/// declared message length. Returns None for non-SMC payloads (missing
/// eyecatcher, unknown type) and for lengths over [`MAX_MESSAGE_SIZE`].
pub fn recognize(buf: &[u8]) -> Option<(MessageKind, u16)> {
    if buf.len() < HEADER_LEN || !has_eyecatcher(buf) {
        return None;
    }

    let length = u16::from_be_bytes([buf[5], buf[6]]);
    if length > MAX_MESSAGE_SIZE {
        warn!("error parsing CLC header: message too big");
        err_dump(&buf[..HEADER_LEN]);
        return None;
    }

    let version = buf[7] >> 4;
    let path = Path(buf[7] & 0b0000_0011);
    let kind = match MsgType(buf[4]) {
        MsgType::PROPOSAL => {
            if version == SMC_V2 {
                MessageKind::ProposalV2
            } else {
                MessageKind::Proposal
            }
        }
        MsgType::ACCEPT => match path {
            Path::SMC_R => MessageKind::AcceptSmcR,
            Path::SMC_D => {
                if version == SMC_V2 {
                    MessageKind::AcceptSmcDv2
                } else {
                    MessageKind::AcceptSmcD
                }
            }
            _ => return None,
        },
        MsgType::CONFIRM => match path {
            Path::SMC_R => MessageKind::ConfirmSmcR,
            Path::SMC_D => {
                if version == SMC_V2 {
                    MessageKind::ConfirmSmcDv2
                } else {
                    MessageKind::ConfirmSmcD
                }
            }
            _ => return None,
        },
        MsgType::DECLINE => {
            if version == SMC_V2 {
                MessageKind::DeclineV2
            } else {
                MessageKind::Decline
            }
        }
        _ => return None,
    };

    Some((kind, length))
}

/// A parsed CLC message.
///
/// `Display` renders the values mode; [`Message::reserved`] interleaves
/// the reserved fields; [`Message::dump`] gives the raw-byte hex dump.
#[derive(Clone, Debug)]
pub enum Message {
    Proposal(Proposal),
    ProposalV2(ProposalV2),
    AcceptSmcR(AcceptSmcR),
    AcceptSmcD(AcceptSmcD),
    AcceptSmcDv2(AcceptSmcDv2),
    ConfirmSmcR(AcceptSmcR),
    ConfirmSmcD(AcceptSmcD),
    ConfirmSmcDv2(AcceptSmcDv2),
    Decline(Decline),
    DeclineV2(DeclineV2),
}

impl Message {
    /// Common header of the parsed message.
    pub fn header(&self) -> &Header {
        match self {
            Message::Proposal(m) => &m.header,
            Message::ProposalV2(m) => &m.header,
            Message::AcceptSmcR(m) | Message::ConfirmSmcR(m) => &m.header,
            Message::AcceptSmcD(m) | Message::ConfirmSmcD(m) => &m.header,
            Message::AcceptSmcDv2(m) | Message::ConfirmSmcDv2(m) => &m.header,
            Message::Decline(m) => &m.header,
            Message::DeclineV2(m) => &m.header,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        match self {
            Message::Proposal(m) => m.reserved(),
            Message::ProposalV2(m) => m.reserved(),
            Message::AcceptSmcR(m) | Message::ConfirmSmcR(m) => m.reserved(),
            Message::AcceptSmcD(m) | Message::ConfirmSmcD(m) => m.reserved(),
            Message::AcceptSmcDv2(m) | Message::ConfirmSmcDv2(m) => m.reserved(),
            Message::Decline(m) => m.reserved(),
            Message::DeclineV2(m) => m.reserved(),
        }
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        match self {
            Message::Proposal(m) => m.dump(),
            Message::ProposalV2(m) => m.dump(),
            Message::AcceptSmcR(m) | Message::ConfirmSmcR(m) => m.dump(),
            Message::AcceptSmcD(m) | Message::ConfirmSmcD(m) => m.dump(),
            Message::AcceptSmcDv2(m) | Message::ConfirmSmcDv2(m) => m.dump(),
            Message::Decline(m) => m.dump(),
            Message::DeclineV2(m) => m.dump(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Proposal(m) => m.fmt(f),
            Message::ProposalV2(m) => m.fmt(f),
            Message::AcceptSmcR(m) | Message::ConfirmSmcR(m) => m.fmt(f),
            Message::AcceptSmcD(m) | Message::ConfirmSmcD(m) => m.fmt(f),
            Message::AcceptSmcDv2(m) | Message::ConfirmSmcDv2(m) => m.fmt(f),
            Message::Decline(m) => m.fmt(f),
            Message::DeclineV2(m) => m.fmt(f),
        }
    }
}
