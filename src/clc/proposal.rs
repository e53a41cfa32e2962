//! SMCv1 CLC Proposal message.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use tracing::warn;

use super::{err_dump, Header, PeerId, Raw, Trailer, HEADER_LEN, PEER_ID_LEN, TRAILER_LEN};
use crate::util::MacAddr;

/// Minimum length of a v1 Proposal message.
pub const PROPOSAL_LEN: u16 = 52;

/// Length of one IPv6 prefix entry: 16-byte address plus prefix length.
pub const IPV6_PREFIX_LEN: usize = 17;

/// IP area offset value indicating that the optional SMC-D info block is
/// present.
pub const SMCD_IP_AREA_OFFSET: u16 = 40;

/// IPv6 prefix entry in the proposal prefix array.
#[derive(Clone, Copy, Debug)]
pub struct Ipv6Prefix {
    pub prefix: Ipv6Addr,
    pub prefix_len: u8,
}

impl fmt::Display for Ipv6Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.prefix_len)
    }
}

/// CLC Proposal message (SMCv1).
///
/// After the header: sender peer ID, RoCE GID and MAC, the IP area
/// offset, an optional SMC-D block when the offset is 40, the IPv4
/// prefix, and a variable array of IPv6 prefixes.
#[derive(Clone, Debug)]
pub struct Proposal {
    raw: Raw,
    pub header: Header,
    pub sender_peer_id: PeerId,
    /// GID of the RoCE device port, in IPv6 address format.
    pub ib_gid: Ipv6Addr,
    /// MAC of the RoCE device port.
    pub ib_mac: MacAddr,
    /// Offset to the IP address info area.
    pub ip_area_offset: u16,

    // Optional SMC-D info
    pub smcd_gid: u64,
    reserved: [u8; 32],

    // IP/prefix info
    pub prefix: Ipv4Addr,
    pub prefix_len: u8,
    reserved2: [u8; 2],
    pub ipv6_prefix_count: u8,
    pub ipv6_prefixes: Vec<Ipv6Prefix>,

    pub trailer: Trailer,
}

impl Default for Proposal {
    fn default() -> Self {
        Proposal {
            raw: Raw::default(),
            header: Header::default(),
            sender_peer_id: PeerId::default(),
            ib_gid: Ipv6Addr::UNSPECIFIED,
            ib_mac: MacAddr::default(),
            ip_area_offset: 0,
            smcd_gid: 0,
            reserved: [0; 32],
            prefix: Ipv4Addr::UNSPECIFIED,
            prefix_len: 0,
            reserved2: [0; 2],
            ipv6_prefix_count: 0,
            ipv6_prefixes: Vec::new(),
            trailer: Trailer::default(),
        }
    }
}

impl Proposal {
    /// Parse a v1 Proposal. Malformed input yields a partial record with
    /// a diagnostic log; nothing is read past the declared length or the
    /// buffer end.
    pub fn parse(buf: &[u8]) -> Self {
        let mut p = Proposal {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..Proposal::default()
        };

        let len = usize::from(p.header.length).min(buf.len());
        let buf = &buf[..len];

        if p.header.length < PROPOSAL_LEN || buf.len() < usize::from(PROPOSAL_LEN) {
            warn!("error parsing CLC Proposal: message too short");
            err_dump(buf);
            return p;
        }

        let mut skip = HEADER_LEN;

        p.sender_peer_id = PeerId::from_slice(&buf[skip..skip + PEER_ID_LEN]);
        skip += PEER_ID_LEN;

        let mut gid = [0u8; 16];
        gid.copy_from_slice(&buf[skip..skip + 16]);
        p.ib_gid = Ipv6Addr::from(gid);
        skip += 16;

        p.ib_mac = MacAddr::from_slice(&buf[skip..skip + 6]);
        skip += 6;

        p.ip_area_offset = u16::from_be_bytes([buf[skip], buf[skip + 1]]);
        skip += 2;

        if p.ip_area_offset == SMCD_IP_AREA_OFFSET {
            // optional SMC-D info
            if buf.len() - skip < 8 + 32 {
                warn!("error parsing CLC Proposal: IP Area Offset too big");
                err_dump(buf);
                return p;
            }

            p.smcd_gid = u64::from_be_bytes([
                buf[skip],
                buf[skip + 1],
                buf[skip + 2],
                buf[skip + 3],
                buf[skip + 4],
                buf[skip + 5],
                buf[skip + 6],
                buf[skip + 7],
            ]);
            skip += 8;

            p.reserved.copy_from_slice(&buf[skip..skip + 32]);
            skip += 32;
        } else {
            // other offsets skip the declared number of bytes
            skip += usize::from(p.ip_area_offset);
        }

        // make sure we do not read outside the message
        if buf.len().saturating_sub(skip) < 4 + 1 + 2 + 1 + TRAILER_LEN {
            warn!("error parsing CLC Proposal: IP Area Offset too big");
            err_dump(buf);
            return p;
        }

        p.prefix = Ipv4Addr::new(buf[skip], buf[skip + 1], buf[skip + 2], buf[skip + 3]);
        skip += 4;

        p.prefix_len = buf[skip];
        skip += 1;

        p.reserved2.copy_from_slice(&buf[skip..skip + 2]);
        skip += 2;

        p.ipv6_prefix_count = buf[skip];
        skip += 1;

        for _ in 0..p.ipv6_prefix_count {
            // make sure we are still inside the clc message
            if buf.len().saturating_sub(skip) < IPV6_PREFIX_LEN + TRAILER_LEN {
                warn!("error parsing CLC Proposal: IPv6 prefix count too big");
                err_dump(buf);
                break;
            }

            let mut addr = [0u8; 16];
            addr.copy_from_slice(&buf[skip..skip + 16]);
            skip += 16;

            let prefix_len = buf[skip];
            skip += 1;

            p.ipv6_prefixes.push(Ipv6Prefix {
                prefix: Ipv6Addr::from(addr),
                prefix_len,
            });
        }

        p.trailer = Trailer::parse(buf);
        p
    }

    fn smcd_info(&self) -> String {
        if self.ip_area_offset != SMCD_IP_AREA_OFFSET {
            return String::new();
        }
        format!("SMC-D GID: {}, ", self.smcd_gid)
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        let smcd_info = if self.ip_area_offset == SMCD_IP_AREA_OFFSET {
            format!(
                "SMC-D GID: {}, Reserved: 0x{}, ",
                self.smcd_gid,
                hex::encode(self.reserved)
            )
        } else {
            String::new()
        };

        let mut out = format!(
            "{}, Peer ID: {}, SMC-R GID: {}, RoCE MAC: {}, IP Area Offset: {}, \
             {}IPv4 Prefix: {}/{}, Reserved: 0x{}, IPv6 Prefix Count: {}",
            self.header.reserved(),
            self.sender_peer_id,
            self.ib_gid,
            self.ib_mac,
            self.ip_area_offset,
            smcd_info,
            self.prefix,
            self.prefix_len,
            hex::encode(self.reserved2),
            self.ipv6_prefix_count
        );
        for prefix in &self.ipv6_prefixes {
            out.push_str(&format!(", IPv6 Prefix: {}", prefix));
        }
        out.push_str(&format!(", Trailer: {}", self.trailer));
        out
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Peer ID: {}, SMC-R GID: {}, RoCE MAC: {}, IP Area Offset: {}, \
             {}IPv4 Prefix: {}/{}, IPv6 Prefix Count: {}",
            self.header,
            self.sender_peer_id,
            self.ib_gid,
            self.ib_mac,
            self.ip_area_offset,
            self.smcd_info(),
            self.prefix,
            self.prefix_len,
            self.ipv6_prefix_count
        )?;
        for prefix in &self.ipv6_prefixes {
            write!(f, ", IPv6 Prefix: {}", prefix)?;
        }
        write!(f, ", Trailer: {}", self.trailer)
    }
}
