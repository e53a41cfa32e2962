//! SMCv2 CLC Proposal message.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use tracing::warn;

use super::{
    err_dump, Eid, Header, Ipv6Prefix, Path, PeerId, Raw, Trailer, EID_LEN, HEADER_LEN,
    IPV6_PREFIX_LEN, PEER_ID_LEN, TRAILER_LEN,
};
use crate::util::MacAddr;

/// Minimum length of a v2 Proposal message.
pub const PROPOSAL_V2_LEN: u16 = 84;

/// Minimum length of the Proposal v2 Extension.
pub const PROPOSAL_V2_EXT_LEN: usize = 40;

/// Minimum length of the SMC-D v2 Extension.
pub const SMCDV2_EXT_LEN: usize = 48;

/// EIDs and GIDs carried in the v2 extension areas are capped at eight
/// entries each.
const MAX_AREA_ENTRIES: u8 = 8;

/// SMC-D GID entry: GID plus virtual channel ID.
#[derive(Clone, Copy, Debug, Default)]
pub struct GidEntry {
    pub gid: u64,
    pub vchid: u16,
}

/// CLC Proposal message (SMCv2).
///
/// Extends the v1 layout with the ISMv2 VCHID and the SMCv2 extension
/// offset. The IP/prefix info is only present when path is not "none",
/// the v2 extension when pathv2 is not "none", and the SMC-D v2
/// extension when pathv2 includes SMC-D.
#[derive(Clone, Debug)]
pub struct ProposalV2 {
    raw: Raw,
    pub header: Header,
    pub sender_peer_id: PeerId,

    // SMC-R GID info
    pub ib_gid: Ipv6Addr,
    pub ib_mac: MacAddr,
    pub ip_area_offset: u16,

    // SMC-D GID info
    pub smcd_gid: u64,
    pub ismv2_vchid: u16,
    pub smcv2_offset: u16,
    reserved: [u8; 28],

    // Optional IP/prefix info
    pub prefix: Ipv4Addr,
    pub prefix_len: u8,
    reserved2: [u8; 2],
    pub ipv6_prefix_count: u8,
    pub ipv6_prefixes: Vec<Ipv6Prefix>,

    // Proposal v2 Extension
    pub eid_count: u8,
    pub gid_count: u8,
    reserved3: u8,
    pub release: u8,
    reserved4: u8,
    pub seid_indicator: u8,
    reserved5: [u8; 2],
    pub smcdv2_offset: u16,
    reserved6: [u8; 32],
    pub eid_area: Vec<Eid>,

    // Optional SMC-D v2 Extension
    pub seid: Eid,
    reserved7: [u8; 16],
    pub gid_area: Vec<GidEntry>,

    pub trailer: Trailer,
}

impl Default for ProposalV2 {
    fn default() -> Self {
        ProposalV2 {
            raw: Raw::default(),
            header: Header::default(),
            sender_peer_id: PeerId::default(),
            ib_gid: Ipv6Addr::UNSPECIFIED,
            ib_mac: MacAddr::default(),
            ip_area_offset: 0,
            smcd_gid: 0,
            ismv2_vchid: 0,
            smcv2_offset: 0,
            reserved: [0; 28],
            prefix: Ipv4Addr::UNSPECIFIED,
            prefix_len: 0,
            reserved2: [0; 2],
            ipv6_prefix_count: 0,
            ipv6_prefixes: Vec::new(),
            eid_count: 0,
            gid_count: 0,
            reserved3: 0,
            release: 0,
            reserved4: 0,
            seid_indicator: 0,
            reserved5: [0; 2],
            smcdv2_offset: 0,
            reserved6: [0; 32],
            eid_area: Vec::new(),
            seid: Eid::default(),
            reserved7: [0; 16],
            gid_area: Vec::new(),
            trailer: Trailer::default(),
        }
    }
}

impl ProposalV2 {
    /// Parse a v2 Proposal. Malformed input yields a partial record with
    /// a diagnostic log; nothing is read past the declared length or the
    /// buffer end.
    pub fn parse(buf: &[u8]) -> Self {
        let mut p = ProposalV2 {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..ProposalV2::default()
        };

        let len = usize::from(p.header.length).min(buf.len());
        let buf = &buf[..len];

        if p.header.length < PROPOSAL_V2_LEN || buf.len() < usize::from(PROPOSAL_V2_LEN) {
            warn!("error parsing CLC Proposal v2: message too short");
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

        p.ismv2_vchid = u16::from_be_bytes([buf[skip], buf[skip + 1]]);
        skip += 2;

        p.smcv2_offset = u16::from_be_bytes([buf[skip], buf[skip + 1]]);
        skip += 2;

        p.reserved.copy_from_slice(&buf[skip..skip + 28]);
        skip += 28;

        // optional ip/prefix info
        if p.header.path != Path::NONE {
            // make sure we do not read outside the message
            if buf.len().saturating_sub(skip) < 4 + 1 + 2 + 1 + TRAILER_LEN {
                warn!("error parsing CLC Proposal v2: IP Area Offset too big");
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
                    warn!("error parsing CLC Proposal v2: IPv6 prefix count too big");
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
        }

        // proposal message v2 extension
        if p.header.pathv2 != Path::NONE {
            if buf.len().saturating_sub(skip) < PROPOSAL_V2_EXT_LEN + TRAILER_LEN {
                warn!("error parsing CLC Proposal v2: not enough space for Proposal v2 Extension");
                err_dump(buf);
                return p;
            }

            p.eid_count = buf[skip];
            skip += 1;

            p.gid_count = buf[skip];
            skip += 1;

            p.reserved3 = buf[skip];
            skip += 1;

            // release (4 bits), reserved (3 bits), SEID indicator (1 bit)
            p.release = buf[skip] >> 4;
            p.reserved4 = (buf[skip] & 0b0000_1110) >> 1;
            p.seid_indicator = buf[skip] & 0b0000_0001;
            skip += 1;

            p.reserved5.copy_from_slice(&buf[skip..skip + 2]);
            skip += 2;

            p.smcdv2_offset = u16::from_be_bytes([buf[skip], buf[skip + 1]]);
            skip += 2;

            p.reserved6.copy_from_slice(&buf[skip..skip + 32]);
            skip += 32;

            for _ in 0..p.eid_count.min(MAX_AREA_ENTRIES) {
                // make sure we are still inside the clc message
                if buf.len().saturating_sub(skip) < EID_LEN + TRAILER_LEN {
                    warn!("error parsing CLC Proposal v2: EID count too big");
                    err_dump(buf);
                    break;
                }

                p.eid_area.push(Eid::from_slice(&buf[skip..skip + EID_LEN]));
                skip += EID_LEN;
            }
        }

        // optional smc-d v2 extension
        if p.header.pathv2 == Path::SMC_D || p.header.pathv2 == Path::BOTH {
            if buf.len().saturating_sub(skip) < SMCDV2_EXT_LEN + TRAILER_LEN {
                warn!("error parsing CLC Proposal v2: not enough space for SMC-D v2 Extension");
                err_dump(buf);
                return p;
            }

            p.seid = Eid::from_slice(&buf[skip..skip + EID_LEN]);
            skip += EID_LEN;

            p.reserved7.copy_from_slice(&buf[skip..skip + 16]);
            skip += 16;

            for _ in 0..p.gid_count.min(MAX_AREA_ENTRIES) {
                // make sure we are still inside the clc message
                if buf.len().saturating_sub(skip) < 8 + 2 + TRAILER_LEN {
                    warn!("error parsing CLC Proposal v2: GID count too big");
                    err_dump(buf);
                    break;
                }

                let gid = u64::from_be_bytes([
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

                let vchid = u16::from_be_bytes([buf[skip], buf[skip + 1]]);
                skip += 2;

                p.gid_area.push(GidEntry { gid, vchid });
            }
        }

        p.trailer = Trailer::parse(buf);
        p
    }

    fn ipv4_string(&self) -> String {
        format!("IPv4 Prefix: {}/{}, ", self.prefix, self.prefix_len)
    }

    fn ipv6_string(&self) -> String {
        let mut out = format!("IPv6 Prefix Count: {}", self.ipv6_prefix_count);
        for prefix in &self.ipv6_prefixes {
            out.push_str(&format!(", IPv6 Prefix: {}", prefix));
        }
        out
    }

    fn ip_info_string(&self) -> String {
        if self.header.path == Path::NONE {
            return String::new();
        }
        self.ipv4_string() + &self.ipv6_string()
    }

    fn ip_info_reserved(&self) -> String {
        if self.header.path == Path::NONE {
            return String::new();
        }
        format!(
            "{}Reserved: 0x{}, {}",
            self.ipv4_string(),
            hex::encode(self.reserved2),
            self.ipv6_string()
        )
    }

    fn eid_area_string(&self) -> String {
        let mut out = String::new();
        for (i, eid) in self.eid_area.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("EID {}: {}", i, eid));
        }
        out
    }

    fn ext_string(&self) -> String {
        if self.header.pathv2 == Path::NONE {
            return String::new();
        }
        format!(
            "EID Number: {}, GID Number: {}, Release: {}, SEID Indicator: {}, \
             SMC-Dv2 Extension Offset: {}, EID Area: [{}]",
            self.eid_count,
            self.gid_count,
            self.release,
            self.seid_indicator,
            self.smcdv2_offset,
            self.eid_area_string()
        )
    }

    fn ext_reserved(&self) -> String {
        if self.header.pathv2 == Path::NONE {
            return String::new();
        }
        format!(
            "EID Number: {}, GID Number: {}, Reserved: {:#x}, Release: {}, \
             Reserved: {:#x}, SEID Indicator: {}, Reserved: 0x{}, \
             SMC-Dv2 Extension Offset: {}, Reserved: 0x{}, EID Area: [{}]",
            self.eid_count,
            self.gid_count,
            self.reserved3,
            self.release,
            self.reserved4,
            self.seid_indicator,
            hex::encode(self.reserved5),
            self.smcdv2_offset,
            hex::encode(self.reserved6),
            self.eid_area_string()
        )
    }

    fn gid_area_string(&self) -> String {
        let mut out = String::new();
        for (i, entry) in self.gid_area.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("GID {}: {}, VCHID {}: {}", i, entry.gid, i, entry.vchid));
        }
        out
    }

    fn smcd_ext_string(&self) -> String {
        if self.header.pathv2 != Path::SMC_D && self.header.pathv2 != Path::BOTH {
            return String::new();
        }
        format!("SEID: {}, GID Area: [{}]", self.seid, self.gid_area_string())
    }

    fn smcd_ext_reserved(&self) -> String {
        if self.header.pathv2 != Path::SMC_D && self.header.pathv2 != Path::BOTH {
            return String::new();
        }
        format!(
            "SEID: {}, Reserved: 0x{}, GID Area: [{}]",
            self.seid,
            hex::encode(self.reserved7),
            self.gid_area_string()
        )
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        let mut ip_info = self.ip_info_reserved();
        if !ip_info.is_empty() {
            ip_info = format!(", {}", ip_info);
        }
        let mut ext = self.ext_reserved();
        if !ext.is_empty() {
            ext = format!(", {}", ext);
        }
        let mut smcd_ext = self.smcd_ext_reserved();
        if !smcd_ext.is_empty() {
            smcd_ext = format!(", {}", smcd_ext);
        }

        format!(
            "{}, Peer ID: {}, SMC-R GID: {}, RoCE MAC: {}, IP Area Offset: {}, \
             SMC-D GID: {}, ISMv2 VCHID: {}, SMCv2 Extension Offset: {}, \
             Reserved: 0x{}{}{}{}, Trailer: {}",
            self.header.reserved(),
            self.sender_peer_id,
            self.ib_gid,
            self.ib_mac,
            self.ip_area_offset,
            self.smcd_gid,
            self.ismv2_vchid,
            self.smcv2_offset,
            hex::encode(self.reserved),
            ip_info,
            ext,
            smcd_ext,
            self.trailer
        )
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for ProposalV2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ip_info = self.ip_info_string();
        if !ip_info.is_empty() {
            ip_info = format!(", {}", ip_info);
        }
        let mut ext = self.ext_string();
        if !ext.is_empty() {
            ext = format!(", {}", ext);
        }
        let mut smcd_ext = self.smcd_ext_string();
        if !smcd_ext.is_empty() {
            smcd_ext = format!(", {}", smcd_ext);
        }

        write!(
            f,
            "{}, Peer ID: {}, SMC-R GID: {}, RoCE MAC: {}, IP Area Offset: {}, \
             SMC-D GID: {}, ISMv2 VCHID: {}, SMCv2 Extension Offset: {}{}{}{}, Trailer: {}",
            self.header,
            self.sender_peer_id,
            self.ib_gid,
            self.ib_mac,
            self.ip_area_offset,
            self.smcd_gid,
            self.ismv2_vchid,
            self.smcv2_offset,
            ip_info,
            ext,
            smcd_ext,
            self.trailer
        )
    }
}
