//! CLC Decline message, v1 and v2, with the peer diagnosis code table.

use std::fmt;

use tracing::warn;

use super::{err_dump, Header, OsType, PeerId, Raw, Trailer, HEADER_LEN, PEER_ID_LEN};

/// Length of a CLC Decline message.
pub const DECLINE_LEN: u16 = 28;

// Decline diagnosis codes (linux)
pub const DECLINE_MEM: u32 = 0x0101_0000; // insufficient memory resources
pub const DECLINE_TIMEOUT_CL: u32 = 0x0201_0000; // timeout w4 QP confirm link
pub const DECLINE_TIMEOUT_AL: u32 = 0x0202_0000; // timeout w4 QP add link
pub const DECLINE_CNF_ERR: u32 = 0x0300_0000; // configuration error
pub const DECLINE_PEER_NO_SMC: u32 = 0x0301_0000; // peer did not indicate SMC
pub const DECLINE_IPSEC: u32 = 0x0302_0000; // IPsec usage
pub const DECLINE_NO_SMC_DEV: u32 = 0x0303_0000; // no SMC device found (R or D)
pub const DECLINE_NO_SMCD_DEV: u32 = 0x0303_0001; // no SMC-D device found
pub const DECLINE_NO_SMCR_DEV: u32 = 0x0303_0002; // no SMC-R device found
pub const DECLINE_NO_ISM2_SUPP: u32 = 0x0303_0003; // hardware has no ISMv2 support
pub const DECLINE_NO_V2_EXT: u32 = 0x0303_0004; // peer sent no clc v2 extension
pub const DECLINE_NO_V2D_EXT: u32 = 0x0303_0005; // peer sent no clc SMC-Dv2 ext.
pub const DECLINE_NO_SEID: u32 = 0x0303_0006; // peer sent no SEID
pub const DECLINE_NO_SMCD2_DEV: u32 = 0x0303_0007; // no SMC-Dv2 device found
pub const DECLINE_MODE_UNSUPP: u32 = 0x0304_0000; // smc modes do not match (R or D)
pub const DECLINE_RMBE_EYEC: u32 = 0x0305_0000; // peer has eyecatcher in RMBE
pub const DECLINE_OPT_UNSUPP: u32 = 0x0306_0000; // fastopen sockopt not supported
pub const DECLINE_DIFF_PREFIX: u32 = 0x0307_0000; // IP prefix / subnet mismatch
pub const DECLINE_GET_VLAN_ERR: u32 = 0x0308_0000; // err to get vlan id of ip device
pub const DECLINE_ISM_VLAN_ERR: u32 = 0x0309_0000; // err to reg vlan id on ism dev
pub const DECLINE_NO_ACT_LINK: u32 = 0x030a_0000; // no active smc-r link in lgr
pub const DECLINE_NO_SRV_LINK: u32 = 0x030b_0000; // SMC-R link from srv not found
pub const DECLINE_VERS_MISMAT: u32 = 0x030c_0000; // SMC version mismatch
pub const DECLINE_MAX_DMB: u32 = 0x030d_0000; // SMC-D DMB limit exceeded
pub const DECLINE_SYNC_ERR: u32 = 0x0400_0000; // synchronization error
pub const DECLINE_PEER_DECL: u32 = 0x0500_0000; // peer declined during handshake
pub const DECLINE_INTERR: u32 = 0x0999_0000; // internal error
pub const DECLINE_ERR_RTOK: u32 = 0x0999_0001; // rtoken handling failed
pub const DECLINE_ERR_RDY_LNK: u32 = 0x0999_0002; // ib ready link failed
pub const DECLINE_ERR_REG_RMB: u32 = 0x0999_0003; // reg rmb failed

/// Peer diagnosis code carried in a Decline message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerDiagnosis(pub u32);

impl fmt::Display for PeerDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let diag = match self.0 {
            DECLINE_MEM => "insufficient memory resources",
            DECLINE_TIMEOUT_CL => "timeout w4 QP confirm link",
            DECLINE_TIMEOUT_AL => "timeout w4 QP add link",
            DECLINE_CNF_ERR => "configuration error",
            DECLINE_PEER_NO_SMC => "peer did not indicate SMC",
            DECLINE_IPSEC => "IPsec usage",
            DECLINE_NO_SMC_DEV => "no SMC device found (R or D)",
            DECLINE_NO_SMCD_DEV => "no SMC-D device found",
            DECLINE_NO_SMCR_DEV => "no SMC-R device found",
            DECLINE_NO_ISM2_SUPP => "hardware has no ISMv2 support",
            DECLINE_NO_V2_EXT => "peer sent no clc v2 extension",
            DECLINE_NO_V2D_EXT => "peer sent no clc SMC-Dv2 ext.",
            DECLINE_NO_SEID => "peer sent no SEID",
            DECLINE_NO_SMCD2_DEV => "no SMC-Dv2 device found",
            DECLINE_MODE_UNSUPP => "smc modes do not match (R or D)",
            DECLINE_RMBE_EYEC => "peer has eyecatcher in RMBE",
            DECLINE_OPT_UNSUPP => "fastopen sockopt not supported",
            DECLINE_DIFF_PREFIX => "IP prefix / subnet mismatch",
            DECLINE_GET_VLAN_ERR => "err to get vlan id of ip device",
            DECLINE_ISM_VLAN_ERR => "err to reg vlan id on ism dev",
            DECLINE_NO_ACT_LINK => "no active smc-r link in lgr",
            DECLINE_NO_SRV_LINK => "SMC-R link from srv not found",
            DECLINE_VERS_MISMAT => "SMC version mismatch",
            DECLINE_MAX_DMB => "SMC-D DMB limit exceeded",
            DECLINE_SYNC_ERR => "synchronization error",
            DECLINE_PEER_DECL => "peer declined during handshake",
            DECLINE_INTERR => "internal error",
            DECLINE_ERR_RTOK => "rtoken handling failed",
            DECLINE_ERR_RDY_LNK => "ib ready link failed",
            DECLINE_ERR_REG_RMB => "reg rmb failed",
            _ => "Unknown",
        };
        write!(f, "{:#x} ({})", self.0, diag)
    }
}

/// CLC Decline message (SMCv1).
#[derive(Clone, Debug, Default)]
pub struct Decline {
    raw: Raw,
    pub header: Header,
    pub sender_peer_id: PeerId,
    pub peer_diagnosis: PeerDiagnosis,
    reserved: [u8; 4],
    pub trailer: Trailer,
}

impl Decline {
    /// Parse a v1 Decline message. Malformed input yields a partial
    /// record with a diagnostic log.
    pub fn parse(buf: &[u8]) -> Self {
        let mut d = Decline {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..Decline::default()
        };

        let len = usize::from(d.header.length).min(buf.len());
        let buf = &buf[..len];

        if d.header.length < DECLINE_LEN || buf.len() < usize::from(DECLINE_LEN) {
            warn!("error parsing CLC Decline: message too short");
            err_dump(buf);
            return d;
        }

        let mut skip = HEADER_LEN;

        d.sender_peer_id = PeerId::from_slice(&buf[skip..skip + PEER_ID_LEN]);
        skip += PEER_ID_LEN;

        d.peer_diagnosis = PeerDiagnosis(u32::from_be_bytes([
            buf[skip],
            buf[skip + 1],
            buf[skip + 2],
            buf[skip + 3],
        ]));
        skip += 4;

        d.reserved.copy_from_slice(&buf[skip..skip + 4]);

        d.trailer = Trailer::parse(buf);
        d
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "{}, Peer ID: {}, Peer Diagnosis: {}, Reserved: 0x{}, Trailer: {}",
            self.header.reserved(),
            self.sender_peer_id,
            self.peer_diagnosis,
            hex::encode(self.reserved),
            self.trailer
        )
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Peer ID: {}, Peer Diagnosis: {}, Trailer: {}",
            self.header, self.sender_peer_id, self.peer_diagnosis, self.trailer
        )
    }
}

/// CLC Decline message (SMCv2). The top four bits of the first reserved
/// byte carry the sender's OS type.
#[derive(Clone, Debug, Default)]
pub struct DeclineV2 {
    raw: Raw,
    pub header: Header,
    pub sender_peer_id: PeerId,
    pub peer_diagnosis: PeerDiagnosis,
    pub os_type: OsType,
    reserved: [u8; 4],
    pub trailer: Trailer,
}

impl DeclineV2 {
    /// Parse a v2 Decline message. Malformed input yields a partial
    /// record with a diagnostic log.
    pub fn parse(buf: &[u8]) -> Self {
        let mut d = DeclineV2 {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..DeclineV2::default()
        };

        let len = usize::from(d.header.length).min(buf.len());
        let buf = &buf[..len];

        if d.header.length < DECLINE_LEN || buf.len() < usize::from(DECLINE_LEN) {
            warn!("error parsing CLC Decline: message too short");
            err_dump(buf);
            return d;
        }

        let mut skip = HEADER_LEN;

        d.sender_peer_id = PeerId::from_slice(&buf[skip..skip + PEER_ID_LEN]);
        skip += PEER_ID_LEN;

        d.peer_diagnosis = PeerDiagnosis(u32::from_be_bytes([
            buf[skip],
            buf[skip + 1],
            buf[skip + 2],
            buf[skip + 3],
        ]));
        skip += 4;

        d.reserved.copy_from_slice(&buf[skip..skip + 4]);

        // os type lives in the top four bits of the first reserved byte
        d.os_type = OsType(buf[skip] >> 4);
        d.reserved[0] &= 0b0000_1111;

        d.trailer = Trailer::parse(buf);
        d
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "{}, Peer ID: {}, Peer Diagnosis: {}, OS Type: {}, Reserved: 0x{}, Trailer: {}",
            self.header.reserved(),
            self.sender_peer_id,
            self.peer_diagnosis,
            self.os_type,
            hex::encode(self.reserved),
            self.trailer
        )
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for DeclineV2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Peer ID: {}, Peer Diagnosis: {}, OS Type: {}, Trailer: {}",
            self.header, self.sender_peer_id, self.peer_diagnosis, self.os_type, self.trailer
        )
    }
}
