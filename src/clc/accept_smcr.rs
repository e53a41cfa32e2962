//! SMC-R Accept and Confirm message (the layouts are identical, the
//! header type byte tells them apart).

use std::fmt;
use std::net::Ipv6Addr;

use tracing::warn;

use super::{
    err_dump, Header, MsgType, PeerId, QpMtu, Raw, RmbeSize, Trailer, HEADER_LEN, PEER_ID_LEN,
};
use crate::util::MacAddr;

/// Length of a SMC-R Accept/Confirm message.
pub const ACCEPT_SMCR_LEN: u16 = 68;

/// CLC SMC-R Accept/Confirm message.
#[derive(Clone, Debug)]
pub struct AcceptSmcR {
    raw: Raw,
    pub header: Header,
    pub sender_peer_id: PeerId,
    /// GID of the RoCE device port, in IPv6 address format.
    pub ib_gid: Ipv6Addr,
    pub ib_mac: MacAddr,
    /// QP number, 3 bytes on the wire.
    pub qpn: u32,
    pub rmb_rkey: u32,
    /// Index of the RMBE within the RMB.
    pub rmbe_index: u8,
    /// Unique connection ID.
    pub rmbe_alert_token: u32,
    pub rmbe_size: RmbeSize,
    pub qp_mtu: QpMtu,
    reserved: u8,
    /// RMB virtual address.
    pub rmb_dma_addr: u64,
    reserved2: u8,
    /// Initial packet sequence number, 3 bytes on the wire.
    pub psn: u32,
    pub trailer: Trailer,
}

impl Default for AcceptSmcR {
    fn default() -> Self {
        AcceptSmcR {
            raw: Raw::default(),
            header: Header::default(),
            sender_peer_id: PeerId::default(),
            ib_gid: Ipv6Addr::UNSPECIFIED,
            ib_mac: MacAddr::default(),
            qpn: 0,
            rmb_rkey: 0,
            rmbe_index: 0,
            rmbe_alert_token: 0,
            rmbe_size: RmbeSize::default(),
            qp_mtu: QpMtu::default(),
            reserved: 0,
            rmb_dma_addr: 0,
            reserved2: 0,
            psn: 0,
            trailer: Trailer::default(),
        }
    }
}

impl AcceptSmcR {
    /// Parse a SMC-R Accept or Confirm message. Malformed input yields a
    /// partial record with a diagnostic log.
    pub fn parse(buf: &[u8]) -> Self {
        let mut ac = AcceptSmcR {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..AcceptSmcR::default()
        };

        let len = usize::from(ac.header.length).min(buf.len());
        let buf = &buf[..len];

        if ac.header.length < ACCEPT_SMCR_LEN || buf.len() < usize::from(ACCEPT_SMCR_LEN) {
            if ac.header.msg_type == MsgType::CONFIRM {
                warn!("error parsing CLC Confirm: message too short");
            } else {
                warn!("error parsing CLC Accept: message too short");
            }
            err_dump(buf);
            return ac;
        }

        let mut skip = HEADER_LEN;

        ac.sender_peer_id = PeerId::from_slice(&buf[skip..skip + PEER_ID_LEN]);
        skip += PEER_ID_LEN;

        let mut gid = [0u8; 16];
        gid.copy_from_slice(&buf[skip..skip + 16]);
        ac.ib_gid = Ipv6Addr::from(gid);
        skip += 16;

        ac.ib_mac = MacAddr::from_slice(&buf[skip..skip + 6]);
        skip += 6;

        // QP number is 3 bytes
        ac.qpn = u32::from(buf[skip]) << 16 | u32::from(buf[skip + 1]) << 8
            | u32::from(buf[skip + 2]);
        skip += 3;

        ac.rmb_rkey = u32::from_be_bytes([buf[skip], buf[skip + 1], buf[skip + 2], buf[skip + 3]]);
        skip += 4;

        ac.rmbe_index = buf[skip];
        skip += 1;

        ac.rmbe_alert_token =
            u32::from_be_bytes([buf[skip], buf[skip + 1], buf[skip + 2], buf[skip + 3]]);
        skip += 4;

        // 1 byte bitfield: rmbe size (4 bits), qp mtu (4 bits)
        ac.rmbe_size = RmbeSize((buf[skip] & 0b1111_0000) >> 4);
        ac.qp_mtu = QpMtu(buf[skip] & 0b0000_1111);
        skip += 1;

        ac.reserved = buf[skip];
        skip += 1;

        ac.rmb_dma_addr = u64::from_be_bytes([
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

        ac.reserved2 = buf[skip];
        skip += 1;

        // packet sequence number is 3 bytes
        ac.psn = u32::from(buf[skip]) << 16 | u32::from(buf[skip + 1]) << 8
            | u32::from(buf[skip + 2]);

        ac.trailer = Trailer::parse(buf);
        ac
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "{}, Peer ID: {}, SMC-R GID: {}, RoCE MAC: {}, QP Number: {}, \
             RMB RKey: {}, RMBE Index: {}, RMBE Alert Token: {}, RMBE Size: {}, \
             QP MTU: {}, Reserved: {:#x}, RMB Virtual Address: {:#x}, \
             Reserved: {:#x}, Packet Sequence Number: {}, Trailer: {}",
            self.header.reserved(),
            self.sender_peer_id,
            self.ib_gid,
            self.ib_mac,
            self.qpn,
            self.rmb_rkey,
            self.rmbe_index,
            self.rmbe_alert_token,
            self.rmbe_size,
            self.qp_mtu,
            self.reserved,
            self.rmb_dma_addr,
            self.reserved2,
            self.psn,
            self.trailer
        )
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for AcceptSmcR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Peer ID: {}, SMC-R GID: {}, RoCE MAC: {}, QP Number: {}, \
             RMB RKey: {}, RMBE Index: {}, RMBE Alert Token: {}, RMBE Size: {}, \
             QP MTU: {}, RMB Virtual Address: {:#x}, Packet Sequence Number: {}, \
             Trailer: {}",
            self.header,
            self.sender_peer_id,
            self.ib_gid,
            self.ib_mac,
            self.qpn,
            self.rmb_rkey,
            self.rmbe_index,
            self.rmbe_alert_token,
            self.rmbe_size,
            self.qp_mtu,
            self.rmb_dma_addr,
            self.psn,
            self.trailer
        )
    }
}
