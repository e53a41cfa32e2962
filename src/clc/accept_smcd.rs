//! SMC-D Accept and Confirm message, SMCv1 layout.

use std::fmt;

use tracing::warn;

use super::{err_dump, Header, MsgType, Raw, RmbeSize, Trailer, HEADER_LEN};

/// Length of a v1 SMC-D Accept/Confirm message.
pub const ACCEPT_SMCD_LEN: u16 = 48;

/// CLC SMC-D Accept/Confirm message (SMCv1).
#[derive(Clone, Debug, Default)]
pub struct AcceptSmcD {
    raw: Raw,
    pub header: Header,
    /// Sender GID.
    pub gid: u64,
    /// DMB token.
    pub token: u64,
    pub dmbe_index: u8,
    /// Compressed DMBE size (4 bits); shares the RMBE size encoding.
    pub dmbe_size: RmbeSize,
    reserved: u8,
    reserved2: [u8; 2],
    pub link_id: u32,
    reserved3: [u8; 12],
    pub trailer: Trailer,
}

impl AcceptSmcD {
    /// Parse a v1 SMC-D Accept or Confirm message. Malformed input
    /// yields a partial record with a diagnostic log.
    pub fn parse(buf: &[u8]) -> Self {
        let mut ac = AcceptSmcD {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..AcceptSmcD::default()
        };

        let len = usize::from(ac.header.length).min(buf.len());
        let buf = &buf[..len];

        if ac.header.length < ACCEPT_SMCD_LEN || buf.len() < usize::from(ACCEPT_SMCD_LEN) {
            if ac.header.msg_type == MsgType::CONFIRM {
                warn!("error parsing CLC Confirm: message too short");
            } else {
                warn!("error parsing CLC Accept: message too short");
            }
            err_dump(buf);
            return ac;
        }

        let mut skip = HEADER_LEN;

        ac.gid = u64::from_be_bytes([
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

        ac.token = u64::from_be_bytes([
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

        ac.dmbe_index = buf[skip];
        skip += 1;

        // 1 byte bitfield: dmbe size (4 bits), reserved (4 bits)
        ac.dmbe_size = RmbeSize((buf[skip] & 0b1111_0000) >> 4);
        ac.reserved = buf[skip] & 0b0000_1111;
        skip += 1;

        ac.reserved2.copy_from_slice(&buf[skip..skip + 2]);
        skip += 2;

        ac.link_id = u32::from_be_bytes([buf[skip], buf[skip + 1], buf[skip + 2], buf[skip + 3]]);
        skip += 4;

        ac.reserved3.copy_from_slice(&buf[skip..skip + 12]);

        ac.trailer = Trailer::parse(buf);
        ac
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "{}, SMC-D GID: {}, SMC-D Token: {}, DMBE Index: {}, DMBE Size: {}, \
             Reserved: {:#x}, Reserved: 0x{}, Link ID: {}, Reserved: 0x{}, Trailer: {}",
            self.header.reserved(),
            self.gid,
            self.token,
            self.dmbe_index,
            self.dmbe_size,
            self.reserved,
            hex::encode(self.reserved2),
            self.link_id,
            hex::encode(self.reserved3),
            self.trailer
        )
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for AcceptSmcD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, SMC-D GID: {}, SMC-D Token: {}, DMBE Index: {}, DMBE Size: {}, \
             Link ID: {}, Trailer: {}",
            self.header, self.gid, self.token, self.dmbe_index, self.dmbe_size, self.link_id,
            self.trailer
        )
    }
}
