//! SMC-D Accept and Confirm message, SMCv2 layout with the optional
//! First Contact Extension.

use std::fmt;

use tracing::warn;

use super::{err_dump, Eid, Header, MsgType, OsType, Raw, RmbeSize, Trailer, EID_LEN, HEADER_LEN};

/// Minimum length of a v2 SMC-D Accept/Confirm message.
pub const ACCEPT_SMCDV2_LEN: u16 = 78;

/// Length of a v2 SMC-D Accept/Confirm with First Contact Extension.
pub const ACCEPT_SMCDV2_FCE_LEN: u16 = 114;

/// CLC SMC-D Accept/Confirm message (SMCv2).
#[derive(Clone, Debug, Default)]
pub struct AcceptSmcDv2 {
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
    pub ismv2_vchid: u16,
    pub eid: Eid,
    reserved3: [u8; 8],

    // First Contact Extension, present when the message length is 114
    reserved4: u8,
    pub os_type: OsType,
    pub release: u8,
    reserved5: [u8; 2],
    /// Hostname, same format as an EID.
    pub hostname: Eid,

    pub trailer: Trailer,
}

impl AcceptSmcDv2 {
    /// Parse a v2 SMC-D Accept or Confirm message. Malformed input
    /// yields a partial record with a diagnostic log.
    pub fn parse(buf: &[u8]) -> Self {
        let mut ac = AcceptSmcDv2 {
            raw: Raw::copy_from(buf),
            header: Header::parse(buf),
            ..AcceptSmcDv2::default()
        };

        let len = usize::from(ac.header.length).min(buf.len());
        let buf = &buf[..len];

        if ac.header.length < ACCEPT_SMCDV2_LEN || buf.len() < usize::from(ACCEPT_SMCDV2_LEN) {
            if ac.header.msg_type == MsgType::CONFIRM {
                warn!("error parsing SMC-Dv2 CLC Confirm: message too short");
            } else {
                warn!("error parsing SMC-Dv2 CLC Accept: message too short");
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

        ac.ismv2_vchid = u16::from_be_bytes([buf[skip], buf[skip + 1]]);
        skip += 2;

        ac.eid = Eid::from_slice(&buf[skip..skip + EID_LEN]);
        skip += EID_LEN;

        ac.reserved3.copy_from_slice(&buf[skip..skip + 8]);
        skip += 8;

        // first contact extension
        if ac.header.length == ACCEPT_SMCDV2_FCE_LEN {
            if buf.len() < usize::from(ACCEPT_SMCDV2_FCE_LEN) {
                if ac.header.msg_type == MsgType::CONFIRM {
                    warn!("error parsing SMC-Dv2 CLC Confirm: message too short");
                } else {
                    warn!("error parsing SMC-Dv2 CLC Accept: message too short");
                }
                err_dump(buf);
                ac.trailer = Trailer::parse(buf);
                return ac;
            }

            ac.reserved4 = buf[skip];
            skip += 1;

            // 1 byte bitfield: os type (4 bits), release (4 bits)
            ac.os_type = OsType(buf[skip] >> 4);
            ac.release = buf[skip] & 0b0000_1111;
            skip += 1;

            ac.reserved5.copy_from_slice(&buf[skip..skip + 2]);
            skip += 2;

            ac.hostname = Eid::from_slice(&buf[skip..skip + EID_LEN]);
        }

        ac.trailer = Trailer::parse(buf);
        ac
    }

    /// The First Contact Extension only renders when the message is long
    /// enough to carry it.
    fn fce_string(&self) -> String {
        if self.header.length < ACCEPT_SMCDV2_FCE_LEN {
            return String::new();
        }
        format!(
            ", OS Type: {}, Release: {}, Hostname: {}",
            self.os_type, self.release, self.hostname
        )
    }

    fn fce_reserved(&self) -> String {
        if self.header.length < ACCEPT_SMCDV2_FCE_LEN {
            return String::new();
        }
        format!(
            ", Reserved: {:#x}, OS Type: {}, Release: {}, Reserved: 0x{}, Hostname: {}",
            self.reserved4,
            self.os_type,
            self.release,
            hex::encode(self.reserved5),
            self.hostname
        )
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "{}, SMC-D GID: {}, SMC-D Token: {}, DMBE Index: {}, DMBE Size: {}, \
             Reserved: {:#x}, Reserved: 0x{}, Link ID: {}, ISMv2 VCHID: {}, EID: {}, \
             Reserved: 0x{}{}, Trailer: {}",
            self.header.reserved(),
            self.gid,
            self.token,
            self.dmbe_index,
            self.dmbe_size,
            self.reserved,
            hex::encode(self.reserved2),
            self.link_id,
            self.ismv2_vchid,
            self.eid,
            hex::encode(self.reserved3),
            self.fce_reserved(),
            self.trailer
        )
    }

    /// Hex dump of the raw message bytes.
    pub fn dump(&self) -> String {
        self.raw.dump()
    }
}

impl fmt::Display for AcceptSmcDv2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, SMC-D GID: {}, SMC-D Token: {}, DMBE Index: {}, DMBE Size: {}, \
             Link ID: {}, ISMv2 VCHID: {}, EID: {}{}, Trailer: {}",
            self.header,
            self.gid,
            self.token,
            self.dmbe_index,
            self.dmbe_size,
            self.link_id,
            self.ismv2_vchid,
            self.eid,
            self.fce_string(),
            self.trailer
        )
    }
}
