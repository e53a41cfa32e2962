//! RoCE Base Transport Header decoding.
//!
//! The BTH is the 12-byte InfiniBand transport header that follows the
//! GRH in RoCE packets. The top three opcode bits select the transport
//! class, the low five bits index a class-specific operation table.

use std::fmt;

use crate::util::hex_dump;

/// Next-header value announcing a BTH in the GRH.
pub const BTH_NEXT_HEADER: u8 = 0x1b;

/// Length of the base transport header in bytes.
pub const BTH_LEN: usize = 12;

// Operation names for the reliable connection class; the extended
// reliable connection class shares them.
static RC_STRINGS: [&str; 24] = [
    "SEND First",
    "SEND Middle",
    "SEND Last",
    "SEND Last with Immediate",
    "SEND Only",
    "SEND Only with Immediate",
    "RDMA WRITE First",
    "RDMA WRITE Middle",
    "RDMA WRITE Last",
    "RDMA WRITE Last with Immediate",
    "RDMA WRITE Only",
    "RDMA WRITE Only with Immediate",
    "RDMA READ Request",
    "RDMA READ response First",
    "RDMA READ response Middle",
    "RDMA READ response Last",
    "RDMA READ response Only",
    "Acknowledge",
    "ATOMIC Acknowledge",
    "CmpSwap",
    "FetchAdd",
    "Reserved",
    "SEND Last with Invalidate",
    "SEND Only with Invalidate",
];

static UC_STRINGS: [&str; 12] = [
    "SEND First",
    "SEND Middle",
    "SEND Last",
    "SEND Last with Immediate",
    "SEND Only",
    "SEND Only with Immediate",
    "RDMA WRITE First",
    "RDMA WRITE Middle",
    "RDMA WRITE Last",
    "RDMA WRITE Last with Immediate",
    "RDMA WRITE Only",
    "RDMA WRITE Only with Immediate",
];

static RD_STRINGS: [&str; 22] = [
    "SEND First",
    "SEND Middle",
    "SEND Last",
    "SEND Last with Immediate",
    "SEND Only",
    "SEND Only with Immediate",
    "RDMA WRITE First",
    "RDMA WRITE Middle",
    "RDMA WRITE Last",
    "RDMA WRITE Last with Immediate",
    "RDMA WRITE Only",
    "RDMA WRITE Only with Immediate",
    "RDMA READ Request",
    "RDMA READ response First",
    "RDMA READ response Middle",
    "RDMA READ response Last",
    "RDMA READ response Only",
    "Acknowledge",
    "ATOMIC Acknowledge",
    "CmpSwap",
    "FetchAdd",
    "RESYNC",
];

static UD_STRINGS: [&str; 6] = [
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "SEND Only",
    "SEND Only with Immediate",
];

/// BTH opcode byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Opcode(pub u8);

impl Opcode {
    fn class_string(&self) -> String {
        let op = usize::from(self.0 & 0b0001_1111);
        match self.0 >> 5 {
            0b000 => format!("RC {}", RC_STRINGS.get(op).copied().unwrap_or("Reserved")),
            0b001 => format!("UC {}", UC_STRINGS.get(op).copied().unwrap_or("Reserved")),
            0b010 => format!("RD {}", RD_STRINGS.get(op).copied().unwrap_or("Reserved")),
            0b011 => format!("UD {}", UD_STRINGS.get(op).copied().unwrap_or("Reserved")),
            0b100 => format!("CNP {}", if op == 0 { "CNP" } else { "Reserved" }),
            // xrc shares the rc operation names
            0b101 => format!("XRC {}", RC_STRINGS.get(op).copied().unwrap_or("Reserved")),
            _ => "Manufacturer Specific".to_string(),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b} ({})", self.0, self.class_string())
    }
}

/// RoCE base transport header.
#[derive(Clone, Debug, Default)]
pub struct Bth {
    raw: Vec<u8>,
    pub opcode: Opcode,
    /// Solicited event.
    pub se: bool,
    /// Migration request.
    pub m: bool,
    /// Pad count (2 bits).
    pub pad: u8,
    /// Transport header version (4 bits).
    pub tver: u8,
    /// Partition key.
    pub pkey: u16,
    pub fecn: bool,
    pub becn: bool,
    reserved: u8,
    /// Destination QP number, 3 bytes on the wire.
    pub dest_qp: u32,
    /// Acknowledge request.
    pub ack: bool,
    reserved2: u8,
    /// Packet sequence number, 3 bytes on the wire.
    pub psn: u32,
}

impl Bth {
    /// Parse the base transport header at the start of buf; None if buf
    /// is shorter than [`BTH_LEN`]. Trailing payload bytes are kept in
    /// the raw dump.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < BTH_LEN {
            return None;
        }

        // solicited event, migration request, pad count, header version
        let se = buf[1] & 0b1000_0000 > 0;
        let m = buf[1] & 0b0100_0000 > 0;
        let pad = (buf[1] & 0b0011_0000) >> 4;
        let tver = buf[1] & 0b0000_1111;

        let pkey = u16::from_be_bytes([buf[2], buf[3]]);

        // FECN, BECN, the rest of the byte is reserved
        let fecn = buf[4] & 0b1000_0000 > 0;
        let becn = buf[4] & 0b0100_0000 > 0;
        let reserved = buf[4] & 0b0011_1111;

        // destination QP number is 3 bytes
        let dest_qp = u32::from(buf[5]) << 16 | u32::from(buf[6]) << 8 | u32::from(buf[7]);

        // acknowledge request, the rest of the byte is reserved
        let ack = buf[8] & 0b1000_0000 > 0;
        let reserved2 = buf[8] & 0b0111_1111;

        // packet sequence number is 3 bytes
        let psn = u32::from(buf[9]) << 16 | u32::from(buf[10]) << 8 | u32::from(buf[11]);

        Some(Bth {
            raw: buf.to_vec(),
            opcode: Opcode(buf[0]),
            se,
            m,
            pad,
            tver,
            pkey,
            fecn,
            becn,
            reserved,
            dest_qp,
            ack,
            reserved2,
            psn,
        })
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "BTH: OpCode: {}, SE: {}, M: {}, Pad: {}, TVer: {}, PKey: {}, FECN: {}, \
             BECN: {}, Res: {:#x}, DestQP: {}, A: {}, Res: {:#x}, PSN: {}\n",
            self.opcode,
            self.se,
            self.m,
            self.pad,
            self.tver,
            self.pkey,
            self.fecn,
            self.becn,
            self.reserved,
            self.dest_qp,
            self.ack,
            self.reserved2,
            self.psn
        )
    }

    /// Hex dump of the raw header bytes.
    pub fn dump(&self) -> String {
        hex_dump(&self.raw)
    }
}

impl fmt::Display for Bth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BTH: OpCode: {}, SE: {}, M: {}, Pad: {}, TVer: {}, PKey: {}, FECN: {}, \
             BECN: {}, DestQP: {}, A: {}, PSN: {}\n",
            self.opcode,
            self.se,
            self.m,
            self.pad,
            self.tver,
            self.pkey,
            self.fecn,
            self.becn,
            self.dest_qp,
            self.ack,
            self.psn
        )
    }
}
