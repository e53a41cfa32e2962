//! CDC message (type 0xfe): Connection Data Control, the in-band flow
//! control carrying the producer/consumer ring cursors and connection
//! state flags.

use std::fmt;

use super::{BaseMsg, LLC_MSG_LEN};

/// CDC message.
#[derive(Clone, Debug)]
pub struct Cdc {
    pub base: BaseMsg,
    pub seq_num: u16,
    pub alert_token: u32,
    reserved: [u8; 2],
    pub prod_wrap: u16,
    pub prod_cursor: u32,
    reserved2: [u8; 2],
    pub cons_wrap: u16,
    pub cons_cursor: u32,
    /// Writer blocked indicator.
    pub b: bool,
    /// Urgent data pending.
    pub p: bool,
    /// Urgent data present.
    pub u: bool,
    /// Request for consumer cursor update.
    pub r: bool,
    /// Failover validation indicator.
    pub f: bool,
    reserved3: u8,
    /// Sending done indicator.
    pub d: bool,
    /// Peer connection closed indicator.
    pub c: bool,
    /// Abnormal close indicator.
    pub a: bool,
    reserved4: [u8; 19],
}

impl Cdc {
    /// Parse a CDC message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let seq_num = u16::from_be_bytes([buf[2], buf[3]]);
        let alert_token = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);

        let mut reserved = [0u8; 2];
        reserved.copy_from_slice(&buf[8..10]);

        let prod_wrap = u16::from_be_bytes([buf[10], buf[11]]);
        let prod_cursor = u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]);

        let mut reserved2 = [0u8; 2];
        reserved2.copy_from_slice(&buf[16..18]);

        let cons_wrap = u16::from_be_bytes([buf[18], buf[19]]);
        let cons_cursor = u32::from_be_bytes([buf[20], buf[21], buf[22], buf[23]]);

        // first flag byte: B, P, U, R, F, then reserved bits
        let b = buf[24] & 0b1000_0000 > 0;
        let p = buf[24] & 0b0100_0000 > 0;
        let u = buf[24] & 0b0010_0000 > 0;
        let r = buf[24] & 0b0001_0000 > 0;
        let f = buf[24] & 0b0000_1000 > 0;
        let reserved3 = buf[24] & 0b0000_0111;

        // second flag byte: D, C, A, then reserved bits
        let d = buf[25] & 0b1000_0000 > 0;
        let c = buf[25] & 0b0100_0000 > 0;
        let a = buf[25] & 0b0010_0000 > 0;

        let mut reserved4 = [0u8; 19];
        reserved4[0] = buf[25] & 0b0001_1111;
        reserved4[1..].copy_from_slice(&buf[26..44]);

        Cdc {
            base,
            seq_num,
            alert_token,
            reserved,
            prod_wrap,
            prod_cursor,
            reserved2,
            cons_wrap,
            cons_cursor,
            b,
            p,
            u,
            r,
            f,
            reserved3,
            d,
            c,
            a,
            reserved4,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "CDC: Type: {}, Length {}, Sequence Number: {}, Alert Token: {}, \
             Reserved: 0x{}, Producer Wrap: {}, Producer Cursor: {}, \
             Reserved: 0x{}, Consumer Wrap: {}, Consumer Cursor: {}, \
             Writer Blocked: {}, Urgent Data Pending: {}, Urgent Data Present: {}, \
             Request for Consumer Cursor Update: {}, Failover Validation: {}, \
             Reserved: {:#x}, Sending Done: {}, Peer Connection Closed: {}, \
             Abnormal Close: {}, Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.seq_num,
            self.alert_token,
            hex::encode(self.reserved),
            self.prod_wrap,
            self.prod_cursor,
            hex::encode(self.reserved2),
            self.cons_wrap,
            self.cons_cursor,
            self.b,
            self.p,
            self.u,
            self.r,
            self.f,
            self.reserved3,
            self.d,
            self.c,
            self.a,
            hex::encode(self.reserved4)
        )
    }
}

impl fmt::Display for Cdc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CDC: Type: {}, Length {}, Sequence Number: {}, Alert Token: {}, \
             Producer Wrap: {}, Producer Cursor: {}, Consumer Wrap: {}, \
             Consumer Cursor: {}, Writer Blocked: {}, Urgent Data Pending: {}, \
             Urgent Data Present: {}, Request for Consumer Cursor Update: {}, \
             Failover Validation: {}, Sending Done: {}, Peer Connection Closed: {}, \
             Abnormal Close: {}\n",
            self.base.msg_type,
            self.base.length,
            self.seq_num,
            self.alert_token,
            self.prod_wrap,
            self.prod_cursor,
            self.cons_wrap,
            self.cons_cursor,
            self.b,
            self.p,
            self.u,
            self.r,
            self.f,
            self.d,
            self.c,
            self.a
        )
    }
}
