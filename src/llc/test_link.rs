//! LLC Test Link message (type 7).

use std::fmt;

use super::{BaseMsg, LLC_MSG_LEN};

/// LLC Test Link message, a keepalive probe echoing 16 bytes of user
/// data.
#[derive(Clone, Debug)]
pub struct TestLink {
    pub base: BaseMsg,
    reserved: u8,
    pub reply: bool,
    reserved2: u8,
    pub user_data: [u8; 16],
    reserved3: [u8; 24],
}

impl TestLink {
    /// Parse a test link message.
    pub fn parse(buf: &[u8; LLC_MSG_LEN]) -> Self {
        let base = BaseMsg::parse(buf);

        let reserved = buf[2];

        // reply is the first bit, the rest of the byte is reserved
        let reply = buf[3] & 0b1000_0000 > 0;
        let reserved2 = buf[3] & 0b0111_1111;

        let mut user_data = [0u8; 16];
        user_data.copy_from_slice(&buf[4..20]);

        let mut reserved3 = [0u8; 24];
        reserved3.copy_from_slice(&buf[20..44]);

        TestLink {
            base,
            reserved,
            reply,
            reserved2,
            user_data,
            reserved3,
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        format!(
            "LLC Test Link: Type {}, Length: {}, Reserved: {:#x}, Reply: {}, \
             Reserved: {:#x}, User Data: 0x{}, Reserved: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reserved,
            self.reply,
            self.reserved2,
            hex::encode(self.user_data),
            hex::encode(self.reserved3)
        )
    }
}

impl fmt::Display for TestLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLC Test Link: Type {}, Length: {}, Reply: {}, User Data: 0x{}\n",
            self.base.msg_type,
            self.base.length,
            self.reply,
            hex::encode(self.user_data)
        )
    }
}
