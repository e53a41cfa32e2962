//! Fallback for payloads that are not LLC messages.

use std::fmt;

use super::BaseMsg;

/// Non-LLC payload: anything that is not 44 bytes long or carries an
/// unknown type byte. The raw bytes stay available for dumping.
#[derive(Clone, Debug, Default)]
pub struct Other {
    pub base: BaseMsg,
}

impl Other {
    /// Capture an unknown payload.
    pub fn parse(buf: &[u8]) -> Self {
        Other {
            base: BaseMsg::other(buf),
        }
    }

    /// Values rendering including reserved fields.
    pub fn reserved(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Other {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Other Payload\n")
    }
}
