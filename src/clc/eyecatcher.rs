//! Eyecatchers framing SMC CLC messages.

use std::fmt;

use tracing::warn;

use super::err_dump;

/// SMC-R eyecatcher bytes.
pub const SMC_R_EYECATCHER: [u8; 4] = [0xe2, 0xd4, 0xc3, 0xd9];
/// SMC-D eyecatcher bytes.
pub const SMC_D_EYECATCHER: [u8; 4] = [0xe2, 0xd4, 0xc3, 0xc4];

/// Length of an eyecatcher in bytes.
pub const EYECATCHER_LEN: usize = 4;

/// Length of the message trailer in bytes.
pub const TRAILER_LEN: usize = EYECATCHER_LEN;

/// 4-byte marker framing every CLC message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eyecatcher(pub [u8; EYECATCHER_LEN]);

impl Eyecatcher {
    /// Copy the first four bytes of buf; shorter input gives an all-zero
    /// (invalid) eyecatcher.
    pub fn from_slice(buf: &[u8]) -> Self {
        let mut e = [0u8; EYECATCHER_LEN];
        if buf.len() >= EYECATCHER_LEN {
            e.copy_from_slice(&buf[..EYECATCHER_LEN]);
        }
        Eyecatcher(e)
    }

    /// Whether this is one of the two known eyecatchers.
    pub fn is_valid(&self) -> bool {
        self.0 == SMC_R_EYECATCHER || self.0 == SMC_D_EYECATCHER
    }
}

impl fmt::Display for Eyecatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.0 == SMC_R_EYECATCHER {
            "SMC-R"
        } else if self.0 == SMC_D_EYECATCHER {
            "SMC-D"
        } else {
            "Unknown"
        };
        write!(f, "{}", name)
    }
}

/// Check if buf starts with a SMC-R or SMC-D eyecatcher.
pub fn has_eyecatcher(buf: &[u8]) -> bool {
    Eyecatcher::from_slice(buf).is_valid()
}

/// Trailing eyecatcher closing a CLC message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Trailer(pub Eyecatcher);

impl Trailer {
    /// Copy the trailer from the last four bytes of buf. An unknown
    /// trailer is logged but kept verbatim so it renders as invalid.
    pub fn parse(buf: &[u8]) -> Self {
        if buf.len() < TRAILER_LEN {
            return Trailer::default();
        }
        let trailer = Trailer(Eyecatcher::from_slice(&buf[buf.len() - TRAILER_LEN..]));
        if !trailer.0.is_valid() {
            warn!("error parsing CLC message: invalid trailer");
            err_dump(&buf[buf.len() - TRAILER_LEN..]);
        }
        trailer
    }
}

impl fmt::Display for Trailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
