//! SMC experimental TCP option detection.
//!
//! Peers announce SMC capability with a TCP experimental option carrying
//! the SMC-R eyecatcher on the SYN packets of the seed connection.

use super::eyecatcher::SMC_R_EYECATCHER;

/// TCP option kind for shared experimental options.
const OPTION_EXPERIMENTAL: u8 = 254;

/// On-wire length of the SMC experimental option.
const OPTION_LEN: usize = 6;

/// Scan a raw TCP options block for the SMC experimental option:
/// kind 254, length 6, payload equal to the SMC-R eyecatcher.
pub fn smc_option(options: &[u8]) -> bool {
    let mut i = 0;
    while i < options.len() {
        match options[i] {
            // end of option list
            0 => return false,
            // no-op padding
            1 => i += 1,
            kind => {
                if i + 1 >= options.len() {
                    return false;
                }
                let len = usize::from(options[i + 1]);
                if len < 2 || i + len > options.len() {
                    return false;
                }
                if kind == OPTION_EXPERIMENTAL
                    && len == OPTION_LEN
                    && options[i + 2..i + len] == SMC_R_EYECATCHER
                {
                    return true;
                }
                i += len;
            }
        }
    }
    false
}
