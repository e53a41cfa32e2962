//! Hex dump formatting in the classic offset / hex / ASCII layout.

use std::fmt::Write;

/// Format buf as a hex dump, 16 bytes per line: an 8-digit offset, the
/// bytes in two groups of eight, and a printable-ASCII gutter. Bytes
/// outside 0x20..0x7e render as '.'.
pub fn hex_dump(buf: &[u8]) -> String {
    let mut out = String::with_capacity(buf.len() * 4);
    for (line, chunk) in buf.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", line * 16);
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => {
                    let _ = write!(out, "{:02x} ", b);
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push(' ');
        out.push('|');
        for &b in chunk {
            out.push(if (0x20..0x7f).contains(&b) { b as char } else { '.' });
        }
        out.push_str("|\n");
    }
    out
}
