//! SMC wire format decoding and pretty-printing.
//!
//! Parsers and formatters for the Shared Memory Communications (SMC)
//! protocol family: the CLC handshake carried on the seed TCP connection,
//! the 44-byte LLC/CDC link-control messages exchanged over RDMA, and the
//! RoCE Base Transport Header. The decoders are pure functions over byte
//! slices; malformed input is logged and rendered best-effort, never
//! panicked on.
//!
//! The `socket` module opens kernel AF_SMC sockets for tools that want to
//! speak SMC themselves (see the `smcecho` sample binary), and the `http`
//! module serves collected decoder output over a single HTTP route.

pub mod clc;
pub mod http;
pub mod llc;
pub mod roce;
pub mod socket;
pub mod util;

// Re-export the decoder entry points
pub use clc::{recognize, Message, MessageKind};
pub use llc::{parse_llc, LlcMessage};
pub use roce::Bth;
