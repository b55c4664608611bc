// src/core/protocol/mod.rs

//! Line-level pieces of the wire protocol: chunk reassembly, terminator
//! classification and outbound command formatting.

pub mod command;
pub mod reassembler;
pub mod response;

pub use command::{CommandLine, encode_flush, quote_arg};
pub use reassembler::LineReassembler;
pub use response::{ProtocolVersion, ResponseLine};
