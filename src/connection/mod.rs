// src/connection/mod.rs

//! Physical connections to the daemon: endpoints, byte streams, and the
//! `Transport` seam the protocol engine talks through.

pub mod codec;
pub mod stream;
pub mod transport;

pub use codec::Utf8ChunkCodec;
pub use stream::{AnyStream, Endpoint};
pub use transport::{StreamTransport, Transport, TransportEvent};
