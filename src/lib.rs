// src/lib.rs

pub mod config;
pub mod connection;
pub mod core;

// Re-export
pub use crate::config::ClientConfig;
pub use crate::connection::{Endpoint, StreamTransport, Transport, TransportEvent};
pub use crate::core::parser::{ValueMap, parse, parse_grouped};
pub use crate::core::protocol::ProtocolVersion;
pub use crate::core::{
    AckError, ClientEvent, ConnectionState, ConnectionStatus, EngineOptions, MpdClient, MpdError,
    Subsystem,
};
