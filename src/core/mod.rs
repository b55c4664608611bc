// src/core/mod.rs

//! The protocol core: wire framing, the request pipeline, idle handling,
//! response parsing and the engine tying them together.

pub mod commands;
pub mod engine;
pub mod errors;
pub mod idle;
pub mod objects;
pub mod parser;
pub mod pipeline;
pub mod protocol;

pub use engine::{ConnectionState, ConnectionStatus, EngineOptions, MpdClient};
pub use errors::{AckError, MpdError};
pub use idle::{ClientEvent, Subsystem};
