// src/core/errors.rs

//! Defines the primary error type for the client engine.

use std::sync::Arc;
use thiserror::Error;

/// A failure reported by the daemon through an `ACK` terminator line.
///
/// The grammar is `ACK [<code>@<index>] {<command>} <message>`, where `index`
/// is the position of the failing command inside a command list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckError {
    pub code: u32,
    pub index: usize,
    pub command: String,
    pub message: String,
}

/// The main error enum, representing every failure a caller of the engine can observe.
#[derive(Error, Debug)]
pub enum MpdError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// The connection was torn down while the request was queued or running.
    #[error("Disconnected")]
    Disconnected,

    #[error("Client isn't connected")]
    NotConnected,

    #[error("Client is already connected")]
    AlreadyConnected,

    /// The first line from the daemon did not match `OK MPD <major>.<minor>.<patch>`.
    #[error("Received unexpected initial message from mpd: '{0}'")]
    InvalidGreeting(String),

    /// A protocol-level command failure, scoped to exactly one request.
    #[error("ACK [{}@{}] {{{}}} {}", .0.code, .0.index, .0.command, .0.message)]
    Command(AckError),

    /// The daemon sent something that does not fit the line grammar.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timed out")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MpdError {
    /// The daemon's numeric error code, if this is a command failure.
    pub fn error_code(&self) -> Option<u32> {
        match self {
            MpdError::Command(ack) => Some(ack.code),
            _ => None,
        }
    }

    /// The daemon's human readable message, if this is a command failure.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            MpdError::Command(ack) => Some(&ack.message),
            _ => None,
        }
    }

    /// True for failures that end the connection (as opposed to a single rejected command).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MpdError::Io(_)
                | MpdError::Disconnected
                | MpdError::NotConnected
                | MpdError::InvalidGreeting(_)
        )
    }
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
// One transport failure rejects every outstanding request, so errors are shared.
impl Clone for MpdError {
    fn clone(&self) -> Self {
        match self {
            MpdError::Io(e) => MpdError::Io(Arc::clone(e)),
            MpdError::Disconnected => MpdError::Disconnected,
            MpdError::NotConnected => MpdError::NotConnected,
            MpdError::AlreadyConnected => MpdError::AlreadyConnected,
            MpdError::InvalidGreeting(s) => MpdError::InvalidGreeting(s.clone()),
            MpdError::Command(ack) => MpdError::Command(ack.clone()),
            MpdError::Protocol(s) => MpdError::Protocol(s.clone()),
            MpdError::Timeout => MpdError::Timeout,
            MpdError::Internal(s) => MpdError::Internal(s.clone()),
        }
    }
}

impl PartialEq for MpdError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MpdError::Io(e1), MpdError::Io(e2)) => e1.to_string() == e2.to_string(),
            (MpdError::InvalidGreeting(s1), MpdError::InvalidGreeting(s2)) => s1 == s2,
            (MpdError::Command(a1), MpdError::Command(a2)) => a1 == a2,
            (MpdError::Protocol(s1), MpdError::Protocol(s2)) => s1 == s2,
            (MpdError::Internal(s1), MpdError::Internal(s2)) => s1 == s2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for MpdError {
    fn from(e: std::io::Error) -> Self {
        MpdError::Io(Arc::new(e))
    }
}

impl From<AckError> for MpdError {
    fn from(ack: AckError) -> Self {
        MpdError::Command(ack)
    }
}

impl From<tokio::time::error::Elapsed> for MpdError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        MpdError::Timeout
    }
}
