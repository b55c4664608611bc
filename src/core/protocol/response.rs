// src/core/protocol/response.rs

//! Classifies completed response lines and parses the two fixed-grammar lines
//! of the protocol: the `ACK` error terminator and the connection greeting.

use crate::core::errors::{AckError, MpdError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Plain success terminator, also the final line of a command list.
pub const OK: &str = "OK";
/// Per-command success terminator inside a `command_list_ok_begin` list.
pub const LIST_OK: &str = "list_OK";
const ACK_PREFIX: &str = "ACK [";

static ACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ACK \[([0-9]+)@([0-9]+)\] \{([^}]*)\} ?(.*)$").unwrap());
static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^OK MPD ([0-9]+)\.([0-9]+)\.([0-9]+)").unwrap());

/// One completed line of a response block.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseLine {
    /// A `key: value` payload line (or anything else that is not a terminator).
    Data(String),
    /// `OK`
    Ok,
    /// `list_OK`
    ListOk,
    /// An `ACK [...]` line. Carries the parse result so a garbled ACK still
    /// terminates its block.
    Ack(Result<AckError, String>),
}

impl ResponseLine {
    pub fn classify(line: String) -> Self {
        if line == OK {
            ResponseLine::Ok
        } else if line == LIST_OK {
            ResponseLine::ListOk
        } else if line.starts_with(ACK_PREFIX) {
            ResponseLine::Ack(parse_ack(&line).ok_or(line))
        } else {
            ResponseLine::Data(line)
        }
    }

    pub fn is_terminator(&self) -> bool {
        !matches!(self, ResponseLine::Data(_))
    }
}

/// Parses `ACK [<code>@<index>] {<command>} <message>`.
pub fn parse_ack(line: &str) -> Option<AckError> {
    let caps = ACK_RE.captures(line)?;
    Some(AckError {
        code: caps[1].parse().ok()?,
        index: caps[2].parse().ok()?,
        command: caps[3].to_string(),
        message: caps[4].to_string(),
    })
}

/// The daemon's protocol version, captured once from the greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ProtocolVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses the greeting line `OK MPD <major>.<minor>.<patch>...`.
    pub fn from_greeting(line: &str) -> Result<Self, MpdError> {
        let invalid = || MpdError::InvalidGreeting(line.to_string());
        let caps = GREETING_RE.captures(line).ok_or_else(invalid)?;
        let part = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid());
        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }

    /// True if the daemon speaks at least the given protocol version.
    pub fn at_least(&self, major: u32, minor: u32, patch: u32) -> bool {
        *self >= Self::new(major, minor, patch)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
