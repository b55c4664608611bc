// src/core/protocol/command.rs

//! Formats outbound command text: single command lines, quoted arguments and
//! the command-list envelope used for batching.

use std::fmt;

pub const IDLE: &str = "idle";
pub const NOIDLE: &str = "noidle";
pub const COMMAND_LIST_OK_BEGIN: &str = "command_list_ok_begin";
pub const COMMAND_LIST_END: &str = "command_list_end";

/// A single command: a verb followed by arguments, rendered on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    verb: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(verb: impl Into<String>) -> Self {
        Self {
            verb: verb.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument. It is quoted on output if it needs to be.
    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Appends an argument only if one is given.
    pub fn opt_arg<T: ToString>(self, arg: Option<T>) -> Self {
        match arg {
            Some(a) => self.arg(a),
            None => self,
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verb)?;
        for arg in &self.args {
            write!(f, " {}", quote_arg(arg))?;
        }
        Ok(())
    }
}

impl From<CommandLine> for String {
    fn from(cmd: CommandLine) -> Self {
        cmd.to_string()
    }
}

/// Double-quotes an argument containing whitespace, quotes or backslashes.
pub fn quote_arg(arg: &str) -> String {
    let needs_quotes =
        arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\');
    if !needs_quotes {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Renders the wire text for one flush: the bare command for a single request,
/// or the command-list envelope around several.
pub fn encode_flush<'a, I>(commands: I) -> String
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: ExactSizeIterator,
{
    let commands = commands.into_iter();
    if commands.len() == 1 {
        let mut out = String::new();
        for cmd in commands {
            out.push_str(cmd);
            out.push('\n');
        }
        return out;
    }

    let mut out = String::from(COMMAND_LIST_OK_BEGIN);
    out.push('\n');
    for cmd in commands {
        out.push_str(cmd);
        out.push('\n');
    }
    out.push_str(COMMAND_LIST_END);
    out.push('\n');
    out
}
