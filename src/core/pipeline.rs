// src/core/pipeline.rs

//! The request pipeline: queues caller requests, flushes them as one command or
//! a command list, and matches completed response blocks to requests in
//! submission order.
//!
//! The pipeline performs no I/O. Every operation that needs bytes on the wire
//! returns the text to send, and the engine task writes it to the transport.

use crate::core::errors::MpdError;
use crate::core::idle::IdleCoordinator;
use crate::core::protocol::ResponseLine;
use crate::core::protocol::command::encode_flush;
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// The result delivered to a caller: the data lines of its response block.
pub type Reply = Result<Vec<String>, MpdError>;

/// Who gets told when a request resolves.
#[derive(Debug)]
enum Responder {
    Caller(oneshot::Sender<Reply>),
    /// The synthetic long-poll, resolved by the idle coordinator.
    Idle,
}

/// A command owned by the pipeline until its response block arrives.
#[derive(Debug)]
pub struct Request {
    command: String,
    responder: Responder,
}

impl Request {
    /// Creates a caller request and the receiver its reply will arrive on.
    pub fn new(command: impl Into<String>) -> (Self, oneshot::Receiver<Reply>) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            command: command.into(),
            responder: Responder::Caller(tx),
        };
        (request, rx)
    }

    fn idle(command: &str) -> Self {
        Self {
            command: command.to_string(),
            responder: Responder::Idle,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.responder, Responder::Idle)
    }
}

/// Queued and running requests plus the data lines of the block being received.
#[derive(Debug)]
pub struct RequestPipeline {
    /// Not yet sent. Insertion order is send order.
    queued: VecDeque<Request>,
    /// Sent and awaiting their blocks. The Nth completed block belongs to the Nth entry.
    running: VecDeque<Request>,
    /// Data lines of the block currently being received.
    received: Vec<String>,
    /// A command list was sent and its closing terminator has not arrived yet.
    list_open: bool,
    idle: IdleCoordinator,
}

impl RequestPipeline {
    pub fn new(idle: IdleCoordinator) -> Self {
        Self {
            queued: VecDeque::new(),
            running: VecDeque::new(),
            received: Vec::new(),
            list_open: false,
            idle,
        }
    }

    pub fn idle(&self) -> &IdleCoordinator {
        &self.idle
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    /// Commands of the queued requests, front first.
    pub fn queued_commands(&self) -> impl Iterator<Item = &str> {
        self.queued.iter().map(Request::command)
    }

    /// True only while the synthetic long-poll is the single running request.
    pub fn is_idle(&self) -> bool {
        self.running.len() == 1 && self.running.iter().all(Request::is_idle)
    }

    /// Appends a request. If the connection is idling, returns the `noidle`
    /// text that must be sent before the request can be flushed.
    pub fn enqueue(&mut self, request: Request) -> Option<String> {
        debug!("Queueing command '{}'", request.command);
        self.queued.push_back(request);
        self.idle.interrupt().map(|cmd| format!("{cmd}\n"))
    }

    /// Flush decision. With nothing running, moves the whole queue into the
    /// running list and returns its wire text; with an empty queue, arms the
    /// idle long-poll instead. Returns `None` while a flush is outstanding.
    pub fn poll_flush(&mut self) -> Option<String> {
        if !self.running.is_empty() || self.list_open {
            return None;
        }

        if self.queued.is_empty() {
            if !self.idle.can_arm() {
                return None;
            }
            let cmd = self.idle.arm();
            self.running.push_back(Request::idle(cmd));
            return Some(format!("{cmd}\n"));
        }

        self.running = std::mem::take(&mut self.queued);
        self.idle.mark_active();
        self.list_open = self.running.len() > 1;
        debug!("Flushing {} command(s)", self.running.len());
        Some(encode_flush(self.running.iter().map(Request::command)))
    }

    /// Feeds one classified response line.
    pub fn handle_line(&mut self, line: ResponseLine) {
        match line {
            ResponseLine::Data(data) => {
                if self.running.is_empty() {
                    warn!("Dropping response line with no running request: {}", data);
                } else {
                    self.received.push(data);
                }
            }
            ResponseLine::ListOk => {
                self.resolve_front();
            }
            ResponseLine::Ok => {
                // Closes a single command, the last command of a list, or the
                // list itself after every member saw `list_OK`.
                if !self.running.is_empty() {
                    self.resolve_front();
                } else if !self.list_open {
                    warn!("Received OK with no running request.");
                }
                self.list_open = false;
            }
            ResponseLine::Ack(parsed) => {
                let error = match parsed {
                    Ok(ack) => MpdError::Command(ack),
                    Err(raw) => MpdError::Protocol(format!("malformed error line '{raw}'")),
                };
                self.reject_front(error);
            }
        }
    }

    /// Rejects every queued and running request and clears all state.
    pub fn fail_all(&mut self, error: MpdError) {
        let pending = self.running.len() + self.queued.len();
        if pending > 0 {
            debug!("Failing {} outstanding request(s): {}", pending, error);
        }
        for request in self.running.drain(..).chain(self.queued.drain(..)) {
            if let Responder::Caller(tx) = request.responder {
                let _ = tx.send(Err(error.clone()));
            }
        }
        self.received.clear();
        self.list_open = false;
        self.idle.reset();
    }

    fn resolve_front(&mut self) {
        let lines = std::mem::take(&mut self.received);
        let Some(request) = self.running.pop_front() else {
            warn!("Received a terminator with no running request.");
            return;
        };
        debug!("Command '{}' completed with {} line(s)", request.command, lines.len());
        match request.responder {
            Responder::Caller(tx) => {
                self.idle.resume();
                // The caller may have stopped waiting; that is not our failure.
                let _ = tx.send(Ok(lines));
            }
            Responder::Idle => {
                self.idle.complete(lines);
            }
        }
    }

    /// A failed command ends its block and aborts the rest of its command
    /// list. The unexecuted remainder goes back to the front of the queue.
    fn reject_front(&mut self, error: MpdError) {
        self.received.clear();
        self.list_open = false;
        let Some(request) = self.running.pop_front() else {
            warn!("Received an error with no running request: {}", error);
            return;
        };
        debug!("Command '{}' failed: {}", request.command, error);
        match request.responder {
            Responder::Caller(tx) => {
                self.idle.resume();
                let _ = tx.send(Err(error));
            }
            Responder::Idle => self.idle.reject(&error.to_string()),
        }

        if !self.running.is_empty() {
            debug!("Requeueing {} unexecuted command(s)", self.running.len());
        }
        while let Some(unexecuted) = self.running.pop_back() {
            self.queued.push_front(unexecuted);
        }
    }
}
