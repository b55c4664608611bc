// src/core/idle.rs

//! The idle coordinator: keeps a long-poll `idle` outstanding whenever the
//! pipeline has nothing else to do, cancels it with `noidle` when work arrives,
//! and turns its completion into change notifications.

use crate::core::parser::split_line;
use crate::core::protocol::ProtocolVersion;
use crate::core::protocol::command::{IDLE, NOIDLE};
use std::fmt;
use std::str::FromStr;
use strum_macros::EnumString;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::{debug, warn};

const CHANGED_KEY: &str = "changed";

/// A daemon subsystem reported by `idle`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Subsystem {
    Database,
    Update,
    StoredPlaylist,
    Playlist,
    Player,
    Mixer,
    Output,
    Options,
    Partition,
    Sticker,
    Subscription,
    Message,
    Neighbor,
    Mount,
    /// A subsystem newer than this client.
    #[strum(default)]
    Other(String),
}

impl Subsystem {
    pub fn as_str(&self) -> &str {
        match self {
            Subsystem::Database => "database",
            Subsystem::Update => "update",
            Subsystem::StoredPlaylist => "stored_playlist",
            Subsystem::Playlist => "playlist",
            Subsystem::Player => "player",
            Subsystem::Mixer => "mixer",
            Subsystem::Output => "output",
            Subsystem::Options => "options",
            Subsystem::Partition => "partition",
            Subsystem::Sticker => "sticker",
            Subsystem::Subscription => "subscription",
            Subsystem::Message => "message",
            Subsystem::Neighbor => "neighbor",
            Subsystem::Mount => "mount",
            Subsystem::Other(name) => name,
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the engine announces to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The greeting was accepted.
    Ready(ProtocolVersion),
    /// An `idle` completed; carries every reported subsystem (possibly none).
    Changed(Vec<Subsystem>),
    /// One per subsystem of the preceding `Changed`.
    SubsystemChanged(Subsystem),
    /// A control event forwarded from the transport.
    Transport { name: String, arg: Option<String> },
    Disconnected,
}

/// Where the long-poll currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    /// Real work (or nothing) is running.
    Active,
    /// The synthetic `idle` request is the only running request.
    Idling,
    /// `noidle` has been sent; waiting for the `idle` block to complete.
    Cancelling,
}

/// Tracks the idle long-poll and publishes change notifications.
#[derive(Debug)]
pub struct IdleCoordinator {
    state: IdleState,
    /// Set when the daemon rejected `idle`; re-armed after the next real exchange.
    suspended: bool,
    events: Sender<ClientEvent>,
}

impl IdleCoordinator {
    pub fn new(events: Sender<ClientEvent>) -> Self {
        Self {
            state: IdleState::Active,
            suspended: false,
            events,
        }
    }

    /// Creates a coordinator with its own event channel, returning a receiver for it.
    pub fn with_capacity(capacity: usize) -> (Self, Receiver<ClientEvent>) {
        let (tx, rx) = broadcast::channel(capacity);
        (Self::new(tx), rx)
    }

    pub fn state(&self) -> IdleState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == IdleState::Idling
    }

    /// True if an empty pipeline should issue `idle` now.
    pub fn can_arm(&self) -> bool {
        self.state == IdleState::Active && !self.suspended
    }

    /// Marks the long-poll as sent and returns its command text.
    pub fn arm(&mut self) -> &'static str {
        debug!("Pipeline empty, entering idle.");
        self.state = IdleState::Idling;
        IDLE
    }

    /// Called when a real request is queued. Returns `noidle` exactly once per
    /// idle period; further calls while cancelling return `None`.
    pub fn interrupt(&mut self) -> Option<&'static str> {
        if self.state != IdleState::Idling {
            return None;
        }
        debug!("Work queued while idling, cancelling idle.");
        self.state = IdleState::Cancelling;
        Some(NOIDLE)
    }

    /// Real requests were flushed.
    pub fn mark_active(&mut self) {
        self.state = IdleState::Active;
    }

    /// A real request completed; a previously rejected idle may be tried again.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Resolves the synthetic idle request with its response lines and publishes
    /// one `Changed` plus one `SubsystemChanged` per reported subsystem.
    pub fn complete(&mut self, lines: Vec<String>) -> Vec<Subsystem> {
        self.state = IdleState::Active;
        let subsystems: Vec<Subsystem> = lines
            .iter()
            .filter_map(|line| split_line(line))
            .filter(|(key, _)| *key == CHANGED_KEY)
            .map(|(_, name)| Subsystem::from_str(name).unwrap_or(Subsystem::Other(name.to_string())))
            .collect();

        debug!("Idle completed with changes: {:?}", subsystems);
        self.publish(ClientEvent::Changed(subsystems.clone()));
        for subsystem in &subsystems {
            self.publish(ClientEvent::SubsystemChanged(subsystem.clone()));
        }
        subsystems
    }

    /// The daemon refused `idle`. Suspends re-arming so the pipeline does not
    /// spin on a command it will keep rejecting.
    pub fn reject(&mut self, reason: &str) {
        warn!("Daemon rejected idle: {}", reason);
        self.state = IdleState::Active;
        self.suspended = true;
    }

    /// Forgets all idle state after the connection is torn down.
    pub fn reset(&mut self) {
        self.state = IdleState::Active;
        self.suspended = false;
    }

    /// Sends an event to subscribers. Having no subscribers is not an error.
    pub fn publish(&self, event: ClientEvent) {
        if self.events.send(event).is_err() {
            debug!("Published a client event with no active subscribers.");
        }
    }

    pub fn subscribe(&self) -> Receiver<ClientEvent> {
        self.events.subscribe()
    }
}
