// src/core/engine.rs

//! The protocol engine: one task per connection that owns the reassembler,
//! the request pipeline and the idle coordinator, plus the cloneable
//! `MpdClient` handle callers use to reach it.
//!
//! All pipeline state is confined to the engine task. Callers talk to it over
//! an mpsc channel and wait for their reply on a oneshot, so concurrent callers
//! never block each other and are served in submission order.

use crate::config::ClientConfig;
use crate::connection::{StreamTransport, Transport, TransportEvent};
use crate::core::errors::MpdError;
use crate::core::idle::{ClientEvent, IdleCoordinator, Subsystem};
use crate::core::pipeline::{Reply, Request, RequestPipeline};
use crate::core::protocol::{LineReassembler, ProtocolVersion, ResponseLine};
use futures::{Stream, StreamExt};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, info, warn};

/// Where the connection stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    AwaitingGreeting,
    Ready,
}

/// Snapshot of the connection published to every handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    /// Captured once from the greeting.
    pub version: Option<ProtocolVersion>,
    /// Why the connection ended, once it has.
    pub error: Option<MpdError>,
    /// True while the `idle` long-poll is the only request on the wire.
    pub idle: bool,
}

/// Tunables for a single engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub event_capacity: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { event_capacity: 64 }
    }
}

impl From<&ClientConfig> for EngineOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            event_capacity: config.event_capacity,
        }
    }
}

#[derive(Debug)]
enum EngineMessage {
    /// Requests queued together are guaranteed to share one flush if the pipeline is free.
    Enqueue(Vec<Request>),
    Disconnect(oneshot::Sender<()>),
}

/// A handle to one logical connection. Cloning it shares the connection;
/// dropping every clone disconnects.
#[derive(Debug, Clone)]
pub struct MpdClient {
    sender: mpsc::UnboundedSender<EngineMessage>,
    events: broadcast::Sender<ClientEvent>,
    status: watch::Receiver<ConnectionStatus>,
}

impl MpdClient {
    /// Starts the engine over `transport`. Commands may be sent immediately;
    /// they are held until the greeting arrives.
    pub async fn connect<T: Transport>(
        mut transport: T,
        options: EngineOptions,
    ) -> Result<Self, MpdError> {
        let (transport_tx, transport_rx) = mpsc::unbounded_channel();
        transport.connect(transport_tx).await?;

        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let (status_tx, status_rx) = watch::channel(ConnectionStatus {
            state: ConnectionState::AwaitingGreeting,
            version: None,
            error: None,
            idle: false,
        });
        let (sender, messages) = mpsc::unbounded_channel();

        let engine = ProtocolEngine {
            transport: Box::new(transport),
            transport_events: transport_rx,
            messages,
            reassembler: LineReassembler::new(),
            pipeline: RequestPipeline::new(IdleCoordinator::new(events.clone())),
            state: ConnectionState::AwaitingGreeting,
            version: None,
            status: status_tx,
        };
        tokio::spawn(engine.run());

        Ok(Self {
            sender,
            events,
            status: status_rx,
        })
    }

    /// Opens the configured endpoint and starts the engine on it.
    pub async fn connect_with_config(config: &ClientConfig) -> Result<Self, MpdError> {
        let stream = config.endpoint.open(config.connect_timeout).await?;
        Self::connect(StreamTransport::new(stream), EngineOptions::from(config)).await
    }

    /// Sends one command and resolves with the data lines of its response block.
    pub async fn send_command(&self, command: impl Into<String>) -> Result<Vec<String>, MpdError> {
        let (request, reply) = Request::new(command);
        self.sender
            .send(EngineMessage::Enqueue(vec![request]))
            .map_err(|_| MpdError::NotConnected)?;
        reply.await.map_err(|_| MpdError::Disconnected)?
    }

    /// Queues several commands at once and waits for all of them. If the
    /// pipeline is free they go out as a single command list.
    pub async fn send_commands<I, S>(&self, commands: I) -> Result<Vec<Reply>, MpdError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (requests, replies): (Vec<_>, Vec<_>) = commands.into_iter().map(Request::new).unzip();
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        self.sender
            .send(EngineMessage::Enqueue(requests))
            .map_err(|_| MpdError::NotConnected)?;

        let results = futures::future::join_all(replies).await;
        Ok(results
            .into_iter()
            .map(|r| r.unwrap_or(Err(MpdError::Disconnected)))
            .collect())
    }

    /// Tears the connection down. Every queued and running request is rejected
    /// with `MpdError::Disconnected`.
    pub async fn disconnect(&self) -> Result<(), MpdError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.sender
            .send(EngineMessage::Disconnect(done_tx))
            .map_err(|_| MpdError::NotConnected)?;
        let _ = done_rx.await;
        Ok(())
    }

    /// Waits until the greeting has been accepted and returns the daemon's version.
    pub async fn wait_ready(&self) -> Result<ProtocolVersion, MpdError> {
        let mut status = self.status.clone();
        let current = status
            .wait_for(|s| s.state != ConnectionState::AwaitingGreeting)
            .await
            .map_err(|_| MpdError::Disconnected)?
            .clone();
        match (current.state, current.version) {
            (ConnectionState::Ready, Some(version)) => Ok(version),
            _ => Err(current.error.unwrap_or(MpdError::Disconnected)),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.status.borrow().state
    }

    pub fn version(&self) -> Option<ProtocolVersion> {
        self.status.borrow().version
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ConnectionState::Disconnected
    }

    /// True while the connection sits in the `idle` long-poll with nothing else outstanding.
    pub fn is_idle(&self) -> bool {
        self.status.borrow().idle
    }

    /// The latest published connection snapshot.
    pub fn status_snapshot(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Subscribes to every client event.
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// A stream of changed-subsystem lists, one item per completed idle.
    pub fn changes(&self) -> impl Stream<Item = Vec<Subsystem>> + use<> {
        BroadcastStream::new(self.events.subscribe()).filter_map(|item| async move {
            match item {
                Ok(ClientEvent::Changed(subsystems)) => Some(subsystems),
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(missed)) => {
                    warn!("Change subscriber lagged, {} event(s) dropped.", missed);
                    None
                }
            }
        })
    }
}

/// The task that owns all per-connection protocol state.
struct ProtocolEngine {
    transport: Box<dyn Transport>,
    transport_events: mpsc::UnboundedReceiver<TransportEvent>,
    messages: mpsc::UnboundedReceiver<EngineMessage>,
    reassembler: LineReassembler,
    pipeline: RequestPipeline,
    state: ConnectionState,
    version: Option<ProtocolVersion>,
    status: watch::Sender<ConnectionStatus>,
}

impl ProtocolEngine {
    async fn run(mut self) {
        debug!("Protocol engine started.");
        let reason = loop {
            tokio::select! {
                event = self.transport_events.recv() => match event {
                    Some(TransportEvent::Data(chunk)) => {
                        if let Err(e) = self.on_chunk(&chunk).await {
                            break e;
                        }
                    }
                    Some(TransportEvent::Control { name, arg }) => {
                        debug!("Transport control event '{}'", name);
                        self.pipeline.idle().publish(ClientEvent::Transport { name, arg });
                    }
                    Some(TransportEvent::Closed(reason)) => {
                        match reason {
                            Some(r) => warn!("Connection closed: {}", r),
                            None => info!("Connection closed by daemon."),
                        }
                        break MpdError::Disconnected;
                    }
                    None => break MpdError::Disconnected,
                },
                message = self.messages.recv() => match message {
                    Some(EngineMessage::Enqueue(requests)) => {
                        if let Err(e) = self.on_enqueue(requests).await {
                            break e;
                        }
                    }
                    Some(EngineMessage::Disconnect(done)) => {
                        info!("Disconnecting on request.");
                        self.shutdown(MpdError::Disconnected).await;
                        let _ = done.send(());
                        return;
                    }
                    None => {
                        debug!("All client handles dropped.");
                        break MpdError::Disconnected;
                    }
                },
            }
        };
        self.shutdown(reason).await;
    }

    async fn on_enqueue(&mut self, requests: Vec<Request>) -> Result<(), MpdError> {
        let mut cancel = None;
        for request in requests {
            if let Some(text) = self.pipeline.enqueue(request) {
                cancel = Some(text);
            }
        }
        if let Some(text) = cancel {
            self.transmit(&text).await?;
        }
        self.flush().await
    }

    async fn on_chunk(&mut self, chunk: &str) -> Result<(), MpdError> {
        for line in self.reassembler.push(chunk) {
            match self.state {
                ConnectionState::AwaitingGreeting => self.on_greeting(&line)?,
                ConnectionState::Ready => self.pipeline.handle_line(ResponseLine::classify(line)),
                ConnectionState::Disconnected => {}
            }
        }
        self.flush().await
    }

    fn on_greeting(&mut self, line: &str) -> Result<(), MpdError> {
        let version = ProtocolVersion::from_greeting(line)?;
        info!("Connected to MPD {}", version);
        self.version = Some(version);
        self.state = ConnectionState::Ready;
        self.status.send_replace(ConnectionStatus {
            state: ConnectionState::Ready,
            version: Some(version),
            error: None,
            idle: false,
        });
        self.pipeline.idle().publish(ClientEvent::Ready(version));
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), MpdError> {
        if self.state != ConnectionState::Ready {
            return Ok(());
        }
        if let Some(text) = self.pipeline.poll_flush() {
            self.transmit(&text).await?;
        }
        self.publish_idle();
        Ok(())
    }

    fn publish_idle(&self) {
        let idle = self.pipeline.is_idle();
        self.status.send_if_modified(|status| {
            if status.idle == idle {
                return false;
            }
            status.idle = idle;
            true
        });
    }

    async fn transmit(&mut self, text: &str) -> Result<(), MpdError> {
        debug!("Sending {:?}", text);
        self.transport.send(text).await
    }

    /// Rejects everything outstanding with `reason` and closes the transport.
    async fn shutdown(&mut self, reason: MpdError) {
        if reason != MpdError::Disconnected {
            warn!("Connection failed: {}", reason);
        }
        self.state = ConnectionState::Disconnected;
        self.status.send_replace(ConnectionStatus {
            state: ConnectionState::Disconnected,
            version: self.version,
            error: Some(reason.clone()),
            idle: false,
        });
        self.messages.close();
        self.pipeline.fail_all(reason.clone());
        // Requests that raced with the shutdown are rejected the same way.
        while let Ok(message) = self.messages.try_recv() {
            if let EngineMessage::Enqueue(requests) = message {
                for request in requests {
                    self.pipeline.enqueue(request);
                }
                self.pipeline.fail_all(reason.clone());
            }
        }
        self.reassembler.reset();

        if let Err(e) = self.transport.disconnect().await {
            debug!("Error while closing transport: {}", e);
        }
        self.pipeline.idle().publish(ClientEvent::Disconnected);
    }
}
