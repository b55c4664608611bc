// src/connection/transport.rs

//! The transport seam between the protocol engine and a physical connection.

use super::codec::Utf8ChunkCodec;
use crate::core::MpdError;
use async_trait::async_trait;
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, WriteHalf, split};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tracing::{debug, warn};

/// Name of the control event a `StreamTransport` emits once its reader is running.
pub const CONNECTED_EVENT: &str = "connected";

/// What a transport reports to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Received text. Chunk boundaries carry no meaning.
    Data(String),
    /// An out-of-band notification (e.g. from a relay), forwarded to subscribers.
    Control { name: String, arg: Option<String> },
    /// The peer went away. Carries the reason if it was an error.
    Closed(Option<String>),
}

/// A connection to the daemon that moves text in both directions.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Starts delivering inbound events to `events`.
    async fn connect(&mut self, events: UnboundedSender<TransportEvent>) -> Result<(), MpdError>;

    /// Writes outbound text verbatim.
    async fn send(&mut self, text: &str) -> Result<(), MpdError>;

    /// Closes the connection. Further inbound events are not delivered.
    async fn disconnect(&mut self) -> Result<(), MpdError>;
}

/// A `Transport` over any already-open byte stream (TCP, Unix socket, in-memory duplex).
pub struct StreamTransport<S> {
    stream: Option<S>,
    writer: Option<WriteHalf<S>>,
    reader_task: Option<JoinHandle<()>>,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
            writer: None,
            reader_task: None,
        }
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    async fn connect(&mut self, events: UnboundedSender<TransportEvent>) -> Result<(), MpdError> {
        let stream = self.stream.take().ok_or(MpdError::AlreadyConnected)?;
        let (read_half, write_half) = split(stream);
        self.writer = Some(write_half);

        let _ = events.send(TransportEvent::Control {
            name: CONNECTED_EVENT.to_string(),
            arg: None,
        });

        self.reader_task = Some(tokio::spawn(async move {
            let mut frames = FramedRead::new(read_half, Utf8ChunkCodec);
            let reason = loop {
                match frames.next().await {
                    Some(Ok(chunk)) => {
                        if events.send(TransportEvent::Data(chunk)).is_err() {
                            debug!("Engine went away, stopping transport reader.");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Transport read failed: {}", e);
                        break Some(e.to_string());
                    }
                    None => {
                        debug!("Transport reached end of stream.");
                        break None;
                    }
                }
            };
            let _ = events.send(TransportEvent::Closed(reason));
        }));
        Ok(())
    }

    async fn send(&mut self, text: &str) -> Result<(), MpdError> {
        let writer = self.writer.as_mut().ok_or(MpdError::NotConnected)?;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), MpdError> {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
        self.stream = None;
        if let Some(mut writer) = self.writer.take() {
            writer.shutdown().await?;
        }
        Ok(())
    }
}

impl<S> Drop for StreamTransport<S> {
    fn drop(&mut self) {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
    }
}
