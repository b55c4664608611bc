// src/connection/stream.rs

use crate::core::MpdError;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tracing::info;

/// Where the daemon listens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Endpoint {
    Tcp { host: String, port: u16 },
    Unix { path: String },
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::Tcp {
            host: "localhost".to_string(),
            port: 6600,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Tcp { host, port } => write!(f, "{host}:{port}"),
            Endpoint::Unix { path } => write!(f, "unix:{path}"),
        }
    }
}

impl Endpoint {
    /// Opens a byte stream to the endpoint, giving up after `timeout`.
    pub async fn open(&self, timeout: Duration) -> Result<AnyStream, MpdError> {
        info!("Connecting to {}", self);
        let stream = match self {
            Endpoint::Tcp { host, port } => {
                let tcp =
                    tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), *port)))
                        .await??;
                tcp.set_nodelay(true)?;
                AnyStream::Tcp(tcp)
            }
            #[cfg(unix)]
            Endpoint::Unix { path } => {
                AnyStream::Unix(tokio::time::timeout(timeout, UnixStream::connect(path)).await??)
            }
            #[cfg(not(unix))]
            Endpoint::Unix { .. } => {
                return Err(MpdError::Io(std::sync::Arc::new(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "unix sockets are not available on this platform",
                ))));
            }
        };
        Ok(stream)
    }
}

/// An enum to wrap different stream types (TCP or Unix socket) into a single type.
pub enum AnyStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl AsyncRead for AnyStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            AnyStream::Tcp(s) => Pin::new(s).poll_read(cx, buf),
            #[cfg(unix)]
            AnyStream::Unix(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for AnyStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, std::io::Error>> {
        match self.get_mut() {
            AnyStream::Tcp(s) => Pin::new(s).poll_write(cx, buf),
            #[cfg(unix)]
            AnyStream::Unix(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), std::io::Error>> {
        match self.get_mut() {
            AnyStream::Tcp(s) => Pin::new(s).poll_flush(cx),
            #[cfg(unix)]
            AnyStream::Unix(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<(), std::io::Error>> {
        match self.get_mut() {
            AnyStream::Tcp(s) => Pin::new(s).poll_shutdown(cx),
            #[cfg(unix)]
            AnyStream::Unix(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}
