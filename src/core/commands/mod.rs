// src/core/commands/mod.rs

//! Typed command groups layered over `MpdClient::send_command`.
//!
//! Each group borrows the client, renders its commands with `CommandLine`
//! and converts the returned lines with the record parser. None of them hold
//! state of their own.

use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::parser::{ValueMap, parse};

pub mod connection;
pub mod current_playlist;
pub mod database;
pub mod playback;
pub mod playback_options;
pub mod status;

pub use connection::ConnectionCommands;
pub use current_playlist::CurrentPlaylistCommands;
pub use database::{DatabaseCommands, Filter};
pub use playback::PlaybackCommands;
pub use playback_options::{PlaybackOptionsCommands, ReplayGainMode, Single};
pub use status::StatusCommands;

impl MpdClient {
    /// Player status, statistics and the current song.
    pub fn status(&self) -> StatusCommands<'_> {
        StatusCommands { client: self }
    }

    /// Playback control.
    pub fn playback(&self) -> PlaybackCommands<'_> {
        PlaybackCommands { client: self }
    }

    /// Volume, repeat/random/single/consume, crossfade and replay gain.
    pub fn playback_options(&self) -> PlaybackOptionsCommands<'_> {
        PlaybackOptionsCommands { client: self }
    }

    /// The play queue.
    pub fn current_playlist(&self) -> CurrentPlaylistCommands<'_> {
        CurrentPlaylistCommands { client: self }
    }

    /// Connection-level commands.
    pub fn connection(&self) -> ConnectionCommands<'_> {
        ConnectionCommands { client: self }
    }

    /// The music database.
    pub fn database(&self) -> DatabaseCommands<'_> {
        DatabaseCommands { client: self }
    }
}

/// Collapses a markerless response into one record. An empty response gives an empty map.
pub(crate) fn single_record(lines: Vec<String>) -> ValueMap {
    parse(lines, &[], |m| m).next().unwrap_or_default()
}

/// Sends a command whose response carries no payload.
pub(crate) async fn expect_ok(
    client: &MpdClient,
    command: impl Into<String>,
) -> Result<(), MpdError> {
    client.send_command(command).await.map(|_| ())
}
