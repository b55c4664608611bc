// src/core/commands/status.rs

use super::{expect_ok, single_record};
use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::objects::{PlaylistItem, SONG_MARKERS, Statistics, Status};
use crate::core::parser::parse;
use crate::core::protocol::CommandLine;

pub struct StatusCommands<'a> {
    pub(super) client: &'a MpdClient,
}

impl StatusCommands<'_> {
    /// The song the player is on, or `None` with an empty queue.
    pub async fn current_song(&self) -> Result<Option<PlaylistItem>, MpdError> {
        let lines = self.client.send_command(CommandLine::new("currentsong")).await?;
        Ok(parse(lines, SONG_MARKERS, PlaylistItem::from_value_map).next())
    }

    pub async fn status(&self) -> Result<Status, MpdError> {
        let lines = self.client.send_command(CommandLine::new("status")).await?;
        Ok(Status::from_value_map(&single_record(lines)))
    }

    pub async fn statistics(&self) -> Result<Statistics, MpdError> {
        let lines = self.client.send_command(CommandLine::new("stats")).await?;
        Ok(Statistics::from_value_map(&single_record(lines)))
    }

    /// Clears the error reported in `Status::error`.
    pub async fn clear_error(&self) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("clearerror")).await
    }
}
