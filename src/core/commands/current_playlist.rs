// src/core/commands/current_playlist.rs

//! The play queue: adding, removing, reordering and listing its songs.

use super::{expect_ok, single_record};
use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::objects::{PlaylistItem, SONG_MARKERS};
use crate::core::parser::parse;
use crate::core::protocol::CommandLine;
use std::ops::Range;

/// Queue positions `start..end` in the daemon's `START:END` form.
fn span(range: &Range<u32>) -> String {
    format!("{}:{}", range.start, range.end)
}

pub struct CurrentPlaylistCommands<'a> {
    pub(super) client: &'a MpdClient,
}

impl CurrentPlaylistCommands<'_> {
    /// Appends a song, or a whole directory recursively, to the queue.
    pub async fn add(&self, uri: &str) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("add").arg(uri)).await
    }

    /// Adds one song and returns its queue id. Without a position the song is appended.
    pub async fn add_id(&self, uri: &str, position: Option<u32>) -> Result<u32, MpdError> {
        let lines = self
            .client
            .send_command(CommandLine::new("addid").arg(uri).opt_arg(position))
            .await?;
        single_record(lines)
            .get_parsed("Id")
            .ok_or_else(|| MpdError::Protocol("addid response carries no song id".into()))
    }

    pub async fn clear(&self) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("clear")).await
    }

    pub async fn delete(&self, position: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("delete").arg(position)).await
    }

    pub async fn delete_range(&self, positions: Range<u32>) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("delete").arg(span(&positions))).await
    }

    pub async fn delete_id(&self, id: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("deleteid").arg(id)).await
    }

    /// Moves the song at `from` to position `to`.
    pub async fn move_song(&self, from: u32, to: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("move").arg(from).arg(to)).await
    }

    pub async fn move_range(&self, positions: Range<u32>, to: u32) -> Result<(), MpdError> {
        expect_ok(
            self.client,
            CommandLine::new("move").arg(span(&positions)).arg(to),
        )
        .await
    }

    pub async fn move_id(&self, id: u32, to: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("moveid").arg(id).arg(to)).await
    }

    /// The whole queue, or only the song at `position`.
    pub async fn playlist_info(&self, position: Option<u32>) -> Result<Vec<PlaylistItem>, MpdError> {
        let lines = self
            .client
            .send_command(CommandLine::new("playlistinfo").opt_arg(position))
            .await?;
        Ok(parse(lines, SONG_MARKERS, PlaylistItem::from_value_map).collect())
    }

    pub async fn playlist_id(&self, id: u32) -> Result<Option<PlaylistItem>, MpdError> {
        let lines = self
            .client
            .send_command(CommandLine::new("playlistid").arg(id))
            .await?;
        Ok(parse(lines, SONG_MARKERS, PlaylistItem::from_value_map).next())
    }

    /// Queued songs whose `tag` equals `needle` exactly.
    pub async fn playlist_find(&self, tag: &str, needle: &str) -> Result<Vec<PlaylistItem>, MpdError> {
        self.queue_query("playlistfind", tag, needle).await
    }

    /// Queued songs whose `tag` contains `needle`, ignoring case.
    pub async fn playlist_search(
        &self,
        tag: &str,
        needle: &str,
    ) -> Result<Vec<PlaylistItem>, MpdError> {
        self.queue_query("playlistsearch", tag, needle).await
    }

    async fn queue_query(
        &self,
        verb: &str,
        tag: &str,
        needle: &str,
    ) -> Result<Vec<PlaylistItem>, MpdError> {
        let lines = self
            .client
            .send_command(CommandLine::new(verb).arg(tag).arg(needle))
            .await?;
        Ok(parse(lines, SONG_MARKERS, PlaylistItem::from_value_map).collect())
    }

    /// Shuffles the queue, or only the songs in `positions`.
    pub async fn shuffle(&self, positions: Option<Range<u32>>) -> Result<(), MpdError> {
        expect_ok(
            self.client,
            CommandLine::new("shuffle").opt_arg(positions.as_ref().map(span)),
        )
        .await
    }

    pub async fn swap(&self, first: u32, second: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("swap").arg(first).arg(second)).await
    }

    pub async fn swap_id(&self, first: u32, second: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("swapid").arg(first).arg(second)).await
    }

    /// Sets the priority of the songs in `positions`. Higher priorities play
    /// first in random mode.
    pub async fn prio(&self, priority: u8, positions: Range<u32>) -> Result<(), MpdError> {
        expect_ok(
            self.client,
            CommandLine::new("prio").arg(priority).arg(span(&positions)),
        )
        .await
    }

    pub async fn prio_id(&self, priority: u8, id: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("prioid").arg(priority).arg(id)).await
    }
}
