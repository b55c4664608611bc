// src/core/commands/database.rs

use super::single_record;
use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::objects::{DirectoryEntry, ENTRY_MARKERS, SONG_MARKERS, Song, SongCount};
use crate::core::parser::{parse, parse_grouped, split_line};
use crate::core::protocol::CommandLine;
use indexmap::IndexMap;
use std::ops::Range;

/// An exact-match condition on one tag, e.g. `Artist` equal to `Miles Davis`.
/// The pseudo tags `any`, `file` and `base` are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub tag: String,
    pub value: String,
}

impl Filter {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

fn with_filters(mut command: CommandLine, filters: &[Filter]) -> CommandLine {
    for filter in filters {
        command = command.arg(&filter.tag).arg(&filter.value);
    }
    command
}

pub struct DatabaseCommands<'a> {
    pub(super) client: &'a MpdClient,
}

impl DatabaseCommands<'_> {
    /// Songs matching every filter. `window` limits the result to a slice of
    /// the matches.
    pub async fn find(
        &self,
        filters: &[Filter],
        window: Option<Range<u32>>,
    ) -> Result<Vec<Song>, MpdError> {
        let mut command = with_filters(CommandLine::new("find"), filters);
        if let Some(window) = window {
            command = command
                .arg("window")
                .arg(format!("{}:{}", window.start, window.end));
        }
        let lines = self.client.send_command(command).await?;
        Ok(parse(lines, SONG_MARKERS, Song::from_value_map).collect())
    }

    /// The contents of a directory, or of the music root for `None`.
    pub async fn list_info(&self, uri: Option<&str>) -> Result<Vec<DirectoryEntry>, MpdError> {
        let lines = self
            .client
            .send_command(CommandLine::new("lsinfo").opt_arg(uri))
            .await?;
        Ok(parse(lines, ENTRY_MARKERS, DirectoryEntry::from_value_map)
            .flatten()
            .collect())
    }

    /// Counts songs matching every filter and their total play time.
    pub async fn count(&self, filters: &[Filter]) -> Result<SongCount, MpdError> {
        let lines = self
            .client
            .send_command(with_filters(CommandLine::new("count"), filters))
            .await?;
        Ok(SongCount::from_value_map(&single_record(lines)))
    }

    /// Distinct values of `tag` across the database.
    pub async fn list(&self, tag: &str) -> Result<Vec<String>, MpdError> {
        let lines = self.client.send_command(CommandLine::new("list").arg(tag)).await?;
        Ok(lines
            .iter()
            .filter_map(|line| split_line(line))
            .map(|(_, value)| value.to_string())
            .collect())
    }

    /// Distinct values of `tag`, grouped by the values of `group_by`, e.g.
    /// albums per album artist. Values reported before the first group sit
    /// under the empty string.
    pub async fn list_grouped(
        &self,
        tag: &str,
        group_by: &str,
    ) -> Result<IndexMap<String, Vec<String>>, MpdError> {
        let command = CommandLine::new("list").arg(tag).arg("group").arg(group_by);
        let lines = self.client.send_command(command).await?;
        Ok(parse_grouped(lines, group_by))
    }
}
