// src/core/commands/playback.rs

use super::expect_ok;
use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::protocol::CommandLine;
use std::time::Duration;

pub struct PlaybackCommands<'a> {
    pub(super) client: &'a MpdClient,
}

/// Seconds with millisecond precision, the way the daemon accepts fractional times.
fn seconds(time: Duration) -> String {
    format!("{:.3}", time.as_secs_f64())
}

impl PlaybackCommands<'_> {
    /// Starts playback, at queue position `position` if given.
    pub async fn play(&self, position: Option<u32>) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("play").opt_arg(position)).await
    }

    pub async fn play_id(&self, id: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("playid").arg(id)).await
    }

    pub async fn previous(&self) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("previous")).await
    }

    pub async fn next(&self) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("next")).await
    }

    /// Seeks to `time` within the song at queue position `position`.
    pub async fn seek(&self, position: u32, time: Duration) -> Result<(), MpdError> {
        expect_ok(
            self.client,
            CommandLine::new("seek").arg(position).arg(seconds(time)),
        )
        .await
    }

    pub async fn seek_id(&self, id: u32, time: Duration) -> Result<(), MpdError> {
        expect_ok(
            self.client,
            CommandLine::new("seekid").arg(id).arg(seconds(time)),
        )
        .await
    }

    /// Seeks within the current song. A relative seek moves by `time`
    /// seconds, backwards if it is negative.
    pub async fn seek_cur(&self, time: f64, relative: bool) -> Result<(), MpdError> {
        let arg = match (relative, time >= 0.0) {
            (true, true) => format!("+{time:.3}"),
            (true, false) => format!("{time:.3}"),
            (false, _) => format!("{:.3}", time.max(0.0)),
        };
        expect_ok(self.client, CommandLine::new("seekcur").arg(arg)).await
    }

    pub async fn pause(&self, paused: bool) -> Result<(), MpdError> {
        expect_ok(
            self.client,
            CommandLine::new("pause").arg(u8::from(paused)),
        )
        .await
    }

    pub async fn stop(&self) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("stop")).await
    }
}
