// src/core/commands/playback_options.rs

use super::{expect_ok, single_record};
use crate::core::MpdError;
use crate::core::engine::MpdClient;
use crate::core::protocol::CommandLine;
use strum_macros::{Display, EnumString};

/// The `single` mode. `Oneshot` stops after the current song and then turns itself off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Single {
    #[strum(serialize = "0")]
    Off,
    #[strum(serialize = "1")]
    On,
    #[strum(serialize = "oneshot")]
    Oneshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReplayGainMode {
    Off,
    Track,
    Album,
    Auto,
}

pub struct PlaybackOptionsCommands<'a> {
    pub(super) client: &'a MpdClient,
}

impl PlaybackOptionsCommands<'_> {
    /// Sets the mixer volume, clamped to 0-100.
    pub async fn set_volume(&self, volume: u8) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("setvol").arg(volume.min(100))).await
    }

    pub async fn set_random(&self, on: bool) -> Result<(), MpdError> {
        self.toggle("random", on).await
    }

    pub async fn set_repeat(&self, on: bool) -> Result<(), MpdError> {
        self.toggle("repeat", on).await
    }

    pub async fn set_consume(&self, on: bool) -> Result<(), MpdError> {
        self.toggle("consume", on).await
    }

    pub async fn set_single(&self, mode: Single) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("single").arg(mode)).await
    }

    async fn toggle(&self, verb: &str, on: bool) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new(verb).arg(u8::from(on))).await
    }

    /// Crossfade between songs, in whole seconds. Zero disables it.
    pub async fn set_crossfade(&self, seconds: u32) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("crossfade").arg(seconds)).await
    }

    pub async fn set_mixramp_db(&self, decibels: f64) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("mixrampdb").arg(decibels)).await
    }

    /// Seconds of overlap for MixRamp. `None` turns MixRamp off and falls back
    /// to crossfading.
    pub async fn set_mixramp_delay(&self, seconds: Option<f64>) -> Result<(), MpdError> {
        let arg = match seconds {
            Some(secs) if secs.is_finite() => secs.to_string(),
            _ => "nan".to_string(),
        };
        expect_ok(self.client, CommandLine::new("mixrampdelay").arg(arg)).await
    }

    pub async fn set_replay_gain_mode(&self, mode: ReplayGainMode) -> Result<(), MpdError> {
        expect_ok(self.client, CommandLine::new("replay_gain_mode").arg(mode)).await
    }

    pub async fn replay_gain_mode(&self) -> Result<ReplayGainMode, MpdError> {
        let lines = self
            .client
            .send_command(CommandLine::new("replay_gain_status"))
            .await?;
        let record = single_record(lines);
        let value = record.get("replay_gain_mode").unwrap_or_default();
        value
            .parse()
            .map_err(|_| MpdError::Protocol(format!("unknown replay gain mode '{value}'")))
    }
}
