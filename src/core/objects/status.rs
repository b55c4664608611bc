// src/core/objects/status.rs

//! Player status and database statistics as reported by `status` and `stats`.

use crate::core::parser::ValueMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The playback state of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Play,
    Stop,
    Pause,
}

impl PlayState {
    fn from_value(value: &str) -> Option<Self> {
        match value {
            "play" => Some(PlayState::Play),
            "stop" => Some(PlayState::Stop),
            "pause" => Some(PlayState::Pause),
            _ => None,
        }
    }
}

/// The `audio` field, `samplerate:bits:channels`. Any part may be unknown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioFormat {
    pub sample_rate: Option<u32>,
    pub bit_depth: Option<u32>,
    pub channels: Option<u32>,
}

impl AudioFormat {
    fn parse(value: &str) -> Self {
        let mut parts = value.split(':').map(|p| p.parse::<u32>().ok().filter(|&n| n > 0));
        Self {
            sample_rate: parts.next().flatten(),
            bit_depth: parts.next().flatten(),
            channels: parts.next().flatten(),
        }
    }
}

/// The current status of the player and the volume level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Status {
    pub state: Option<PlayState>,
    /// Position of the current song within the queue.
    pub song: Option<u32>,
    pub song_id: Option<u32>,
    pub next_song: Option<u32>,
    pub next_song_id: Option<u32>,
    /// Seconds elapsed within the current song.
    pub elapsed: Option<f64>,
    /// Duration of the current song in seconds.
    pub duration: Option<f64>,
    /// Current bitrate in kbps.
    pub bit_rate: Option<u32>,
    pub audio: Option<AudioFormat>,
    /// 0-100, absent when there is no mixer.
    pub volume: Option<i32>,
    pub xfade: Option<u32>,
    pub mixramp_db: Option<f64>,
    pub mixramp_delay: Option<f64>,
    pub playlist_version: Option<u32>,
    pub playlist_length: Option<u32>,
    pub repeat: bool,
    pub random: bool,
    pub single: bool,
    pub consume: bool,
    /// Job id of a running database update.
    pub updating_db: Option<u32>,
    pub error: Option<String>,
}

impl Status {
    pub fn from_value_map(map: &ValueMap) -> Self {
        Self {
            state: map.get("state").and_then(PlayState::from_value),
            song: map.get_parsed("song"),
            song_id: map.get_parsed("songid"),
            next_song: map.get_parsed("nextsong"),
            next_song_id: map.get_parsed("nextsongid"),
            elapsed: map.get_parsed("elapsed"),
            duration: map.get_parsed("duration"),
            bit_rate: map.get_parsed("bitrate"),
            audio: map.get("audio").map(AudioFormat::parse),
            volume: map.get_parsed("volume"),
            xfade: map.get_parsed("xfade"),
            mixramp_db: map.get_parsed("mixrampdb"),
            mixramp_delay: map.get_parsed("mixrampdelay"),
            playlist_version: map.get_parsed("playlist"),
            playlist_length: map.get_parsed("playlistlength"),
            repeat: map.get_flag("repeat").unwrap_or(false),
            random: map.get_flag("random").unwrap_or(false),
            // `single` may also be "oneshot".
            single: map.get("single").is_some_and(|v| v != "0"),
            consume: map.get("consume").is_some_and(|v| v != "0"),
            updating_db: map.get_parsed("updating_db"),
            error: map.get("error").map(str::to_string),
        }
    }
}

/// Database and uptime counters from `stats`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub artists: Option<u64>,
    pub albums: Option<u64>,
    pub songs: Option<u64>,
    pub uptime: Option<Duration>,
    /// Sum of all song durations in the database.
    pub db_playtime: Option<Duration>,
    pub db_update: Option<SystemTime>,
    /// Time spent playing since the daemon started.
    pub playtime: Option<Duration>,
}

impl Statistics {
    pub fn from_value_map(map: &ValueMap) -> Self {
        let seconds = |key: &str| map.get_parsed::<u64>(key).map(Duration::from_secs);
        Self {
            artists: map.get_parsed("artists"),
            albums: map.get_parsed("albums"),
            songs: map.get_parsed("songs"),
            uptime: seconds("uptime"),
            db_playtime: seconds("db_playtime"),
            db_update: seconds("db_update").and_then(|d| UNIX_EPOCH.checked_add(d)),
            playtime: seconds("playtime"),
        }
    }
}
