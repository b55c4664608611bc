// src/core/objects/song.rs

use crate::core::parser::ValueMap;
use std::time::Duration;

/// Record markers for song listings.
pub const SONG_MARKERS: &[&str] = &["file"];

/// Record markers for directory listings, where files, playlists and
/// subdirectories are interleaved.
pub const ENTRY_MARKERS: &[&str] = &["file", "directory", "playlist"];

/// A song in the database, with whatever tags the daemon reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Song {
    /// URI relative to the music directory.
    pub file: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub track: Option<String>,
    pub genre: Option<String>,
    pub date: Option<String>,
    pub duration: Option<Duration>,
    pub last_modified: Option<String>,
    /// Every reported field, including the ones above, in arrival order.
    pub tags: ValueMap,
}

impl Song {
    pub fn from_value_map(map: ValueMap) -> Self {
        let text = |key: &str| map.get(key).map(str::to_string);
        // `duration` carries milliseconds; older daemons only send whole-second `Time`.
        let duration = map
            .get_parsed::<f64>("duration")
            .or_else(|| map.get_parsed::<f64>("Time"))
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

        Self {
            file: text("file").unwrap_or_default(),
            title: text("Title"),
            artist: text("Artist"),
            album: text("Album"),
            album_artist: text("AlbumArtist"),
            track: text("Track"),
            genre: text("Genre"),
            date: text("Date"),
            duration,
            last_modified: text("Last-Modified"),
            tags: map,
        }
    }
}

/// A song as it sits in the play queue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaylistItem {
    pub song: Song,
    /// Position within the queue.
    pub position: Option<u32>,
    /// Stable id, valid for as long as the song stays queued.
    pub id: Option<u32>,
    pub priority: Option<u8>,
}

impl PlaylistItem {
    pub fn from_value_map(map: ValueMap) -> Self {
        let position = map.get_parsed("Pos");
        let id = map.get_parsed("Id");
        let priority = map.get_parsed("Prio");
        Self {
            song: Song::from_value_map(map),
            position,
            id,
            priority,
        }
    }
}

/// One entry of `lsinfo`.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEntry {
    Song(Song),
    Playlist {
        path: String,
        last_modified: Option<String>,
    },
    Directory {
        path: String,
        last_modified: Option<String>,
    },
}

impl DirectoryEntry {
    /// Classifies a record by its first key. Returns `None` for records that
    /// start with anything but a known marker.
    pub fn from_value_map(map: ValueMap) -> Option<Self> {
        let (marker, path) = map.iter().next().map(|(k, v)| (k.clone(), v.clone()))?;
        let last_modified = map.get("Last-Modified").map(str::to_string);
        match marker.as_str() {
            "file" => Some(DirectoryEntry::Song(Song::from_value_map(map))),
            "playlist" => Some(DirectoryEntry::Playlist {
                path,
                last_modified,
            }),
            "directory" => Some(DirectoryEntry::Directory {
                path,
                last_modified,
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            DirectoryEntry::Song(song) => &song.file,
            DirectoryEntry::Playlist { path, .. } | DirectoryEntry::Directory { path, .. } => path,
        }
    }
}

/// The result of `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SongCount {
    pub songs: u64,
    pub playtime: Duration,
}

impl SongCount {
    pub fn from_value_map(map: &ValueMap) -> Self {
        Self {
            songs: map.get_parsed("songs").unwrap_or(0),
            playtime: Duration::from_secs(map.get_parsed("playtime").unwrap_or(0)),
        }
    }
}
