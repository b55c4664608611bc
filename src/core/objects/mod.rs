// src/core/objects/mod.rs

//! Typed views over parsed response records.

pub mod song;
pub mod status;

pub use song::{DirectoryEntry, ENTRY_MARKERS, PlaylistItem, SONG_MARKERS, Song, SongCount};
pub use status::{AudioFormat, PlayState, Statistics, Status};
