//! lrcshift - LRC lyric timestamp shifting
//!
//! Shifts the `[MM:SS.ff]` timestamps of LRC lyrics by a fixed offset. The
//! lyrics may live in a standalone lyric file, in a media container's tag or
//! in a muxed subtitle stream; ffprobe and ffmpeg do the container work.

pub mod cli;
pub mod config;
pub mod error;
pub mod lyrics;
pub mod media;
pub mod output;
pub mod persist;
pub mod scratch;
pub mod shift;
pub mod timestamp;
pub mod workflow;
