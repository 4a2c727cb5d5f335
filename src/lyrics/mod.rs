// Lyric source resolution
//
// A lyric body can come from three places, each handled by its own
// strategy:
// - LyricFile: a standalone .lrc file
// - EmbeddedTag: a container-level tag (LYRICS by default)
// - SubtitleStream: the first subtitle stream muxed into a container
//
// The resolver tries them in that fixed order when the caller asks for
// auto detection.

pub mod embedded_tag;
pub mod lyric_file;
pub mod resolver;
pub mod subtitle_stream;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub use embedded_tag::EmbeddedTagStrategy;
pub use lyric_file::LyricFileStrategy;
pub use resolver::LyricSourceResolver;
pub use subtitle_stream::SubtitleStreamStrategy;

use crate::error::{LrcShiftError, Result};

/// Where a lyric body was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    LyricFile,
    EmbeddedTag,
    SubtitleStream,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::LyricFile => "lyric-file",
            SourceKind::EmbeddedTag => "embedded-tag",
            SourceKind::SubtitleStream => "subtitle-stream",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source kind requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedKind {
    Auto,
    Only(SourceKind),
}

impl FromStr for RequestedKind {
    type Err = LrcShiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(RequestedKind::Auto),
            "lyric" | "lyric-file" => Ok(RequestedKind::Only(SourceKind::LyricFile)),
            "embed" | "embedded-tag" => Ok(RequestedKind::Only(SourceKind::EmbeddedTag)),
            "other" | "subtitle-stream" => Ok(RequestedKind::Only(SourceKind::SubtitleStream)),
            _ => Err(LrcShiftError::UnknownSourceKind(s.to_string())),
        }
    }
}

/// Lyric payload resolved for one input file
#[derive(Debug, Clone, PartialEq)]
pub struct LyricSource {
    pub kind: SourceKind,
    pub text: String,
    /// Every container tag, lyric tag included; embedded-tag sources only
    pub tags: Option<BTreeMap<String, String>>,
    /// Container stream the lyrics belong to
    pub stream_index: Option<usize>,
}

impl LyricSource {
    pub fn lyric_file(text: String) -> Self {
        Self {
            kind: SourceKind::LyricFile,
            text,
            tags: None,
            stream_index: None,
        }
    }

    pub fn embedded_tag(text: String, tags: BTreeMap<String, String>, stream_index: usize) -> Self {
        Self {
            kind: SourceKind::EmbeddedTag,
            text,
            tags: Some(tags),
            stream_index: Some(stream_index),
        }
    }

    pub fn subtitle_stream(text: String, stream_index: usize) -> Self {
        Self {
            kind: SourceKind::SubtitleStream,
            text,
            tags: None,
            stream_index: Some(stream_index),
        }
    }
}

/// One way of locating lyrics inside an input file
#[async_trait]
pub trait LyricSourceStrategy: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Resolve lyrics, reporting why this source does not apply
    async fn resolve(&self, path: &Path) -> Result<LyricSource>;

    /// Resolve lyrics, swallowing the failure reason
    async fn try_resolve(&self, path: &Path) -> Option<LyricSource> {
        match self.resolve(path).await {
            Ok(source) => Some(source),
            Err(e) => {
                debug!("{} not applicable to {}: {}", self.kind(), path.display(), e);
                None
            }
        }
    }
}
