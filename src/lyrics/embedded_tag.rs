use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LrcShiftError, Result};
use crate::media::{MediaToolkit, ProbeScope};
use super::{LyricSource, LyricSourceStrategy, SourceKind};

/// Lyrics stored in a container-level tag
pub struct EmbeddedTagStrategy {
    toolkit: Arc<dyn MediaToolkit>,
    lyrics_tag: String,
}

impl EmbeddedTagStrategy {
    pub fn new(toolkit: Arc<dyn MediaToolkit>, lyrics_tag: impl Into<String>) -> Self {
        Self {
            toolkit,
            lyrics_tag: lyrics_tag.into(),
        }
    }
}

#[async_trait]
impl LyricSourceStrategy for EmbeddedTagStrategy {
    fn kind(&self) -> SourceKind {
        SourceKind::EmbeddedTag
    }

    async fn resolve(&self, path: &Path) -> Result<LyricSource> {
        let report = self.toolkit.probe(path, ProbeScope::Format).await?;
        let not_found = || LrcShiftError::NoLyricsFound(path.display().to_string());

        let tags = report.tags().ok_or_else(not_found)?;
        let text = tags.get(&self.lyrics_tag).ok_or_else(not_found)?.clone();

        // The tag is treated as belonging to the last stream
        let stream_index = report.stream_count().saturating_sub(1);

        Ok(LyricSource::embedded_tag(text, tags.clone(), stream_index))
    }
}
