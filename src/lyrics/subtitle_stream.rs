use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::{LrcShiftError, Result};
use crate::media::{MediaToolkit, ProbeScope};
use crate::scratch::ScratchContext;
use super::{LyricSource, LyricSourceStrategy, SourceKind};

/// Lyrics demuxed from the first subtitle stream of a container.
///
/// Only the first subtitle stream is tried; if extracting it fails the
/// error is returned and later subtitle streams are not considered.
pub struct SubtitleStreamStrategy {
    toolkit: Arc<dyn MediaToolkit>,
    scratch: Arc<ScratchContext>,
}

impl SubtitleStreamStrategy {
    pub fn new(toolkit: Arc<dyn MediaToolkit>, scratch: Arc<ScratchContext>) -> Self {
        Self { toolkit, scratch }
    }
}

#[async_trait]
impl LyricSourceStrategy for SubtitleStreamStrategy {
    fn kind(&self) -> SourceKind {
        SourceKind::SubtitleStream
    }

    async fn resolve(&self, path: &Path) -> Result<LyricSource> {
        let report = self.toolkit.probe(path, ProbeScope::Streams).await?;

        let stream = report
            .subtitle_streams()
            .next()
            .ok_or_else(|| LrcShiftError::NoConvertibleStream(path.display().to_string()))?;

        info!("Extracting lyrics from subtitle stream {} of {}", stream.index, path.display());
        let dest = self.scratch.extraction_path(stream.index);
        let text = self.toolkit.extract_subtitle(path, stream.index, &dest).await?;

        Ok(LyricSource::subtitle_stream(text, stream.index))
    }
}
