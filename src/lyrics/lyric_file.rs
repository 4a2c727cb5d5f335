use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LrcShiftError, Result};
use crate::media::{read_text_lossy, MediaToolkit, ProbeScope};
use super::{LyricSource, LyricSourceStrategy, SourceKind};

/// ffprobe's format name for LRC files
pub const LRC_FORMAT_NAME: &str = "lrc";

/// Standalone `.lrc` file, read verbatim
pub struct LyricFileStrategy {
    toolkit: Arc<dyn MediaToolkit>,
}

impl LyricFileStrategy {
    pub fn new(toolkit: Arc<dyn MediaToolkit>) -> Self {
        Self { toolkit }
    }
}

#[async_trait]
impl LyricSourceStrategy for LyricFileStrategy {
    fn kind(&self) -> SourceKind {
        SourceKind::LyricFile
    }

    async fn resolve(&self, path: &Path) -> Result<LyricSource> {
        let report = self.toolkit.probe(path, ProbeScope::Format).await?;

        if report.format_name() != Some(LRC_FORMAT_NAME) {
            return Err(LrcShiftError::WrongFormat(path.display().to_string()));
        }

        let text = read_text_lossy(path).await?;
        Ok(LyricSource::lyric_file(text))
    }
}
