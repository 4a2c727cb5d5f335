// External media toolkit abstraction
//
// Everything that shells out to ffprobe/ffmpeg goes through the
// MediaToolkit trait so the lyric resolver and the save path can be
// exercised against a mock:
// - Commands: command line builders for ffprobe/ffmpeg
// - Probe: ffprobe JSON report types
// - Processor: ffmpeg-backed implementation

pub mod commands;
pub mod probe;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub use commands::*;
pub use probe::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Read a lyric text file, replacing invalid UTF-8 sequences (GBK, Shift-JIS
/// lyrics) with U+FFFD instead of failing
pub async fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!("{} is not valid UTF-8, undecodable bytes are replaced", path.display());
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Operations the lyric engine needs from the external media utility
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Verify the external binaries can be found
    fn check_availability(&self) -> Result<()>;

    /// Report container or stream metadata for a file
    async fn probe(&self, path: &Path, scope: ProbeScope) -> Result<ProbeReport>;

    /// Extract one subtitle stream as lyric text via `dest`
    async fn extract_subtitle(&self, path: &Path, stream_index: usize, dest: &Path) -> Result<String>;

    /// Write a copy of `path` to `dest` with container tags taken from `metadata_doc`
    async fn remux(&self, path: &Path, metadata_doc: &Path, dest: &Path) -> Result<()>;

    /// Convert a lyric file into the format implied by `dest`'s extension
    async fn convert(&self, input: &Path, dest: &Path) -> Result<()>;
}

/// Factory for creating media toolkit instances
pub struct MediaToolkitFactory;

impl MediaToolkitFactory {
    /// Create the default toolkit implementation (ffprobe/ffmpeg based)
    pub fn create_toolkit(config: MediaConfig) -> Arc<dyn MediaToolkit> {
        Arc::new(processor::FfmpegToolkit::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_text_lossy_replaces_invalid_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gbk.lrc");
        std::fs::write(&path, b"[00:01.00]\xC4\xE3\xBA\xC3\n").unwrap();

        let text = read_text_lossy(&path).await.unwrap();
        assert!(text.starts_with("[00:01.00]"));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_read_text_lossy_keeps_valid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utf8.lrc");
        std::fs::write(&path, "[00:01.00]你好").unwrap();

        assert_eq!(read_text_lossy(&path).await.unwrap(), "[00:01.00]你好");
    }
}
