use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{LrcShiftError, Result};
use crate::lyrics::{LyricSource, LyricSourceResolver, RequestedKind, SourceKind};
use crate::media::{MediaToolkit, MediaToolkitFactory};
use crate::output::{OutputTarget, OutputWriter};
use crate::persist::{Persister, SaveManifest};
use crate::scratch::ScratchContext;
use crate::shift::{apply_offset, Offset, ShiftSummary};

/// One shift invocation
#[derive(Debug, Clone)]
pub struct ShiftRequest {
    pub input: PathBuf,
    pub kind: RequestedKind,
    pub offset: Offset,
    pub output: OutputTarget,
    pub convert_format: Option<String>,
    pub save: bool,
    pub show_diff: bool,
}

/// What a shift invocation did
#[derive(Debug, Clone)]
pub struct ShiftOutcome {
    pub source_kind: SourceKind,
    pub written: Option<PathBuf>,
    pub summary: Option<ShiftSummary>,
    pub saved: Option<SaveManifest>,
}

/// Lyrics resolved and shifted, output already emitted
#[derive(Debug, Clone)]
pub struct PreparedShift {
    pub source: LyricSource,
    pub written: Option<PathBuf>,
    pub summary: Option<ShiftSummary>,
    shifted: bool,
}

/// Reject inputs that are missing or are directories
pub fn validate_input(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| LrcShiftError::InputNotFound(path.display().to_string()))?;
    if metadata.is_dir() {
        return Err(LrcShiftError::InputIsDirectory(path.display().to_string()));
    }
    Ok(())
}

pub struct Workflow {
    config: Config,
    resolver: LyricSourceResolver,
    writer: OutputWriter,
    persister: Persister,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let toolkit = MediaToolkitFactory::create_toolkit(config.media.clone());

        // Check dependencies
        toolkit.check_availability()?;

        Self::with_toolkit(config, toolkit)
    }

    pub fn with_toolkit(config: Config, toolkit: Arc<dyn MediaToolkit>) -> Result<Self> {
        let scratch = Arc::new(ScratchContext::new(config.backup_dir())?);
        debug!("Scratch directory: {}", scratch.temp_dir().display());

        let resolver = LyricSourceResolver::new(toolkit.clone(), scratch.clone(), &config.lyrics_tag);
        let writer = OutputWriter::new(toolkit.clone());
        let persister = Persister::new(toolkit, scratch, &config.lyrics_tag);

        Ok(Self {
            config,
            resolver,
            writer,
            persister,
        })
    }

    /// Resolve, shift, emit and optionally save lyrics for one input file
    pub async fn shift(&self, request: &ShiftRequest) -> Result<ShiftOutcome> {
        let prepared = self.prepare(request).await?;
        self.finish(request, prepared).await
    }

    /// Resolve and shift the lyrics and emit the output, without saving.
    ///
    /// The diff summary is available here so it can be reported even when
    /// the save that follows fails.
    pub async fn prepare(&self, request: &ShiftRequest) -> Result<PreparedShift> {
        let input = request.input.as_path();
        info!("Processing lyrics in {}", input.display());
        validate_input(input)?;

        let mut source = self.resolver.resolve(input, request.kind).await?;
        let convert_format = request.convert_format.as_deref();

        if request.offset.is_unset() {
            let written = self.writer.write(input, &source.text, &request.output, convert_format).await?;
            return Ok(PreparedShift {
                source,
                written,
                summary: None,
                shifted: false,
            });
        }

        let shifted = apply_offset(&source.text, request.offset)?;
        let written = self.writer.write(input, &shifted, &request.output, convert_format).await?;

        let summary = request
            .show_diff
            .then(|| ShiftSummary::new(&source.text, &shifted, request.offset));

        source.text = shifted;
        Ok(PreparedShift {
            source,
            written,
            summary,
            shifted: true,
        })
    }

    /// Save the prepared lyrics back into the input when requested
    pub async fn finish(&self, request: &ShiftRequest, prepared: PreparedShift) -> Result<ShiftOutcome> {
        let saved = if request.save && prepared.shifted {
            let manifest = self.persister.save(&request.input, &prepared.source).await?;
            manifest.write(self.config.manifest_path()).await?;
            Some(manifest)
        } else {
            None
        };

        Ok(ShiftOutcome {
            source_kind: prepared.source.kind,
            written: prepared.written,
            summary: prepared.summary,
            saved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{FormatInfo, MockMediaToolkit, ProbeReport, ProbeScope, StreamInfo};

    fn lrc_toolkit() -> MockMediaToolkit {
        let mut toolkit = MockMediaToolkit::new();
        toolkit.expect_probe().returning(|_, _| {
            Ok(ProbeReport {
                format: Some(FormatInfo {
                    format_name: "lrc".to_string(),
                    nb_streams: 1,
                    tags: None,
                }),
                ..Default::default()
            })
        });
        toolkit
    }

    fn request(input: PathBuf, offset: Offset) -> ShiftRequest {
        ShiftRequest {
            input,
            kind: RequestedKind::Auto,
            offset,
            output: OutputTarget::Discard,
            convert_format: None,
            save: false,
            show_diff: false,
        }
    }

    fn config_in(dir: &Path) -> Config {
        Config {
            work_dir: dir.join(".lrcshift"),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = Workflow::with_toolkit(config_in(dir.path()), Arc::new(MockMediaToolkit::new())).unwrap();

        let result = workflow.shift(&request(dir.path().join("nope.lrc"), Offset::Seconds(1.0))).await;
        assert!(matches!(result, Err(LrcShiftError::InputNotFound(_))));

        let result = workflow.shift(&request(dir.path().to_path_buf(), Offset::Seconds(1.0))).await;
        assert!(matches!(result, Err(LrcShiftError::InputIsDirectory(_))));
    }

    #[tokio::test]
    async fn test_shift_and_save_lyric_file() {
        let dir = tempfile::tempdir().unwrap();
        let lrc = dir.path().join("song.lrc");
        std::fs::write(&lrc, "[ti:Song]\n[01:12.05]Hello\n[01:20.00]World").unwrap();

        let config = config_in(dir.path());
        let manifest_path = config.manifest_path();
        let workflow = Workflow::with_toolkit(config, Arc::new(lrc_toolkit())).unwrap();

        let mut req = request(lrc.clone(), Offset::Seconds(-15.0));
        req.save = true;
        req.show_diff = true;
        let outcome = workflow.shift(&req).await.unwrap();

        assert_eq!(outcome.source_kind, SourceKind::LyricFile);
        assert_eq!(
            std::fs::read_to_string(&lrc).unwrap(),
            "[ti:Song]\n[00:57.05]Hello\n[01:05.00]World"
        );

        let summary = outcome.summary.unwrap();
        assert_eq!(summary.before.unwrap().first, "[01:12.05]");
        assert_eq!(summary.after.unwrap().last, "[01:05.00]");

        let saved = outcome.saved.unwrap();
        assert_eq!(SaveManifest::read(&manifest_path).await.unwrap(), saved);
        assert_eq!(
            std::fs::read_to_string(&saved.backup).unwrap(),
            "[ti:Song]\n[01:12.05]Hello\n[01:20.00]World"
        );
    }

    #[tokio::test]
    async fn test_summary_is_ready_before_a_failing_save() {
        let dir = tempfile::tempdir().unwrap();
        let movie = dir.path().join("movie.mkv");
        std::fs::write(&movie, "video bytes").unwrap();

        let mut toolkit = MockMediaToolkit::new();
        toolkit.expect_probe().returning(|_, scope| {
            Ok(match scope {
                ProbeScope::Format => ProbeReport {
                    format: Some(FormatInfo {
                        format_name: "matroska,webm".to_string(),
                        nb_streams: 2,
                        tags: None,
                    }),
                    ..Default::default()
                },
                ProbeScope::Streams => ProbeReport {
                    streams: vec![
                        StreamInfo { index: 0, codec_type: Some("video".to_string()) },
                        StreamInfo { index: 1, codec_type: Some("subtitle".to_string()) },
                    ],
                    ..Default::default()
                },
            })
        });
        toolkit.expect_extract_subtitle().returning(|_, _, dest| {
            std::fs::write(dest, "[00:10.00]line")?;
            Ok("[00:10.00]line".to_string())
        });
        toolkit.expect_remux().never();

        let workflow = Workflow::with_toolkit(config_in(dir.path()), Arc::new(toolkit)).unwrap();
        let mut req = request(movie.clone(), Offset::Seconds(2.0));
        req.save = true;
        req.show_diff = true;

        let prepared = workflow.prepare(&req).await.unwrap();
        let summary = prepared.summary.clone().unwrap();
        assert_eq!(summary.after.unwrap().first, "[00:12.00]");

        let result = workflow.finish(&req, prepared).await;
        assert!(matches!(result, Err(LrcShiftError::UnsupportedSourceKind(_))));
        assert_eq!(std::fs::read_to_string(&movie).unwrap(), "video bytes");
    }

    #[tokio::test]
    async fn test_unset_offset_skips_save() {
        let dir = tempfile::tempdir().unwrap();
        let lrc = dir.path().join("song.lrc");
        std::fs::write(&lrc, "[01:12.05]Hello").unwrap();

        let workflow = Workflow::with_toolkit(config_in(dir.path()), Arc::new(lrc_toolkit())).unwrap();
        let mut req = request(lrc.clone(), Offset::Unset);
        req.save = true;
        req.output = OutputTarget::File("${DIR}/${NAME}-${INDEX}${EXT}".to_string());

        let outcome = workflow.shift(&req).await.unwrap();
        assert!(outcome.saved.is_none());
        assert_eq!(std::fs::read_to_string(&lrc).unwrap(), "[01:12.05]Hello");
        assert_eq!(
            std::fs::read_to_string(outcome.written.unwrap()).unwrap(),
            "[01:12.05]Hello"
        );
    }
}
