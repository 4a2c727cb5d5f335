use async_trait::async_trait;
use std::path::Path;
use tracing::{info, debug};

use crate::config::MediaConfig;
use crate::error::{Result, LrcShiftError};
use super::{read_text_lossy, MediaToolkit, MediaCommandBuilder, ProbeReport, ProbeScope};

/// Concrete toolkit implementation (ffprobe/ffmpeg based)
pub struct FfmpegToolkit {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegToolkit {
    /// Create a new toolkit implementation
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.ffprobe_path, &config.ffmpeg_path);

        Self {
            config,
            command_builder,
        }
    }
}

fn probe_failure(path: &Path, message: impl Into<String>) -> LrcShiftError {
    LrcShiftError::ProbeFailed {
        path: path.display().to_string(),
        message: message.into(),
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    fn check_availability(&self) -> Result<()> {
        for binary in [&self.config.ffprobe_path, &self.config.ffmpeg_path] {
            which::which(binary).map_err(|_| LrcShiftError::MissingTool(binary.clone()))?;
        }
        debug!("ffprobe and ffmpeg are available");
        Ok(())
    }

    async fn probe(&self, path: &Path, scope: ProbeScope) -> Result<ProbeReport> {
        let output = self.command_builder.probe(path, scope).run().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        let report: ProbeReport = match serde_json::from_str(&stdout) {
            Ok(report) => report,
            Err(e) if output.status.success() => return Err(LrcShiftError::Json(e)),
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(probe_failure(path, stderr.trim()));
            }
        };

        if let Some(error) = &report.error {
            return Err(probe_failure(path, error.string.clone()));
        }
        if !output.status.success() {
            return Err(probe_failure(path, format!("ffprobe exited with {}", output.status)));
        }

        Ok(report)
    }

    async fn extract_subtitle(&self, path: &Path, stream_index: usize, dest: &Path) -> Result<String> {
        debug!("Extracting stream {} of {} to {}", stream_index, path.display(), dest.display());

        self.command_builder
            .extract_subtitle(path, stream_index, dest)
            .execute()
            .await?;

        read_text_lossy(dest).await
    }

    async fn remux(&self, path: &Path, metadata_doc: &Path, dest: &Path) -> Result<()> {
        info!("Remuxing {} with updated tags -> {}", path.display(), dest.display());

        self.command_builder
            .remux_with_metadata(path, metadata_doc, dest)
            .execute()
            .await
    }

    async fn convert(&self, input: &Path, dest: &Path) -> Result<()> {
        self.command_builder.convert(input, dest).execute().await
    }
}
