use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{LrcShiftError, Result};
use crate::lyrics::{LyricSource, SourceKind};
use crate::media::MediaToolkit;
use crate::scratch::ScratchContext;

/// Header line of an ffmetadata document
pub const FFMETADATA_HEADER: &str = ";FFMETADATA1";

/// Record of the most recent save, kept so the pre-image can be exported later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveManifest {
    pub file: PathBuf,
    pub backup: PathBuf,
    pub kind: String,
    pub saved_at: DateTime<Local>,
}

impl SaveManifest {
    pub fn new(file: &Path, backup: &Path, kind: SourceKind) -> Self {
        Self {
            file: file.to_path_buf(),
            backup: backup.to_path_buf(),
            kind: kind.to_string(),
            saved_at: Local::now(),
        }
    }

    pub async fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?).await?;
        Ok(())
    }

    pub async fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|_| LrcShiftError::NoBackup(path.display().to_string()))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// `<file>.export<ext>`, next to the saved file
pub fn export_path(file: &Path) -> PathBuf {
    let ext = file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    PathBuf::from(format!("{}.export{}", file.display(), ext))
}

/// Copy the pre-image of the last save next to the saved file.
///
/// `confirm` sees the manifest and the export destination; returning
/// `false` cancels without touching anything.
pub async fn export_backup<F>(manifest_path: &Path, confirm: F) -> Result<Option<PathBuf>>
where
    F: FnOnce(&SaveManifest, &Path) -> Result<bool>,
{
    let manifest = SaveManifest::read(manifest_path).await?;
    if !fs::try_exists(&manifest.backup).await.unwrap_or(false) {
        return Err(LrcShiftError::NoBackup(manifest.backup.display().to_string()));
    }

    let target = export_path(&manifest.file);
    if !confirm(&manifest, &target)? {
        info!("export cancelled");
        return Ok(None);
    }

    fs::copy(&manifest.backup, &target).await?;
    info!("export file '{}' -> '{}'", manifest.file.display(), target.display());
    Ok(Some(target))
}

fn escape_metadata(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '=' | ';' | '#' | '\n' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build an ffmetadata document: every tag except the lyric tag, then the
/// lyric tag set to `lyrics`
pub fn metadata_document(tags: &BTreeMap<String, String>, lyrics_tag: &str, lyrics: &str) -> String {
    let mut doc = String::from(FFMETADATA_HEADER);
    doc.push('\n');

    for (key, value) in tags.iter().filter(|(key, _)| key.as_str() != lyrics_tag) {
        doc.push_str(&format!("{}={}\n", escape_metadata(key), escape_metadata(value)));
    }

    doc.push_str(&format!("{}={}", escape_metadata(lyrics_tag), escape_metadata(lyrics)));
    doc
}

/// Writes a shifted [`LyricSource`] back to where it came from
pub struct Persister {
    toolkit: Arc<dyn MediaToolkit>,
    scratch: Arc<ScratchContext>,
    lyrics_tag: String,
}

impl Persister {
    pub fn new(
        toolkit: Arc<dyn MediaToolkit>,
        scratch: Arc<ScratchContext>,
        lyrics_tag: impl Into<String>,
    ) -> Self {
        Self {
            toolkit,
            scratch,
            lyrics_tag: lyrics_tag.into(),
        }
    }

    /// Save `source` over `path`, keeping a backup of the previous contents
    pub async fn save(&self, path: &Path, source: &LyricSource) -> Result<SaveManifest> {
        let backup = match source.kind {
            SourceKind::SubtitleStream => {
                return Err(LrcShiftError::UnsupportedSourceKind(source.kind.to_string()));
            }
            SourceKind::LyricFile => self.save_lyric_file(path, source).await?,
            SourceKind::EmbeddedTag => self.save_embedded_tag(path, source).await?,
        };

        info!("'{}' save successful (backup: {})", path.display(), backup.display());
        Ok(SaveManifest::new(path, &backup, source.kind))
    }

    async fn save_lyric_file(&self, path: &Path, source: &LyricSource) -> Result<PathBuf> {
        let backup = self.scratch.backup_path(path)?;
        fs::copy(path, &backup).await?;
        fs::write(path, &source.text).await?;
        Ok(backup)
    }

    async fn save_embedded_tag(&self, path: &Path, source: &LyricSource) -> Result<PathBuf> {
        let empty = BTreeMap::new();
        let tags = source.tags.as_ref().unwrap_or(&empty);

        let metadata_path = self.scratch.metadata_path();
        fs::write(&metadata_path, metadata_document(tags, &self.lyrics_tag, &source.text)).await?;

        // Stage next to the original so the final rename stays on one filesystem
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let suffix = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let staged = tempfile::Builder::new()
            .prefix(".lrcshift-")
            .suffix(&suffix)
            .tempfile_in(parent)?;

        self.toolkit.remux(path, &metadata_path, staged.path()).await?;

        let permissions = fs::metadata(path).await?.permissions();
        fs::set_permissions(staged.path(), permissions).await?;

        let backup = self.scratch.backup_path(path)?;
        fs::copy(path, &backup).await?;
        debug!("Replacing {} with {}", path.display(), staged.path().display());
        staged.persist(path).map_err(|e| LrcShiftError::Io(e.error))?;

        Ok(backup)
    }
}
