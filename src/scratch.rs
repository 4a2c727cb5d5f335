use chrono::Local;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::Result;

/// Per-invocation working area.
///
/// Transient files (extracted subtitle text, metadata documents) live in a
/// temporary directory that disappears with the context. Backups go to a
/// persistent directory so a save can be undone after the process exits.
pub struct ScratchContext {
    temp: TempDir,
    backup_dir: PathBuf,
}

impl ScratchContext {
    pub fn new<P: AsRef<Path>>(backup_dir: P) -> Result<Self> {
        let temp = tempfile::Builder::new().prefix("lrcshift-").tempdir()?;
        Ok(Self {
            temp,
            backup_dir: backup_dir.as_ref().to_path_buf(),
        })
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp.path()
    }

    /// Scratch file for extracted subtitle text
    pub fn extraction_path(&self, stream_index: usize) -> PathBuf {
        self.temp.path().join(format!("stream-{}.lrc", stream_index))
    }

    /// Scratch file for an ffmetadata document
    pub fn metadata_path(&self) -> PathBuf {
        self.temp.path().join("ffmetadata.txt")
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Fresh backup location for `original`, creating the backup directory if needed
    pub fn backup_path(&self, original: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.backup_dir)?;

        let name = original
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "lyrics".to_string());
        let stamp = Local::now().format("%Y%m%d%H%M%S");

        let mut candidate = self.backup_dir.join(format!("{}.{}.bak", name, stamp));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.backup_dir.join(format!("{}.{}-{}.bak", name, stamp, n));
            n += 1;
        }
        Ok(candidate)
    }
}
