use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::info;

use crate::error::{LrcShiftError, Result};
use crate::media::MediaToolkit;

/// Output template that suppresses output entirely
pub const DISCARD_TEMPLATE: &str = "%NULL%";

/// Where the shifted lyrics go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    Discard,
    /// Path template with `${NAME}`, `${DIR}`, `${EXT}` and `${INDEX}` placeholders
    File(String),
}

impl OutputTarget {
    pub fn from_template(template: Option<String>) -> Self {
        match template {
            None => OutputTarget::Stdout,
            Some(t) if t == DISCARD_TEMPLATE => OutputTarget::Discard,
            Some(t) => OutputTarget::File(t),
        }
    }
}

/// Pieces of a path plus the first free collision index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputName {
    pub dir: String,
    pub name: String,
    pub ext: String,
    pub index: usize,
}

impl OutputName {
    /// Split `path` and find the first n >= 1 for which `<dir>/<name>-<n><ext>`
    /// does not exist. `ext_override` replaces the extension (without dot).
    pub fn next_free(path: &Path, ext_override: Option<&str>) -> Self {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().to_string(),
            _ => ".".to_string(),
        };
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let ext = match ext_override {
            Some(fmt) => format!(".{}", fmt),
            None => path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        };

        let mut output = Self { dir, name, ext, index: 1 };
        while output.indexed_path().exists() {
            output.index += 1;
        }
        output
    }

    pub fn indexed_path(&self) -> PathBuf {
        PathBuf::from(format!("{}/{}-{}{}", self.dir, self.name, self.index, self.ext))
    }

    pub fn render(&self, template: &str) -> String {
        template
            .replacen("${NAME}", &self.name, 1)
            .replacen("${DIR}", &self.dir, 1)
            .replacen("${EXT}", &self.ext, 1)
            .replacen("${INDEX}", &self.index.to_string(), 1)
    }
}

/// Absolute form of `path` with `.` dropped and `..` folded lexically
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn same_path(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

/// Writes shifted lyrics to stdout or a templated file, optionally converting it
pub struct OutputWriter {
    toolkit: Arc<dyn MediaToolkit>,
}

impl OutputWriter {
    pub fn new(toolkit: Arc<dyn MediaToolkit>) -> Self {
        Self { toolkit }
    }

    /// Emit `text` for `input`; returns the file written, if any
    pub async fn write(
        &self,
        input: &Path,
        text: &str,
        target: &OutputTarget,
        convert_format: Option<&str>,
    ) -> Result<Option<PathBuf>> {
        let template = match target {
            OutputTarget::Stdout => {
                println!("{}", text);
                return Ok(None);
            }
            OutputTarget::Discard => return Ok(None),
            OutputTarget::File(template) => template,
        };

        let output = PathBuf::from(OutputName::next_free(input, None).render(template));
        if same_path(&output, input) {
            return Err(LrcShiftError::OutputEqualsInput {
                output: output.display().to_string(),
                input: input.display().to_string(),
            });
        }

        fs::write(&output, text).await?;
        info!("'{}' output -> '{}'", input.display(), output.display());

        let Some(format) = convert_format else {
            return Ok(Some(output));
        };

        let converted = OutputName::next_free(&output, Some(format)).indexed_path();
        self.toolkit.convert(&output, &converted).await?;
        fs::remove_file(&output).await?;
        info!("'{}' convert -> '{}'", output.display(), converted.display());

        Ok(Some(converted))
    }
}
