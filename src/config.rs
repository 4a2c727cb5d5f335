use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, LrcShiftError};

fn default_input_kind() -> String {
    "auto".to_string()
}

fn default_output_template() -> String {
    "./${NAME}-${INDEX}.lrc".to_string()
}

fn default_convert_format() -> String {
    "srt".to_string()
}

fn default_lyrics_tag() -> String {
    "LYRICS".to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".lrcshift")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default source kind: lyric, embed, other or auto
    #[serde(default = "default_input_kind")]
    pub input_kind: String,
    /// Print the first/last timestamp before and after shifting
    #[serde(default)]
    pub show_diff: bool,
    /// Output path template used when `-o` is given without a value
    #[serde(default = "default_output_template")]
    pub output_template: String,
    /// Conversion format used when `-c` is given without a value
    #[serde(default = "default_convert_format")]
    pub convert_format: String,
    /// Container tag holding embedded lyrics
    #[serde(default = "default_lyrics_tag")]
    pub lyrics_tag: String,
    /// Reject offsets that are not numbers instead of treating them as zero
    #[serde(default)]
    pub strict_offset: bool,
    /// Directory for logs, backups and the save manifest
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffprobe binary
    pub ffprobe_path: String,
    /// Path to ffmpeg binary
    pub ffmpeg_path: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_kind: default_input_kind(),
            show_diff: false,
            output_template: default_output_template(),
            convert_format: default_convert_format(),
            lyrics_tag: default_lyrics_tag(),
            strict_offset: false,
            work_dir: default_work_dir(),
            media: MediaConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LrcShiftError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LrcShiftError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| LrcShiftError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Write the current settings to `path`, refusing to replace an existing file unless `force`
    pub fn init_file<P: AsRef<Path>>(&self, path: P, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            return Err(LrcShiftError::Config(format!(
                "{} already exists, pass --force to overwrite it",
                path.display()
            )));
        }
        self.save_to_file(path)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.work_dir.join("log")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.work_dir.join("backup")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join("last-save.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lrcshift.toml");
        std::fs::write(&path, "show_diff = true\n\n[media]\nffprobe_path = \"/opt/ffprobe\"\nffmpeg_path = \"/opt/ffmpeg\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.show_diff);
        assert_eq!(config.input_kind, "auto");
        assert_eq!(config.lyrics_tag, "LYRICS");
        assert_eq!(config.media.ffprobe_path, "/opt/ffprobe");
        assert_eq!(config.manifest_path(), PathBuf::from(".lrcshift/last-save.json"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lrcshift.toml");
        let mut config = Config::default();
        config.convert_format = "vtt".to_string();
        config.strict_offset = true;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.convert_format, "vtt");
        assert!(loaded.strict_offset);
    }

    #[test]
    fn test_init_file_keeps_existing_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lrcshift.toml");

        Config::default().init_file(&path, false).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().lyrics_tag, "LYRICS");

        let mut config = Config::default();
        config.lyrics_tag = "UNSYNCEDLYRICS".to_string();
        assert!(matches!(config.init_file(&path, false), Err(LrcShiftError::Config(_))));
        assert_eq!(Config::from_file(&path).unwrap().lyrics_tag, "LYRICS");

        config.init_file(&path, true).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().lyrics_tag, "UNSYNCEDLYRICS");
    }

    #[test]
    fn test_invalid_file_is_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "show_diff = [").unwrap();
        assert!(matches!(Config::from_file(&path), Err(LrcShiftError::Toml(_))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::from_file(&missing), Err(LrcShiftError::Config(_))));
    }
}
