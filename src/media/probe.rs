use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which part of the container ffprobe should report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeScope {
    /// Container-level format information and tags
    Format,
    /// Per-stream information
    Streams,
}

/// ffprobe `-of json` report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub format: Option<FormatInfo>,
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
    #[serde(default)]
    pub error: Option<ProbeErrorInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub format_name: String,
    #[serde(default)]
    pub nb_streams: usize,
    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamInfo {
    pub index: usize,
    #[serde(default)]
    pub codec_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeErrorInfo {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub string: String,
}

impl ProbeReport {
    pub fn format_name(&self) -> Option<&str> {
        self.format.as_ref().map(|f| f.format_name.as_str())
    }

    pub fn tags(&self) -> Option<&BTreeMap<String, String>> {
        self.format.as_ref().and_then(|f| f.tags.as_ref())
    }

    /// Stream count as reported by the container, falling back to the stream list
    pub fn stream_count(&self) -> usize {
        match &self.format {
            Some(format) if format.nb_streams > 0 => format.nb_streams,
            _ => self.streams.len(),
        }
    }

    /// Subtitle streams in container order
    pub fn subtitle_streams(&self) -> impl Iterator<Item = &StreamInfo> {
        self.streams
            .iter()
            .filter(|s| s.codec_type.as_deref() == Some("subtitle"))
    }
}
