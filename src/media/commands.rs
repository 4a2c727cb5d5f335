use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, LrcShiftError};
use super::ProbeScope;

/// Abstract media processing command representation
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    /// Create a new media processing command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add input file
    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Add output file
    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite output
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Silence ffmpeg's own logging
    pub fn quiet(self) -> Self {
        self.arg("-loglevel").arg("quiet")
    }

    /// Select a stream from an input, e.g. `0:2`
    pub fn map<S: Into<String>>(self, spec: S) -> Self {
        self.arg("-map").arg(spec)
    }

    /// Take global metadata from the given input index
    pub fn map_metadata(self, input_index: usize) -> Self {
        self.arg("-map_metadata").arg(input_index.to_string())
    }

    /// Copy every selected stream without re-encoding
    pub fn copy_streams(self) -> Self {
        self.arg("-c").arg("copy")
    }

    /// Run the command and hand back its raw output, whatever the exit status
    pub async fn run(&self) -> Result<Output> {
        debug!("Executing media command: {} {:?}", self.binary_path, self.args);
        debug!("Description: {}", self.description);

        Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| LrcShiftError::Media(format!("Failed to execute {}: {}", self.binary_path, e)))
    }

    /// Execute the command, failing on a non-zero exit status
    pub async fn execute(&self) -> Result<()> {
        let output = self.run().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LrcShiftError::Media(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Builder for the ffprobe/ffmpeg invocations the lyric engine uses
pub struct MediaCommandBuilder {
    ffprobe_path: String,
    ffmpeg_path: String,
}

impl MediaCommandBuilder {
    /// Create a new command builder
    pub fn new<S1: Into<String>, S2: Into<String>>(ffprobe_path: S1, ffmpeg_path: S2) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Build a JSON probe command
    pub fn probe<P: AsRef<Path>>(&self, path: P, scope: ProbeScope) -> MediaCommand {
        let section = match scope {
            ProbeScope::Format => "-show_format",
            ProbeScope::Streams => "-show_streams",
        };

        MediaCommand::new(&self.ffprobe_path, "Media probe")
            .args(["-v", "quiet"])
            .output(path)
            .args(["-of", "json", section, "-show_error"])
    }

    /// Build subtitle stream extraction command
    pub fn extract_subtitle<P: AsRef<Path>>(
        &self,
        path: P,
        stream_index: usize,
        dest: P,
    ) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Subtitle extraction")
            .quiet()
            .input(path)
            .map(format!("0:{}", stream_index))
            .output(dest)
            .overwrite()
    }

    /// Build a remux that replaces the container tags with a metadata document
    pub fn remux_with_metadata<P: AsRef<Path>>(
        &self,
        path: P,
        metadata_doc: P,
        dest: P,
    ) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Metadata remux")
            .quiet()
            .input(path)
            .input(metadata_doc)
            .map("0")
            .map_metadata(1)
            .copy_streams()
            .output(dest)
            .overwrite()
    }

    /// Build format conversion command
    pub fn convert<P: AsRef<Path>>(&self, input: P, dest: P) -> MediaCommand {
        MediaCommand::new(&self.ffmpeg_path, "Lyric conversion")
            .quiet()
            .input(input)
            .output(dest)
            .overwrite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MediaCommandBuilder {
        MediaCommandBuilder::new("ffprobe", "ffmpeg")
    }

    #[test]
    fn test_probe_command_line() {
        let cmd = builder().probe("song.mp3", ProbeScope::Format);
        assert_eq!(cmd.binary_path, "ffprobe");
        assert_eq!(
            cmd.args,
            vec!["-v", "quiet", "song.mp3", "-of", "json", "-show_format", "-show_error"]
        );

        let cmd = builder().probe("movie.mkv", ProbeScope::Streams);
        assert!(cmd.args.contains(&"-show_streams".to_string()));
    }

    #[test]
    fn test_extract_subtitle_maps_stream() {
        let cmd = builder().extract_subtitle(Path::new("movie.mkv"), 3, Path::new("/tmp/out.lrc"));
        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec!["-loglevel", "quiet", "-i", "movie.mkv", "-map", "0:3", "/tmp/out.lrc", "-y"]
        );
    }

    #[test]
    fn test_remux_copies_streams_and_takes_second_input_metadata() {
        let cmd = builder().remux_with_metadata(
            Path::new("a.flac"),
            Path::new("meta.txt"),
            Path::new("b.flac"),
        );
        assert_eq!(
            cmd.args,
            vec![
                "-loglevel", "quiet", "-i", "a.flac", "-i", "meta.txt", "-map", "0",
                "-map_metadata", "1", "-c", "copy", "b.flac", "-y",
            ]
        );
    }
}
