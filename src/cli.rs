use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shift the timestamps of LRC lyrics found in a file
    Shift {
        /// Lyric file or media file carrying lyrics
        input: PathBuf,

        /// Input type (lyric | embed | other | auto)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Lyrics timestamp offset in seconds, may be negative or fractional
        #[arg(short = 's', long, allow_hyphen_values = true)]
        offset: Option<String>,

        /// Output file; without a value the configured template is used
        #[arg(short, long, num_args = 0..=1)]
        output: Option<Option<String>>,

        /// Output conversion format such as srt, vtt or ass (requires --output)
        #[arg(short, long, num_args = 0..=1, requires = "output")]
        convert: Option<Option<String>>,

        /// Write the shifted lyrics back into the input
        #[arg(long)]
        save: bool,

        /// Show first/last timestamps before and after the shift
        #[arg(short = 'd', long)]
        show_diff: bool,
    },

    /// Write a configuration file with the default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Export the file as it was before the last save
    ExportBackup {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_shift_flags() {
        let args = Args::try_parse_from([
            "lrcshift", "shift", "song.lrc", "-s", "-15", "-o", "-c", "vtt", "--save", "-d",
        ])
        .unwrap();

        let Commands::Shift { input, offset, output, convert, save, show_diff, kind } = args.command else {
            panic!("expected shift command");
        };
        assert_eq!(input, PathBuf::from("song.lrc"));
        assert_eq!(offset.as_deref(), Some("-15"));
        assert_eq!(output, Some(None));
        assert_eq!(convert, Some(Some("vtt".to_string())));
        assert!(save);
        assert!(show_diff);
        assert!(kind.is_none());
    }

    #[test]
    fn test_init_config_flags() {
        let args = Args::try_parse_from(["lrcshift", "init-config", "--force", "--config", "x.toml"]).unwrap();
        assert!(matches!(args.command, Commands::InitConfig { force: true }));
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_convert_requires_output() {
        assert!(Args::try_parse_from(["lrcshift", "shift", "song.lrc", "-c", "srt"]).is_err());
    }
}
