use thiserror::Error;

#[derive(Error, Debug)]
pub enum LrcShiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("'{0}': No such file")]
    InputNotFound(String),

    #[error("'{0}': Is a directory")]
    InputIsDirectory(String),

    #[error("'{path}': {message}")]
    ProbeFailed { path: String, message: String },

    #[error("'{0}': is not a lyric type file")]
    WrongFormat(String),

    #[error("'{0}': No lyrics were found")]
    NoLyricsFound(String),

    #[error("'{0}': No streams found that can be converted to lyrics")]
    NoConvertibleStream(String),

    #[error("'{0}' sources cannot be saved directly")]
    UnsupportedSourceKind(String),

    #[error("output '{output}' cannot be the same as input '{input}'")]
    OutputEqualsInput { output: String, input: String },

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("The '{0}' executable file is missing. Please add the '{0}' executable file to the environment variable 'PATH'")]
    MissingTool(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Invalid offset '{0}': expected a number of seconds")]
    InvalidOffset(String),

    #[error("'{0}' is an unknown type keyword")]
    UnknownSourceKind(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No saved backup found: {0}")]
    NoBackup(String),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, LrcShiftError>;
