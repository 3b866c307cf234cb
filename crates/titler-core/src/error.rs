/// Core error types for giftitler.
use std::path::PathBuf;

/// A specialized Result type for giftitler operations.
pub type TitlerResult<T> = Result<T, TitlerError>;

/// Top-level error type shared by every stage of a run.
#[derive(Debug, thiserror::Error)]
pub enum TitlerError {
    #[error("parse error: {message} at line {line}")]
    Parse { message: String, line: usize },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("font error: {message} ({path:?})")]
    Font { message: String, path: PathBuf },

    #[error("render error: {0}")]
    Render(String),

    #[error("cannot auto-size font: {0}")]
    DegenerateAutoSize(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl TitlerError {
    /// Create a parse error with the 1-based line it was found on.
    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        TitlerError::Parse {
            message: message.into(),
            line,
        }
    }

    /// Create a font error.
    pub fn font(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        TitlerError::Font {
            message: message.into(),
            path: path.into(),
        }
    }
}
