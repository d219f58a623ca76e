use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Network unreachable, connection reset, timeout.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("Protocol error: {url} returned {status}")]
    Protocol { status: u16, url: String },
    /// The body matched none of the accepted shapes.
    #[error("Shape error: {0}")]
    Shape(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Short, stable category used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::Protocol { .. } => "protocol",
            Error::Shape(_) => "shape",
            Error::Validation(_) => "validation",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
        }
    }

    /// Transport, protocol and shape failures all come from the upstream
    /// service and degrade the affected view instead of surfacing.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Protocol { .. } | Error::Shape(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Error::Protocol {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }
        if err.is_decode() {
            return Error::Shape(err.to_string());
        }
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Shape(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = StdResult<T, Error>;
