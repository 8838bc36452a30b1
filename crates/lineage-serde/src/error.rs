use std::fmt::Display;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Raised when a value that is neither a mapping nor a structured
    /// record is handed to the dict conversion.
    #[error("expected a mapping or structured record, found {found}")]
    NotAMapping { found: &'static str },

    #[error("map key must be a string, number or bool, found {found}")]
    InvalidKey { found: &'static str },

    #[error("{0}")]
    Message(String),
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
