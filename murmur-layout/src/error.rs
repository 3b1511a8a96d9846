//! Layout error types.
//!
//! The layout pass itself never fails; these cover loading settings and
//! validating user-supplied formats.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
