//! Error types.
//!
//! The crate is decorative output, so almost every failure path is a
//! silent fallback rather than an error. The variants here cover the
//! two places a real error can surface: reading the override file and
//! opening the log sink.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReverieError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
