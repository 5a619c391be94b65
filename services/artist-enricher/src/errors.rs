//!
//! src/errors.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Defines enums and methods of error conversion
//! for errors the enricher uses
//!
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnricherError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("rate limited: retry {0:?}")]
    RateLimited(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("input error: {0}")]
    Input(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<reqwest::Error> for EnricherError {
    fn from(e: reqwest::Error) -> Self { EnricherError::Http(e.to_string()) }
}

impl From<serde_json::Error> for EnricherError {
    fn from(e: serde_json::Error) -> Self { EnricherError::Parse(e.to_string()) }
}

impl From<csv::Error> for EnricherError {
    fn from(e: csv::Error) -> Self { EnricherError::Csv(e.to_string()) }
}
