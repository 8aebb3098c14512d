//! Defines custom error types for the library.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned when publishing a document fails.
pub enum PublishError {
    #[error("WordPress credentials not configured. Missing: {}. Set WORDPRESS_URL, WORDPRESS_USER, and WORDPRESS_APP_PASSWORD.", .0.join(", "))]
    Configuration(Vec<&'static str>),

    #[error("WordPress API error: {status} - {body}")]
    RemoteApi { status: u16, body: String },

    #[error("Failed to reach WordPress: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("WordPress returned an unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Failed to access document {path}: {source}")]
    DocumentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access ledger {path}: {source}")]
    LedgerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Ledger {path} is not valid JSON: {source}")]
    LedgerFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
