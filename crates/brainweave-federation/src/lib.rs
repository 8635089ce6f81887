//! # Brainweave Federation
//!
//! Cross-instance reference resolution: the published brain-map wire
//! format, a concurrent and individually-timeboxed fetcher for peers' maps,
//! and generation of this instance's own map artifact.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod artifact;
pub mod fetcher;
pub mod map;

pub use artifact::{build_brain_map, write_brain_map};
pub use fetcher::FederationClient;
pub use map::{ExternalBrainMap, ExternalMapReference};

use thiserror::Error;

/// Errors raised while producing the local brain-map artifact.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error writing the artifact.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for federation operations.
pub type Result<T> = std::result::Result<T, Error>;
