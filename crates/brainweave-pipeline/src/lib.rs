//! # Brainweave Rebuild Pipeline
//!
//! Orchestrates a full graph rebuild: load note sources from disk, populate
//! the name resolution table, extract and resolve references, synthesize
//! stubs, assemble the bidirectional graph, and hand the nodes to the page
//! sink. Every rebuild owns its own table and graph; nothing here is
//! process-wide state.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod assemble;
pub mod rebuild;
pub mod sink;
pub mod sources;

pub use assemble::assemble;
pub use rebuild::Rebuilder;
pub use sink::{NullSink, PageSink};
pub use sources::{load_note_sources, SlugFn};

use thiserror::Error;

/// Errors raised by the rebuild pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error reading the notes directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid exclusion pattern.
    #[error("Pattern error: {0}")]
    Pattern(#[from] globset::Error),

    /// Brain map artifact error.
    #[error(transparent)]
    Federation(#[from] brainweave_federation::Error),

    /// Page sink failure.
    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
