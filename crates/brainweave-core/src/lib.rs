//! # Brainweave Core
//!
//! Shared types for the brainweave note graph:
//! - Slug normalization and the name resolution table
//! - Parsed note and graph node models
//! - Insertion-ordered set used for reference deduplication
//! - Configuration schema shared by the pipeline, watcher, and CLI

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod graph;
pub mod note;
pub mod ordered_set;
pub mod resolver;
pub mod slug;

pub use config::BrainConfig;
pub use graph::{BrainNode, ExternalInbound, ExternalOutbound, InboundPreview};
pub use note::{Frontmatter, NoteSource, ParsedNote};
pub use ordered_set::OrderedSet;
pub use resolver::NameResolutionTable;
