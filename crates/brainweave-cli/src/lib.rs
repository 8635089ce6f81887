//! Command-line frontend: argument parsing, TOML configuration, and the
//! JSON page sink the binary publishes through.

pub mod cli;
pub mod config;
pub mod json_sink;

pub use cli::{Cli, Commands};
pub use config::CliConfig;
pub use json_sink::JsonPageSink;
