//! Configuration schema for a brainweave instance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Options recognized by the rebuild pipeline, federation client, and
/// scheduler. Loadable from a TOML file; every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    /// Directory containing the note files. Created if missing.
    pub notes_directory: PathBuf,
    /// File extensions that count as notes.
    pub note_extensions: Vec<String>,
    /// Glob patterns for filenames to skip.
    pub exclude: Vec<String>,
    /// URL prefix internal links are rewritten under.
    pub root_path: String,
    /// Slug of the note aliased at the root path itself.
    pub root_note: String,
    /// Treat `#word` hashtags as references.
    pub linkify_hashtags: bool,
    /// Render `[[name]]` links with the brackets stripped from the label.
    pub hide_double_brackets: bool,
    /// Federated peers: map name to the URL of its published brain map.
    pub external_maps: BTreeMap<String, String>,
    /// Public base URL of this instance; peers address it by this value.
    pub brain_base_url: String,
    /// Write this instance's brain map artifact after each rebuild.
    pub generate_brain_map: bool,
    /// Where the brain map artifact is written.
    pub brain_map_path: PathBuf,
    /// Seconds between periodic federation refreshes; `None` disables them.
    pub refresh_interval_secs: Option<u64>,
    /// Quiet period after a file event before a rebuild runs.
    pub debounce_millis: u64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            notes_directory: PathBuf::from("content/brain"),
            note_extensions: vec![".md".to_string(), ".mdx".to_string()],
            exclude: Vec::new(),
            root_path: "brain/".to_string(),
            root_note: "brain".to_string(),
            linkify_hashtags: false,
            hide_double_brackets: false,
            external_maps: BTreeMap::new(),
            brain_base_url: String::new(),
            generate_brain_map: false,
            brain_map_path: PathBuf::from("static/brainmap.json"),
            refresh_interval_secs: None,
            debounce_millis: 300,
        }
    }
}

impl BrainConfig {
    /// Debounce interval as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_millis)
    }

    /// Periodic refresh interval, if enabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs.map(Duration::from_secs)
    }

    /// Whether a filename matches one of the configured note extensions.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        self.note_extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}
