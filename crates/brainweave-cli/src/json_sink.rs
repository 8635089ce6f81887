//! Publishes each rebuild as one JSON document per note.

use std::path::PathBuf;

use async_trait::async_trait;
use brainweave_core::BrainNode;
use brainweave_pipeline::{Error, PageSink, Result};
use tracing::debug;

/// Writes `<slug>.json` per node into the output directory, plus an
/// `index.json` copy of the root note so the directory is browsable
/// without knowing the root slug.
pub struct JsonPageSink {
    output_directory: PathBuf,
    root_note: String,
}

impl JsonPageSink {
    pub fn new(output_directory: PathBuf, root_note: impl Into<String>) -> Self {
        Self {
            output_directory,
            root_note: root_note.into(),
        }
    }

    fn write_node(&self, file_name: &str, node: &BrainNode) -> Result<()> {
        let path = self.output_directory.join(file_name);
        let body = serde_json::to_vec_pretty(node)
            .map_err(|err| Error::Sink(format!("serializing {}: {err}", node.slug)))?;
        std::fs::write(&path, body)?;
        debug!(path = %path.display(), "wrote page");
        Ok(())
    }
}

#[async_trait]
impl PageSink for JsonPageSink {
    async fn publish(&self, nodes: &[BrainNode]) -> Result<()> {
        std::fs::create_dir_all(&self.output_directory)?;
        for node in nodes {
            self.write_node(&format!("{}.json", node.slug), node)?;
            if node.slug == self.root_note {
                self.write_node("index.json", node)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainweave_core::BrainNode;

    fn node(slug: &str) -> BrainNode {
        BrainNode {
            slug: slug.to_string(),
            title: slug.to_string(),
            ..BrainNode::default()
        }
    }

    #[tokio::test]
    async fn writes_a_page_per_node_and_an_index_alias() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonPageSink::new(dir.path().to_path_buf(), "brain");

        sink.publish(&[node("brain"), node("books")]).await.unwrap();

        assert!(dir.path().join("brain.json").exists());
        assert!(dir.path().join("books.json").exists());

        let index = std::fs::read_to_string(dir.path().join("index.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&index).unwrap();
        assert_eq!(parsed["slug"], "brain");
    }

    #[tokio::test]
    async fn creates_the_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public").join("brain");
        let sink = JsonPageSink::new(nested.clone(), "brain");

        sink.publish(&[node("solo")]).await.unwrap();
        assert!(nested.join("solo.json").exists());
    }
}
