//! Generation of this instance's published brain map.

use crate::map::{ExternalBrainMap, ExternalMapReference};
use crate::Result;
use brainweave_core::BrainNode;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Build the brain map describing the locally assembled graph.
///
/// Each page lists every spelling it answers to: its slug, its lowercased
/// title when distinct from the slug, and its aliases. External outbound
/// references are flattened across all nodes.
pub fn build_brain_map(base_url: &str, nodes: &[BrainNode]) -> ExternalBrainMap {
    let mut pages = BTreeMap::new();
    let mut external_references = Vec::new();

    for node in nodes {
        let mut spellings = vec![node.slug.clone()];
        let lowered_title = node.title.to_lowercase();
        if lowered_title != node.slug {
            spellings.push(lowered_title);
        }
        spellings.extend(node.aliases.iter().cloned());
        pages.insert(node.slug.clone(), spellings);

        for entry in &node.external_outbound_references {
            external_references.push(ExternalMapReference {
                target_site: entry.target_site.clone(),
                target_page: entry.target_page.clone(),
                source_page: node.slug.clone(),
                preview_html: entry.preview_html.clone(),
            });
        }
    }

    ExternalBrainMap {
        root_domain: base_url.to_string(),
        pages,
        external_references,
    }
}

/// Serialize a brain map to its configured path, creating parent
/// directories as needed.
pub fn write_brain_map(path: &Path, map: &ExternalBrainMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec(map)?)?;
    info!(path = %path.display(), pages = map.pages.len(), "wrote brain map artifact");
    Ok(())
}
