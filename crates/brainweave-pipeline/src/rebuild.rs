//! The rebuild orchestrator.
//!
//! Coordination only: loading, assembly, artifact generation, and
//! publishing live in their own modules; this type owns the seams (config,
//! optional custom slugger, federation client, page sink) and enforces the
//! single-rebuild-at-a-time discipline.

use crate::sink::PageSink;
use crate::sources::{load_note_sources, SlugFn};
use crate::{assemble, Result};
use brainweave_core::{BrainConfig, BrainNode};
use brainweave_federation::{build_brain_map, write_brain_map, ExternalBrainMap, FederationClient};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Runs full rebuilds of the note graph.
///
/// Owns the most recent federation fetch so file-event rebuilds reuse it;
/// only timer-triggered (and first) rebuilds go back to the network.
pub struct Rebuilder {
    config: BrainConfig,
    slugger: Option<Arc<SlugFn>>,
    federation: FederationClient,
    sink: Arc<dyn PageSink>,
    cached_maps: Mutex<Option<BTreeMap<String, ExternalBrainMap>>>,
    // At most one rebuild in flight; the table and in-progress graph are
    // owned exclusively by the holder.
    flight: Mutex<()>,
}

impl Rebuilder {
    /// Create a rebuilder publishing into the given sink.
    pub fn new(config: BrainConfig, sink: Arc<dyn PageSink>) -> Self {
        Self {
            config,
            slugger: None,
            federation: FederationClient::new(),
            sink,
            cached_maps: Mutex::new(None),
            flight: Mutex::new(()),
        }
    }

    /// Use a custom naming function instead of the slug normalizer.
    pub fn with_slugger(mut self, slugger: Arc<SlugFn>) -> Self {
        self.slugger = Some(slugger);
        self
    }

    /// Replace the federation client (custom timeout, tests).
    pub fn with_federation_client(mut self, federation: FederationClient) -> Self {
        self.federation = federation;
        self
    }

    /// The configuration this rebuilder runs under.
    pub fn config(&self) -> &BrainConfig {
        &self.config
    }

    /// Run one full rebuild: re-read all notes, rebuild the resolution
    /// table and references, reassemble the graph, and publish the nodes.
    ///
    /// `refetch` forces a fresh federation fetch; otherwise the previous
    /// fetch is reused (the very first rebuild always fetches).
    pub async fn rebuild(&self, refetch: bool) -> Result<Vec<BrainNode>> {
        let _flight = self.flight.lock().await;

        let maps = {
            let mut cached = self.cached_maps.lock().await;
            if refetch || cached.is_none() {
                *cached = Some(self.federation.fetch_all(&self.config.external_maps).await);
            }
            cached.clone().unwrap_or_default()
        };

        let sources = load_note_sources(&self.config, self.slugger.as_deref())?;
        let nodes = assemble(&sources, &maps, &self.config, self.slugger.as_deref());

        if self.config.generate_brain_map {
            let map = build_brain_map(&self.config.brain_base_url, &nodes);
            write_brain_map(&self.config.brain_map_path, &map)?;
        }

        self.sink.publish(&nodes).await?;
        info!(notes = nodes.len(), refetch, "rebuild complete");
        Ok(nodes)
    }
}
