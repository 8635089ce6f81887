//! The graph consumption seam: where finished nodes leave the pipeline.

use crate::Result;
use async_trait::async_trait;
use brainweave_core::BrainNode;

/// Receiver for the full node set produced by each rebuild.
///
/// Implementations turn nodes into addressable pages (or anything else);
/// the pipeline only guarantees it hands over every node of the cycle,
/// stubs included, exactly once per rebuild.
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Publish one rebuild cycle's nodes.
    async fn publish(&self, nodes: &[BrainNode]) -> Result<()>;
}

/// Sink that discards everything. Used for inspection commands and tests.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl PageSink for NullSink {
    async fn publish(&self, _nodes: &[BrainNode]) -> Result<()> {
        Ok(())
    }
}
