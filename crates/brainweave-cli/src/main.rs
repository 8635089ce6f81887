use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use brainweave_cli::{
    cli::{Cli, Commands},
    config::CliConfig,
    json_sink::JsonPageSink,
};
use brainweave_federation::fetcher::FederationClient;
use brainweave_federation::artifact::build_brain_map;
use brainweave_pipeline::{NullSink, Rebuilder};
use brainweave_watch::{run_watch, RebuildDriver};
use clap::Parser;
use tracing::info;

/// Adapts the pipeline's rebuilder to the watch loop's driver seam.
struct PipelineDriver {
    rebuilder: Rebuilder,
}

#[async_trait]
impl RebuildDriver for PipelineDriver {
    async fn rebuild(&self, refetch: bool) -> Result<usize> {
        let nodes = self.rebuilder.rebuild(refetch).await?;
        Ok(nodes.len())
    }
}

fn make_rebuilder(config: &CliConfig, output: Option<PathBuf>) -> Rebuilder {
    let output_directory = output.unwrap_or_else(|| config.output_directory.clone());
    let sink = Arc::new(JsonPageSink::new(
        output_directory,
        config.brain.root_note.clone(),
    ));
    Rebuilder::new(config.brain.clone(), sink).with_federation_client(FederationClient::new())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = format!(
        "brainweave_cli={level},brainweave_pipeline={level},brainweave_watch={level},brainweave_federation={level},brainweave_parser={level},brainweave_core={level}",
        level = log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let config = CliConfig::load(cli.config)?;

    match cli.command {
        Commands::Build { output } => {
            let rebuilder = make_rebuilder(&config, output);
            let nodes = rebuilder.rebuild(true).await?;
            info!(notes = nodes.len(), "build complete");
        }
        Commands::Watch { output } => {
            let rebuilder = make_rebuilder(&config, output);
            let driver = Arc::new(PipelineDriver { rebuilder });
            run_watch(driver, &config.brain).await?;
        }
        Commands::Map => {
            // Assemble without publishing pages, then print this garden's
            // brain map for peers to consume.
            let rebuilder = Rebuilder::new(config.brain.clone(), Arc::new(NullSink))
                .with_federation_client(FederationClient::new());
            let nodes = rebuilder.rebuild(true).await?;
            let map = build_brain_map(&config.brain.brain_base_url, &nodes);
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
    }

    Ok(())
}
