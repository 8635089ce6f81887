//! End-to-end rebuild tests over a real notes directory.

use async_trait::async_trait;
use brainweave_core::{BrainConfig, BrainNode};
use brainweave_federation::FederationClient;
use brainweave_pipeline::{PageSink, Rebuilder};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Records every published node set.
#[derive(Default)]
struct RecordingSink {
    published: Mutex<Vec<Vec<BrainNode>>>,
}

#[async_trait]
impl PageSink for RecordingSink {
    async fn publish(&self, nodes: &[BrainNode]) -> brainweave_pipeline::Result<()> {
        self.published.lock().await.push(nodes.to_vec());
        Ok(())
    }
}

fn write_note(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn config_for(dir: &Path) -> BrainConfig {
    BrainConfig {
        notes_directory: dir.to_path_buf(),
        ..BrainConfig::default()
    }
}

#[tokio::test]
async fn rebuild_publishes_a_symmetric_graph() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "brain.md", "Welcome. See [[Books]] and [[Inbox]].\n");
    write_note(dir.path(), "books.md", "---\ntitle: Books\n---\nReading log.\n");

    let sink = Arc::new(RecordingSink::default());
    let rebuilder = Rebuilder::new(config_for(dir.path()), sink.clone());

    let nodes = rebuilder.rebuild(false).await.unwrap();

    // brain, books, and the synthesized inbox stub.
    assert_eq!(nodes.len(), 3);
    let brain = nodes.iter().find(|n| n.slug == "brain").unwrap();
    assert_eq!(brain.outbound_references, vec!["books", "inbox"]);

    let books = nodes.iter().find(|n| n.slug == "books").unwrap();
    assert_eq!(books.inbound_references, vec!["brain"]);
    assert_eq!(books.title, "Books");

    let inbox = nodes.iter().find(|n| n.slug == "inbox").unwrap();
    assert!(inbox.content.is_empty());
    assert_eq!(inbox.inbound_references, vec!["brain"]);

    assert_eq!(sink.published.lock().await.len(), 1);
}

#[tokio::test]
async fn repeated_rebuilds_reuse_the_federation_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "rootDomain": "https://peer.example",
            "pages": {"books": ["books"]},
            "externalReferences": []
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "a.md", "See [[peer/books]].\n");

    let mut config = config_for(dir.path());
    config.external_maps.insert("peer".to_string(), server.uri());

    let rebuilder = Rebuilder::new(config, Arc::new(RecordingSink::default()))
        .with_federation_client(FederationClient::with_timeout(Duration::from_secs(2)));

    // First rebuild fetches even without refetch; the second reuses the
    // cache; the third refetches explicitly.
    let nodes = rebuilder.rebuild(false).await.unwrap();
    assert!(nodes[0].content.contains("https://peer.example/books"));
    rebuilder.rebuild(false).await.unwrap();
    rebuilder.rebuild(true).await.unwrap();
}

#[tokio::test]
async fn brain_map_artifact_is_written_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes");
    std::fs::create_dir_all(&notes).unwrap();
    write_note(&notes, "books.md", "---\ntitle: Books\naliases: [library]\n---\nx\n");

    let map_path = dir.path().join("static/brainmap.json");
    let config = BrainConfig {
        notes_directory: notes,
        generate_brain_map: true,
        brain_map_path: map_path.clone(),
        brain_base_url: "https://mine.example".to_string(),
        ..BrainConfig::default()
    };

    Rebuilder::new(config, Arc::new(RecordingSink::default()))
        .rebuild(false)
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&map_path).unwrap();
    let map: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(map["rootDomain"], "https://mine.example");
    assert_eq!(map["pages"]["books"][0], "books");
    assert!(map["pages"]["books"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "library"));
}

#[tokio::test]
async fn federation_outage_degrades_to_a_local_graph() {
    let dir = tempfile::tempdir().unwrap();
    write_note(dir.path(), "a.md", "Local [[b]] and remote [[peer/books]].\n");

    let mut config = config_for(dir.path());
    config
        .external_maps
        .insert("peer".to_string(), "http://127.0.0.1:1/brainmap.json".to_string());

    let rebuilder = Rebuilder::new(config, Arc::new(RecordingSink::default()))
        .with_federation_client(FederationClient::with_timeout(Duration::from_millis(200)));

    let nodes = rebuilder.rebuild(false).await.unwrap();
    let a = nodes.iter().find(|n| n.slug == "a").unwrap();
    assert_eq!(a.outbound_references, vec!["b"]);
    // The remote marker degrades to literal text.
    assert!(a.content.contains("[[peer/books]]"));
}
