//! Graph assembly: one rebuild cycle's worth of resolution and inversion.
//!
//! The assembly runs in strict phases. Every note registers its spellings
//! in the name resolution table before any cross-reference is resolved, so
//! a note can reference another by title regardless of scan order. Stubs
//! are synthesized during resolution, exactly once per unknown name. The
//! backlink map is then inverted into per-node inbound sets, previews are
//! linkified and rendered, and federation entries are merged in.
//!
//! All intermediate maps are locals of this function; a second rebuild can
//! never observe or corrupt a first.

use crate::sources::SlugFn;
use brainweave_core::{
    slug, BrainConfig, BrainNode, ExternalInbound, ExternalOutbound, InboundPreview,
    NameResolutionTable, NoteSource, OrderedSet, ParsedNote,
};
use brainweave_federation::ExternalBrainMap;
use brainweave_parser::{
    extract_references, frontmatter, render_html, rewrite_links, ExtractOptions,
    ExtractedReferences, RewriteOptions, SpanTree,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Assemble the full bidirectional graph for one rebuild cycle.
///
/// `external_maps` holds the most recent successful fetch per federation
/// source; references into sites absent from it are silently omitted.
pub fn assemble(
    sources: &[NoteSource],
    external_maps: &BTreeMap<String, ExternalBrainMap>,
    config: &BrainConfig,
    slugger: Option<&SlugFn>,
) -> Vec<BrainNode> {
    let extract_options = ExtractOptions {
        linkify_hashtags: config.linkify_hashtags,
    };
    let rewrite_options = RewriteOptions {
        linkify_hashtags: config.linkify_hashtags,
        hide_double_brackets: config.hide_double_brackets,
    };

    // Phase 1: parse every note and register all of its spellings before
    // any reference is resolved.
    let mut notes: Vec<ParsedNote> = Vec::with_capacity(sources.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut table = NameResolutionTable::new();
    let mut all_references: Vec<(String, ExtractedReferences)> = Vec::new();

    for source in sources {
        let (fm, body) = frontmatter::parse(&source.slug, &source.raw);
        let tree = SpanTree::parse(&body);
        let references = extract_references(&body, &tree, extract_options);

        let note = ParsedNote {
            slug: source.slug.clone(),
            title: fm.title.clone().unwrap_or_else(|| source.slug.clone()),
            aliases: fm.aliases.clone(),
            frontmatter: fm,
            body,
            raw: source.raw.clone(),
            path: Some(source.path.clone()),
        };

        table.register_note(&note);

        if let Some(&existing) = index.get(&note.slug) {
            warn!(slug = %note.slug, "two files share a slug; later file wins");
            all_references[existing] = (note.slug.clone(), references);
            notes[existing] = note;
        } else {
            index.insert(note.slug.clone(), notes.len());
            all_references.push((note.slug.clone(), references));
            notes.push(note);
        }
    }

    // Phase 2: resolve references, synthesizing stubs for unknown names and
    // accumulating the backlink map and the external link table.
    let mut backlinks: HashMap<String, Vec<(String, String)>> = HashMap::new();
    let mut external_link_map: HashMap<String, String> = HashMap::new();

    for (source_slug, references) in &all_references {
        for reference in &references.internal {
            let lowered = reference.text.to_lowercase();

            if table.resolve(&lowered).is_none() {
                let stub_slug = match slugger {
                    Some(custom) => custom(&reference.text),
                    None => slug::generate(&lowered),
                };
                // The slugified spelling may already belong to a note even
                // when the raw spelling does not.
                if table.resolve(&stub_slug).is_none() {
                    debug!(slug = %stub_slug, referenced_as = %reference.text, "synthesizing stub note");
                    table.register(&stub_slug, &stub_slug);
                    index.insert(stub_slug.clone(), notes.len());
                    notes.push(ParsedNote::stub(&stub_slug));
                }
                table.register(&lowered, &stub_slug);
            }

            let Some(target) = table.resolve(&lowered).map(String::from) else {
                continue;
            };
            backlinks
                .entry(target)
                .or_default()
                .push((source_slug.clone(), reference.preview_markdown.clone()));
        }

        for reference in &references.external {
            let Some(peer) = external_maps.get(&reference.site) else {
                continue;
            };
            if let Some(url) = peer.resolve_page(&reference.page) {
                external_link_map.insert(reference.text.to_lowercase(), url);
            }
        }
    }

    // Phase 3: collect inbound entries from peers' maps addressed at this
    // instance.
    let mut external_inbound: HashMap<String, Vec<ExternalInbound>> = HashMap::new();
    for (site_name, peer) in external_maps {
        for entry in &peer.external_references {
            if entry.target_site != config.brain_base_url {
                continue;
            }
            external_inbound
                .entry(entry.target_page.clone())
                .or_default()
                .push(ExternalInbound {
                    site_name: site_name.clone(),
                    source_page: entry.source_page.clone(),
                    source_url: peer.page_url(&entry.source_page),
                    preview_html: entry.preview_html.clone(),
                });
        }
    }

    // Phase 4: build the immutable nodes.
    let references_by_slug: HashMap<&str, &ExtractedReferences> = all_references
        .iter()
        .map(|(slug, refs)| (slug.as_str(), refs))
        .collect();
    let no_references = ExtractedReferences::default();

    let linkify = |text: &str| {
        rewrite_links(text, &table, &external_link_map, &config.root_path, rewrite_options)
    };

    let mut nodes = Vec::with_capacity(notes.len());
    for note in &notes {
        let references = references_by_slug
            .get(note.slug.as_str())
            .copied()
            .unwrap_or(&no_references);

        let outbound: OrderedSet<String> = references
            .internal
            .iter()
            .filter_map(|r| table.resolve(&r.text.to_lowercase()).map(String::from))
            .collect();

        let inbound_entries = backlinks.get(&note.slug).cloned().unwrap_or_default();
        let inbound: OrderedSet<String> =
            inbound_entries.iter().map(|(source, _)| source.clone()).collect();
        let inbound_previews = inbound_entries
            .iter()
            .map(|(source, preview_markdown)| {
                let linkified = linkify(preview_markdown);
                let preview_html = render_html(&linkified);
                InboundPreview {
                    source: source.clone(),
                    preview_markdown: linkified,
                    preview_html,
                }
            })
            .collect();

        let external_outbound = references
            .external
            .iter()
            .filter_map(|r| {
                let peer = external_maps.get(&r.site)?;
                let linkified = linkify(&r.preview_markdown);
                Some(ExternalOutbound {
                    target_site: peer.root_domain.clone(),
                    target_page: r.page.clone(),
                    preview_html: render_html(&linkified),
                })
            })
            .collect();

        let node = BrainNode {
            slug: note.slug.clone(),
            title: note.title.clone(),
            aliases: note.aliases.clone(),
            content: linkify(&note.body),
            outbound_references: outbound.into_vec(),
            inbound_references: inbound.into_vec(),
            inbound_reference_previews: inbound_previews,
            external_inbound_references: external_inbound.remove(&note.slug).unwrap_or_default(),
            external_outbound_references: external_outbound,
            content_digest: String::new(),
        }
        .sealed();
        nodes.push(node);
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainweave_federation::ExternalMapReference;
    use std::path::PathBuf;

    fn source(slug: &str, raw: &str) -> NoteSource {
        NoteSource {
            slug: slug.to_string(),
            path: PathBuf::from(format!("{slug}.md")),
            raw: raw.to_string(),
        }
    }

    fn assemble_simple(sources: &[NoteSource]) -> Vec<BrainNode> {
        assemble(sources, &BTreeMap::new(), &BrainConfig::default(), None)
    }

    fn find<'a>(nodes: &'a [BrainNode], slug: &str) -> &'a BrainNode {
        nodes
            .iter()
            .find(|n| n.slug == slug)
            .unwrap_or_else(|| panic!("node {slug} missing"))
    }

    #[test]
    fn graph_is_symmetric() {
        let nodes = assemble_simple(&[
            source("a", "Points at [[b]].\n"),
            source("b", "No links here.\n"),
        ]);

        assert!(find(&nodes, "a").outbound_references.contains(&"b".to_string()));
        assert!(find(&nodes, "b").inbound_references.contains(&"a".to_string()));
    }

    #[test]
    fn resolves_by_title_defined_later_in_scan_order() {
        let nodes = assemble_simple(&[
            source("a", "See [[The Big Book]].\n"),
            source("zz", "---\ntitle: The Big Book\n---\nContent.\n"),
        ]);

        assert_eq!(find(&nodes, "a").outbound_references, vec!["zz"]);
        assert_eq!(find(&nodes, "zz").inbound_references, vec!["a"]);
    }

    #[test]
    fn resolves_by_alias() {
        let nodes = assemble_simple(&[
            source("books", "---\naliases: [reading]\n---\nStuff.\n"),
            source("a", "See [[Reading]].\n"),
        ]);
        assert_eq!(find(&nodes, "a").outbound_references, vec!["books"]);
    }

    #[test]
    fn unknown_name_synthesizes_exactly_one_stub() {
        let nodes = assemble_simple(&[
            source("a", "On [[Missing Topic]].\n"),
            source("b", "Also [[missing topic]].\n"),
        ]);

        assert_eq!(nodes.len(), 3);
        let stub = find(&nodes, "missing-topic");
        assert_eq!(stub.title, "missing-topic");
        assert!(stub.content.is_empty());
        assert_eq!(stub.inbound_references, vec!["a", "b"]);
    }

    #[test]
    fn stub_is_not_recreated_when_slugified_form_exists() {
        let nodes = assemble_simple(&[
            source("missing-topic", "The real note.\n"),
            source("a", "On [[Missing Topic]].\n"),
        ]);

        assert_eq!(nodes.len(), 2);
        assert_eq!(find(&nodes, "a").outbound_references, vec!["missing-topic"]);
    }

    #[test]
    fn outbound_deduplicates_preserving_first_occurrence() {
        let nodes = assemble_simple(&[source(
            "a",
            "First [[b]], then [[c]], then [[b]] again.\n",
        )]);
        assert_eq!(find(&nodes, "a").outbound_references, vec!["b", "c"]);
    }

    #[test]
    fn duplicate_mentions_keep_every_preview_but_one_inbound_slug() {
        let nodes = assemble_simple(&[source(
            "a",
            "One [[b]] mention.\n\nAnother [[b]] mention.\n",
        )]);

        let b = find(&nodes, "b");
        assert_eq!(b.inbound_references, vec!["a"]);
        assert_eq!(b.inbound_reference_previews.len(), 2);
        assert!(b.inbound_reference_previews[0].preview_markdown.contains("One"));
        assert!(b.inbound_reference_previews[1].preview_markdown.contains("Another"));
    }

    #[test]
    fn previews_are_linkified_and_rendered() {
        let nodes = assemble_simple(&[
            source("a", "Linking [[b]] here.\n"),
            source("b", "x\n"),
        ]);

        let preview = &find(&nodes, "b").inbound_reference_previews[0];
        assert_eq!(preview.source, "a");
        assert_eq!(preview.preview_markdown, "Linking [[[b]]](brain/b) here.");
        assert!(preview.preview_html.contains("<a href=\"brain/b\">"));
    }

    #[test]
    fn note_content_is_linkified() {
        let nodes = assemble_simple(&[source("a", "Go to [[b]].\n"), source("b", "x\n")]);
        assert!(find(&nodes, "a").content.contains("[[[b]]](brain/b)"));
    }

    fn peer_map() -> BTreeMap<String, ExternalBrainMap> {
        let mut pages = BTreeMap::new();
        pages.insert("books".to_string(), vec!["books".to_string(), "library".to_string()]);
        let mut maps = BTreeMap::new();
        maps.insert(
            "othersite".to_string(),
            ExternalBrainMap {
                root_domain: "https://other.example".to_string(),
                pages,
                external_references: vec![ExternalMapReference {
                    target_site: "https://mine.example".to_string(),
                    target_page: "a".to_string(),
                    source_page: "books".to_string(),
                    preview_html: "<p>from books</p>".to_string(),
                }],
            },
        );
        maps
    }

    #[test]
    fn external_outbound_resolves_through_peer_aliases() {
        let config = BrainConfig {
            brain_base_url: "https://mine.example".to_string(),
            ..BrainConfig::default()
        };
        let nodes = assemble(
            &[source("a", "See [[othersite/library]].\n")],
            &peer_map(),
            &config,
            None,
        );

        let a = find(&nodes, "a");
        assert_eq!(a.external_outbound_references.len(), 1);
        let entry = &a.external_outbound_references[0];
        assert_eq!(entry.target_site, "https://other.example");
        assert_eq!(entry.target_page, "library");
        // The marker itself linkifies to the resolved absolute URL.
        assert!(a.content.contains("(https://other.example/books)"));
    }

    #[test]
    fn external_inbound_entries_attach_to_the_addressed_node() {
        let config = BrainConfig {
            brain_base_url: "https://mine.example".to_string(),
            ..BrainConfig::default()
        };
        let nodes = assemble(&[source("a", "content\n")], &peer_map(), &config, None);

        let a = find(&nodes, "a");
        assert_eq!(a.external_inbound_references.len(), 1);
        let entry = &a.external_inbound_references[0];
        assert_eq!(entry.site_name, "othersite");
        assert_eq!(entry.source_page, "books");
        assert_eq!(entry.source_url, "https://other.example/books");
    }

    #[test]
    fn peer_entries_for_other_instances_are_ignored() {
        let config = BrainConfig {
            brain_base_url: "https://unrelated.example".to_string(),
            ..BrainConfig::default()
        };
        let nodes = assemble(&[source("a", "content\n")], &peer_map(), &config, None);
        assert!(find(&nodes, "a").external_inbound_references.is_empty());
    }

    #[test]
    fn unknown_site_reference_is_dropped_not_internal() {
        let nodes = assemble_simple(&[source("a", "See [[nowhere/page]].\n")]);

        let a = find(&nodes, "a");
        assert!(a.outbound_references.is_empty());
        assert!(a.external_outbound_references.is_empty());
        // The marker degrades to literal text.
        assert!(a.content.contains("[[nowhere/page]]"));
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn hashtags_resolve_when_enabled() {
        let config = BrainConfig {
            linkify_hashtags: true,
            ..BrainConfig::default()
        };
        let nodes = assemble(
            &[source("a", "Tagged #books today.\n"), source("books", "x\n")],
            &BTreeMap::new(),
            &config,
            None,
        );

        assert_eq!(find(&nodes, "a").outbound_references, vec!["books"]);
        assert!(find(&nodes, "a").content.contains("[#books](/brain/books)"));
    }

    #[test]
    fn custom_slugger_names_stubs() {
        let custom: Box<SlugFn> = Box::new(|text| format!("c-{}", text.to_lowercase().replace(' ', "-")));
        let nodes = assemble(
            &[source("a", "On [[New Topic]].\n")],
            &BTreeMap::new(),
            &BrainConfig::default(),
            Some(custom.as_ref()),
        );
        assert!(nodes.iter().any(|n| n.slug == "c-new-topic"));
    }

    #[test]
    fn nodes_carry_fingerprints() {
        let nodes = assemble_simple(&[source("a", "text [[b]]\n")]);
        for node in &nodes {
            assert!(!node.content_digest.is_empty());
            assert_eq!(node.content_digest, node.compute_digest());
        }
    }
}
