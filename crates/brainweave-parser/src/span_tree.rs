//! Block-level span tree over a note body.
//!
//! Built from the pulldown-cmark event stream with byte offsets, the tree
//! records every block container and its source span. It answers two
//! questions for reference extraction: which structural block encloses a
//! marker offset (for preview derivation), and whether an offset falls
//! inside code (so code samples never produce references).
//!
//! Preview derivation walks from the deepest enclosing block up a fixed
//! number of ancestors (2) without ever reaching the document root, which
//! captures the paragraph or list item around a reference without spilling
//! into sibling content. The preview text is the ancestor's raw source
//! slice, so nothing is re-escaped on the way out.

use pulldown_cmark::{Event, Options, Parser, Tag};
use std::ops::Range;

/// How many structural ancestors a preview is widened by.
const PREVIEW_ANCESTOR_DEPTH: usize = 2;

/// Structural block categories tracked by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Whole document.
    Root,
    /// Paragraph.
    Paragraph,
    /// Heading of any level.
    Heading,
    /// Block quote.
    BlockQuote,
    /// Fenced or indented code block.
    CodeBlock,
    /// Ordered or unordered list.
    List,
    /// Single list item.
    Item,
    /// Table.
    Table,
    /// Footnote definition.
    FootnoteDefinition,
    /// Raw HTML block.
    HtmlBlock,
}

impl SpanKind {
    fn from_tag(tag: &Tag) -> Option<Self> {
        Some(match tag {
            Tag::Paragraph => Self::Paragraph,
            Tag::Heading { .. } => Self::Heading,
            Tag::BlockQuote(..) => Self::BlockQuote,
            Tag::CodeBlock(..) => Self::CodeBlock,
            Tag::List(..) => Self::List,
            Tag::Item => Self::Item,
            Tag::Table(..) => Self::Table,
            Tag::FootnoteDefinition(..) => Self::FootnoteDefinition,
            Tag::HtmlBlock => Self::HtmlBlock,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
struct SpanNode {
    kind: SpanKind,
    span: Range<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Arena-allocated block tree with byte spans into the source body.
#[derive(Debug, Clone)]
pub struct SpanTree {
    nodes: Vec<SpanNode>,
    code_spans: Vec<Range<usize>>,
}

impl SpanTree {
    /// Parse a note body into its block tree.
    ///
    /// Total: malformed markdown still yields a tree (pulldown-cmark treats
    /// everything as some block), and an empty body yields a bare root.
    pub fn parse(body: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);

        let mut nodes = vec![SpanNode {
            kind: SpanKind::Root,
            span: 0..body.len(),
            parent: None,
            children: Vec::new(),
        }];
        let mut code_spans = Vec::new();

        // Stack entries are None for inline containers we do not model;
        // every Start has a matching End so plain LIFO popping is safe.
        let mut stack: Vec<Option<usize>> = Vec::new();

        for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
            match event {
                Event::Start(tag) => match SpanKind::from_tag(&tag) {
                    Some(kind) => {
                        let parent = stack
                            .iter()
                            .rev()
                            .find_map(|entry| *entry)
                            .unwrap_or(0);
                        let id = nodes.len();
                        nodes.push(SpanNode {
                            kind,
                            span: range,
                            parent: Some(parent),
                            children: Vec::new(),
                        });
                        nodes[parent].children.push(id);
                        stack.push(Some(id));
                    }
                    None => stack.push(None),
                },
                Event::End(_) => {
                    stack.pop();
                }
                Event::Code(_) => code_spans.push(range),
                _ => {}
            }
        }

        Self { nodes, code_spans }
    }

    /// Id of the deepest block whose span contains the offset; 0 is root.
    fn deepest_at(&self, offset: usize) -> usize {
        let mut current = 0;
        loop {
            let next = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|&child| {
                    let span = &self.nodes[child].span;
                    span.start <= offset && offset < span.end
                });
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Whether the offset falls inside a code block or inline code span.
    pub fn in_code(&self, offset: usize) -> bool {
        let id = self.deepest_at(offset);
        if self.nodes[id].kind == SpanKind::CodeBlock {
            return true;
        }
        self.code_spans
            .iter()
            .any(|span| span.start <= offset && offset < span.end)
    }

    /// Source span of the preview context for a marker at the given offset:
    /// the deepest enclosing block widened by up to two ancestors, never
    /// widening onto the root itself (unless the offset sits in no block at
    /// all, in which case the whole body is the context).
    pub fn preview_span(&self, offset: usize) -> Range<usize> {
        let mut id = self.deepest_at(offset);
        if id == 0 {
            return self.nodes[0].span.clone();
        }
        for _ in 0..PREVIEW_ANCESTOR_DEPTH {
            match self.nodes[id].parent {
                Some(parent) if parent != 0 => id = parent,
                _ => break,
            }
        }
        self.nodes[id].span.clone()
    }

    /// Preview markdown for a marker at the given offset: the raw source
    /// slice of the widened context block. Slicing the source keeps literal
    /// text unescaped, so preview passages are never double-encoded.
    pub fn preview_markdown<'a>(&self, body: &'a str, offset: usize) -> &'a str {
        let span = self.preview_span(offset);
        body[span.start..span.end.min(body.len())].trim_end()
    }

    /// Kind of the deepest block containing the offset.
    pub fn kind_at(&self, offset: usize) -> SpanKind {
        self.nodes[self.deepest_at(offset)].kind
    }
}
