//! Markdown to HTML rendering for backlink previews.

use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML with the GFM-flavored pipeline used for every
/// preview snippet: tables, strikethrough, task lists, and footnotes.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut output = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut output, parser);
    output
}
