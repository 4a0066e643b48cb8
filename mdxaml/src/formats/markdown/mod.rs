//! Markdown input format
//!
//!     Markdown is the only inbound format. Parsing is delegated to `comrak`; this module only
//!     adapts the comrak AST to the input tree in [`crate::ast`], which the renderer then turns
//!     into XAML. There is no Markdown serializer: the tree is never written back.
//!
//! Element Mapping
//!
//!     | Markdown                   | Input tree                          |
//!     |----------------------------|-------------------------------------|
//!     | Paragraph, Heading         | Block::Paragraph, Block::Heading    |
//!     | Fenced / indented code     | Block::CodeBlock (one entry a line) |
//!     | List, task list item       | Block::List, Inline::TaskMarker     |
//!     | Block quote                | Block::Quote                        |
//!     | Thematic break             | Block::ThematicBreak                |
//!     | Pipe table                 | Block::Table (alignments kept)      |
//!     | HTML block / inline HTML   | Block::Html / Inline::Raw           |
//!     | `*a*` `**a**` `~~a~~` `^a^`| Inline::Emphasis ('*',1) ('*',2) ('~',2) ('^',2) |
//!     | `<https://…>`, bare email  | Inline::Autolink                    |
//!     | Link, image                | Inline::Link                        |
//!
//!     Front matter, footnotes and anything else comrak knows but the tree does not are dropped.

mod parser;

pub use parser::parse_markdown;

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::Format;

/// Comrak extensions enabled while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownExtensions {
    pub tables: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
    pub superscript: bool,
    pub front_matter: bool,
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            superscript: false,
            front_matter: true,
        }
    }
}

/// Format implementation for Markdown
#[derive(Debug, Default, Clone)]
pub struct MarkdownFormat {
    extensions: MarkdownExtensions,
}

impl MarkdownFormat {
    pub fn new(extensions: MarkdownExtensions) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &MarkdownExtensions {
        &self.extensions
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark Markdown with GFM extensions"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        parse_markdown(source, &self.extensions)
    }
}
