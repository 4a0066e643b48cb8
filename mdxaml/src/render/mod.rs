//! Node renderers and the document driver
//!
//!     Rendering walks an [`ast::Document`](crate::ast::Document) depth first. Each node kind is
//!     handled by a plain function looked up by the node's kind tag in [`Renderers`]; handlers
//!     talk to the [`XamlWriter`] only. The table is built once (the built-in handlers plus any
//!     registered with [`Renderers::with_block`] / [`Renderers::with_inline`]) and is read-only
//!     while rendering, so it can be shared by any number of renders.
//!
//!     Every handler follows the same order: open the object, write the style and attribute
//!     members, open the content collection, render the children, close the collection, close
//!     the object.
//!
//!     Kinds without a handler fall back to rendering their children, so an unknown container
//!     loses its wrapper but not its text.
//!
//!     The module layout:
//!         blocks.rs       paragraphs, headings, code blocks, lists, quotes, thematic breaks
//!         inlines.rs      text, emphasis, code spans, line breaks, delimiters
//!         links.rs        hyperlinks, images, autolinks and url checks
//!         table.rs        tables
//!         task_list.rs    task list markers
//!         fragment.rs     raw markup passthrough

mod blocks;
mod fragment;
mod inlines;
pub mod links;
mod table;
mod task_list;

use crate::ast::{Block, Document, Inline};
use crate::error::RenderError;
use crate::styles::{ResourceKeyStore, StyleRole, StyleTable};
use crate::writer::XamlWriter;
use crate::xaml::{XamlSink, PRESENTATION_NAMESPACE, XAML_NAMESPACE};
use std::collections::HashMap;
use url::Url;

pub use fragment::replay_fragment;

/// How the lines of a code block are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// A literal newline inside the preserved run.
    #[default]
    Newline,
    /// A `LineBreak` object between runs.
    LineBreak,
}

/// What to do with raw markup (HTML blocks, inline HTML, entities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawMarkupPolicy {
    /// Parse the fragment and replay it as objects and members.
    Replay,
    /// Write the fragment as literal text.
    Text,
    /// Drop it.
    #[default]
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Base for relative link and image targets.
    pub base_uri: Option<Url>,
    pub code_line_join: LineJoin,
    pub raw_markup: RawMarkupPolicy,
    pub styles: StyleTable,
    pub resource_keys: ResourceKeyStore,
}

impl RenderOptions {
    pub fn with_base_uri(mut self, uri: &str) -> Result<Self, RenderError> {
        let parsed = Url::parse(uri).map_err(|e| RenderError::InvalidBaseUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RenderError::InvalidBaseUri {
                uri: uri.to_string(),
                reason: "cannot be used as a base".to_string(),
            });
        }
        self.base_uri = Some(parsed);
        Ok(self)
    }
}

pub type BlockHandler<S> = fn(&mut MarkdownRenderer<'_, S>, &Block) -> Result<(), RenderError>;
pub type InlineHandler<S> = fn(&mut MarkdownRenderer<'_, S>, &Inline) -> Result<(), RenderError>;

/// Kind tag to handler table.
pub struct Renderers<S: XamlSink> {
    blocks: HashMap<String, BlockHandler<S>>,
    inlines: HashMap<String, InlineHandler<S>>,
}

impl<S: XamlSink> Renderers<S> {
    /// A table with no handlers; every node falls back to its children.
    pub fn empty() -> Self {
        Renderers {
            blocks: HashMap::new(),
            inlines: HashMap::new(),
        }
    }

    pub fn with_block(mut self, kind: impl Into<String>, handler: BlockHandler<S>) -> Self {
        self.blocks.insert(kind.into(), handler);
        self
    }

    pub fn with_inline(mut self, kind: impl Into<String>, handler: InlineHandler<S>) -> Self {
        self.inlines.insert(kind.into(), handler);
        self
    }
}

impl<S: XamlSink> Default for Renderers<S> {
    fn default() -> Self {
        Renderers::empty()
            .with_block("paragraph", blocks::paragraph)
            .with_block("heading", blocks::heading)
            .with_block("code_block", blocks::code_block)
            .with_block("list", blocks::list)
            .with_block("quote", blocks::quote)
            .with_block("thematic_break", blocks::thematic_break)
            .with_block("table", table::table)
            .with_block("html", fragment::html_block)
            .with_inline("text", inlines::text)
            .with_inline("line_break", inlines::line_break)
            .with_inline("code", inlines::code)
            .with_inline("emphasis", inlines::emphasis)
            .with_inline("delimiter", inlines::delimiter)
            .with_inline("link", links::link)
            .with_inline("autolink", links::autolink)
            .with_inline("raw", fragment::raw_inline)
            .with_inline("task_list", task_list::task_marker)
    }
}

/// Per-render state: the writer plus read-only access to the handler table and options.
pub struct MarkdownRenderer<'r, S: XamlSink> {
    writer: XamlWriter<S>,
    renderers: &'r Renderers<S>,
    options: &'r RenderOptions,
}

impl<'r, S: XamlSink> MarkdownRenderer<'r, S> {
    pub fn new(sink: S, renderers: &'r Renderers<S>, options: &'r RenderOptions) -> Self {
        let writer = XamlWriter::with_styles(
            sink,
            options.styles.clone(),
            options.resource_keys.clone(),
        );
        MarkdownRenderer {
            writer,
            renderers,
            options,
        }
    }

    pub fn writer(&mut self) -> &mut XamlWriter<S> {
        &mut self.writer
    }

    pub fn options(&self) -> &RenderOptions {
        self.options
    }

    /// Render a whole document: namespaces, the `FlowDocument` root with its style, then every
    /// block in order.
    pub fn render(mut self, doc: &Document) -> Result<S::Output, RenderError> {
        let keys = &self.options.resource_keys;
        self.writer.write_namespace("", PRESENTATION_NAMESPACE)?;
        self.writer.write_namespace("x", XAML_NAMESPACE)?;
        self.writer
            .write_namespace(&keys.prefix, &keys.namespace_uri())?;

        self.writer.start_object("FlowDocument")?;
        self.writer.write_resource_member(None, StyleRole::Document)?;
        self.write_items_blocks(&doc.blocks)?;
        self.writer.end_object()?;

        tracing::debug!(blocks = doc.blocks.len(), "rendered document");
        self.writer.finish()
    }

    pub fn render_block(&mut self, block: &Block) -> Result<(), RenderError> {
        match self.renderers.blocks.get(block.kind()).copied() {
            Some(handler) => handler(self, block),
            None => self.fallback_block(block),
        }
    }

    pub fn render_inline(&mut self, inline: &Inline) -> Result<(), RenderError> {
        match self.renderers.inlines.get(inline.kind()).copied() {
            Some(handler) => handler(self, inline),
            None => self.fallback_inline(inline),
        }
    }

    /// Render `blocks` into the current object's content collection.
    pub fn write_items_blocks(&mut self, blocks: &[Block]) -> Result<(), RenderError> {
        self.writer.start_content_items(false)?;
        for block in blocks {
            self.render_block(block)?;
        }
        self.writer.end_items()
    }

    pub fn write_items_inlines(
        &mut self,
        inlines: &[Inline],
        preserve_whitespace: bool,
    ) -> Result<(), RenderError> {
        self.writer.start_content_items(preserve_whitespace)?;
        for inline in inlines {
            self.render_inline(inline)?;
        }
        self.writer.end_items()
    }

    /// Render source lines verbatim, joined per [`RenderOptions::code_line_join`].
    pub fn write_items_lines(&mut self, lines: &[String]) -> Result<(), RenderError> {
        self.writer.start_content_items(true)?;
        for (index, line) in lines.iter().enumerate() {
            if index > 0 {
                match self.options.code_line_join {
                    LineJoin::Newline => self.writer.write_char('\n')?,
                    LineJoin::LineBreak => self.writer.write_line_break()?,
                }
            }
            self.writer.write_text(line)?;
        }
        self.writer.end_items()
    }

    pub fn write_items_text(
        &mut self,
        text: &str,
        preserve_whitespace: bool,
    ) -> Result<(), RenderError> {
        self.writer.start_content_items(preserve_whitespace)?;
        self.writer.write_text(text)?;
        self.writer.end_items()
    }

    fn fallback_block(&mut self, block: &Block) -> Result<(), RenderError> {
        tracing::debug!(kind = block.kind(), "no block handler, rendering children");
        match block {
            Block::Custom(custom) => {
                for child in &custom.blocks {
                    self.render_block(child)?;
                }
                self.wrap_inlines(&custom.inlines)
            }
            Block::Paragraph(p) => self.wrap_inlines(&p.inlines),
            Block::Heading(h) => self.wrap_inlines(&h.inlines),
            Block::Quote(q) => q.blocks.iter().try_for_each(|b| self.render_block(b)),
            Block::List(list) => list
                .items
                .iter()
                .flat_map(|item| &item.blocks)
                .try_for_each(|b| self.render_block(b)),
            Block::CodeBlock(_) | Block::ThematicBreak | Block::Table(_) | Block::Html(_) => {
                Ok(())
            }
        }
    }

    /// Inline children of a block without a handler still need a paragraph to live in.
    fn wrap_inlines(&mut self, inlines: &[Inline]) -> Result<(), RenderError> {
        if inlines.is_empty() {
            return Ok(());
        }
        self.writer.start_object("Paragraph")?;
        self.write_items_inlines(inlines, false)?;
        self.writer.end_object()
    }

    fn fallback_inline(&mut self, inline: &Inline) -> Result<(), RenderError> {
        tracing::debug!(kind = inline.kind(), "no inline handler, rendering children");
        let children = match inline {
            Inline::Custom(custom) => &custom.children,
            Inline::Emphasis(emphasis) => &emphasis.children,
            Inline::Delimiter(delimiter) => &delimiter.children,
            Inline::Link(link) => &link.children,
            Inline::Text(text) => return self.writer.write_text(text),
            Inline::Code(code) => return self.writer.write_text(code),
            _ => return Ok(()),
        };
        children.iter().try_for_each(|child| self.render_inline(child))
    }
}

pub(crate) fn mismatch(kind: &str) -> RenderError {
    RenderError::HandlerMismatch {
        kind: kind.to_string(),
    }
}

/// Render a document into `sink` with the built-in handlers.
pub fn render_document<S: XamlSink>(
    doc: &Document,
    sink: S,
    options: &RenderOptions,
) -> Result<S::Output, RenderError> {
    let renderers = Renderers::default();
    MarkdownRenderer::new(sink, &renderers, options).render(doc)
}
