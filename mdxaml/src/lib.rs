//! Markdown to XAML flow document rendering
//!
//!     This crate turns a Markdown document into WPF `FlowDocument` markup. It is a pure lib:
//!     it powers mdxaml-cli but makes no assumption about a shell, so nothing here prints, reads
//!     env vars or touches files.
//!
//!     TLDR:
//!         - Markdown parsing is comrak's job; formats/markdown only adapts its AST to ./ast.rs.
//!         - Rendering walks the input tree and drives a streaming XamlWriter.
//!         - The writer emits a node stream to a pluggable sink: XAML text, an object graph or
//!           an event recorder.
//!
//! Architecture
//!
//!     The interesting part is the writer (./writer/). Renderers never emit collection starts or
//!     text nodes themselves. They open an items scope and push text and objects; the writer
//!     decides lazily whether the collection is ever opened, folds runs of text into a single
//!     value node, collapses whitespace unless asked to preserve it, and resolves style roles to
//!     resource keys. A renderer mistake (a member outside an object, a second root, an
//!     unbalanced end) is reported as a protocol error rather than producing broken markup.
//!
//!     The file structure :
//!     .
//!     ├── ast.rs                  # Input tree (blocks and inlines)
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── styles.rs               # Style roles, resource keys and overrides
//!     ├── formats
//!     │   ├── markdown            # comrak → input tree
//!     │   ├── xaml.rs             # XAML text output
//!     │   ├── json.rs             # Object graph as JSON
//!     │   └── events.rs           # Writer event dump
//!     ├── render                  # Per-kind block and inline handlers
//!     ├── writer                  # Streaming XamlWriter and its text buffer
//!     └── xaml                    # Type schema, sinks, object graph and text printer
//!
//! Testing
//!
//!     tests
//!     ├── lib.rs                  # Aggregates the modules below
//!     ├── <area>.rs
//!     └── fixtures
//!
//!     Rust does not discover tests in subdirectories on its own, so they are included from
//!     tests/lib.rs.
//!
//! Sinks
//!
//!     Sinks come in two modes. Native sinks (the object graph, the event recorder by default)
//!     receive typed values, so a `StartIndex` stays an integer and a style stays a resource key.
//!     Text sinks receive every value already converted to its markup string, and a known style
//!     key arrives as an `x:Static` reference into the resource key store. The writer is the only
//!     place that branches on the mode.

pub mod ast;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod render;
pub mod styles;
pub mod writer;
pub mod xaml;

pub use error::{FormatError, RenderError};
pub use format::Format;
pub use registry::FormatRegistry;
pub use render::{render_document, MarkdownRenderer, RenderOptions, Renderers};
pub use writer::XamlWriter;

/// Renders Markdown source straight to XAML text with default options.
pub fn markdown_to_xaml(source: &str) -> Result<String, FormatError> {
    FormatRegistry::default().convert(source, "markdown", "xaml")
}

/// Renders a parsed document to XAML text.
pub fn to_xaml(
    doc: &ast::Document,
    options: &RenderOptions,
    text: &xaml::TextOptions,
) -> Result<String, RenderError> {
    render_document(doc, xaml::XamlTextSink::new(text.clone()), options)
}

/// Renders a parsed document to the native object graph.
pub fn to_object_graph(
    doc: &ast::Document,
    options: &RenderOptions,
) -> Result<xaml::XamlDocument, RenderError> {
    render_document(doc, xaml::ObjectGraphSink::new(), options)
}
