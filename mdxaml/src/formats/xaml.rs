//! XAML text output
//!
//! Renders the input tree through [`XamlTextSink`], producing a `FlowDocument` whose style
//! references point at the configured resource key store.

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::Format;
use crate::render::{render_document, RenderOptions};
use crate::xaml::{TextOptions, XamlTextSink};

/// Format implementation for XAML text
#[derive(Debug, Default, Clone)]
pub struct XamlFormat {
    options: RenderOptions,
    text: TextOptions,
}

impl XamlFormat {
    pub fn new(options: RenderOptions, text: TextOptions) -> Self {
        Self { options, text }
    }
}

impl Format for XamlFormat {
    fn name(&self) -> &str {
        "xaml"
    }

    fn description(&self) -> &str {
        "WPF FlowDocument markup"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xaml"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let sink = XamlTextSink::new(self.text.clone());
        Ok(render_document(doc, sink, &self.options)?)
    }
}
