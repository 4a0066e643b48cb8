//! Object graph output as JSON
//!
//! Renders through the native [`ObjectGraphSink`], so values keep their types (numbers,
//! booleans, resource keys) instead of being converted to markup text.

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::Format;
use crate::render::{render_document, RenderOptions};
use crate::xaml::ObjectGraphSink;

/// Format implementation for the JSON object graph
#[derive(Debug, Default, Clone)]
pub struct JsonFormat {
    options: RenderOptions,
}

impl JsonFormat {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Rendered object graph as JSON"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let graph = render_document(doc, ObjectGraphSink::new(), &self.options)?;
        serde_json::to_string_pretty(&graph)
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}
