//! Writer event dump
//!
//! Debug output listing every event the writer sent to its sink, one per line and indented
//! by nesting depth.

use crate::ast::Document;
use crate::error::FormatError;
use crate::format::Format;
use crate::render::{render_document, RenderOptions};
use crate::xaml::sink::dump_events;
use crate::xaml::{EventRecorder, SinkMode};

/// Format implementation for the event dump
#[derive(Debug, Default, Clone)]
pub struct EventsFormat {
    options: RenderOptions,
    mode: SinkMode,
}

impl EventsFormat {
    pub fn new(options: RenderOptions, mode: SinkMode) -> Self {
        Self { options, mode }
    }
}

impl Format for EventsFormat {
    fn name(&self) -> &str {
        "events"
    }

    fn description(&self) -> &str {
        "Writer event stream (debugging)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["events"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, doc: &Document) -> Result<String, FormatError> {
        let events = render_document(doc, EventRecorder::new(self.mode), &self.options)?;
        Ok(dump_events(&events))
    }
}
