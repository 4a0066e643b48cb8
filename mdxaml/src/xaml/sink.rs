//! The node stream protocol consumed by sinks.

use super::schema::{XamlMember, XamlType};
use super::{NamespaceDeclaration, XamlValue};
use crate::error::RenderError;
use std::fmt::Write as _;

/// Whether a sink keeps typed values or wants their markup strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkMode {
    /// Values are delivered as-is; resource keys stay keys.
    #[default]
    Native,
    /// Values are delivered as strings produced by the member converter.
    Text,
}

/// Receiver of a XAML node stream.
///
/// The writer guarantees the events arrive strictly nested: every start has a matching end,
/// members only open inside objects, objects and values only appear inside members or
/// collections. Namespaces come before the root object.
pub trait XamlSink {
    type Output;

    fn mode(&self) -> SinkMode;

    fn write_namespace(&mut self, namespace: &NamespaceDeclaration) -> Result<(), RenderError>;

    fn write_start_object(&mut self, ty: &'static XamlType) -> Result<(), RenderError>;

    fn write_end_object(&mut self) -> Result<(), RenderError>;

    fn write_start_member(&mut self, member: &XamlMember) -> Result<(), RenderError>;

    fn write_end_member(&mut self) -> Result<(), RenderError>;

    /// Open an items collection. Only called once the collection has its first item.
    fn write_start_collection(&mut self, member: &XamlMember) -> Result<(), RenderError>;

    fn write_end_collection(&mut self) -> Result<(), RenderError>;

    fn write_value(&mut self, value: XamlValue) -> Result<(), RenderError>;

    fn finish(self) -> Result<Self::Output, RenderError>;
}

/// A recorded node event.
#[derive(Debug, Clone, PartialEq)]
pub enum XamlEvent {
    Namespace(NamespaceDeclaration),
    StartObject(&'static str),
    EndObject,
    StartMember(String),
    EndMember,
    StartCollection(String),
    EndCollection,
    Value(XamlValue),
}

impl XamlEvent {
    fn depth_delta(&self) -> i32 {
        match self {
            XamlEvent::StartObject(_)
            | XamlEvent::StartMember(_)
            | XamlEvent::StartCollection(_) => 1,
            XamlEvent::EndObject | XamlEvent::EndMember | XamlEvent::EndCollection => -1,
            XamlEvent::Namespace(_) | XamlEvent::Value(_) => 0,
        }
    }
}

/// Sink that keeps the raw event list.
#[derive(Debug)]
pub struct EventRecorder {
    mode: SinkMode,
    events: Vec<XamlEvent>,
    depth: i32,
}

impl EventRecorder {
    pub fn new(mode: SinkMode) -> Self {
        EventRecorder {
            mode,
            events: Vec::new(),
            depth: 0,
        }
    }

    pub fn events(&self) -> &[XamlEvent] {
        &self.events
    }

    fn record(&mut self, event: XamlEvent, operation: &'static str) -> Result<(), RenderError> {
        self.depth += event.depth_delta();
        if self.depth < 0 {
            return Err(RenderError::protocol(operation, "end without matching start"));
        }
        self.events.push(event);
        Ok(())
    }
}

impl Default for EventRecorder {
    fn default() -> Self {
        EventRecorder::new(SinkMode::Native)
    }
}

impl XamlSink for EventRecorder {
    type Output = Vec<XamlEvent>;

    fn mode(&self) -> SinkMode {
        self.mode
    }

    fn write_namespace(&mut self, namespace: &NamespaceDeclaration) -> Result<(), RenderError> {
        self.record(XamlEvent::Namespace(namespace.clone()), "namespace")
    }

    fn write_start_object(&mut self, ty: &'static XamlType) -> Result<(), RenderError> {
        self.record(XamlEvent::StartObject(ty.name), "start_object")
    }

    fn write_end_object(&mut self) -> Result<(), RenderError> {
        self.record(XamlEvent::EndObject, "end_object")
    }

    fn write_start_member(&mut self, member: &XamlMember) -> Result<(), RenderError> {
        self.record(
            XamlEvent::StartMember(member.qualified_name()),
            "start_member",
        )
    }

    fn write_end_member(&mut self) -> Result<(), RenderError> {
        self.record(XamlEvent::EndMember, "end_member")
    }

    fn write_start_collection(&mut self, member: &XamlMember) -> Result<(), RenderError> {
        self.record(
            XamlEvent::StartCollection(member.qualified_name()),
            "start_collection",
        )
    }

    fn write_end_collection(&mut self) -> Result<(), RenderError> {
        self.record(XamlEvent::EndCollection, "end_collection")
    }

    fn write_value(&mut self, value: XamlValue) -> Result<(), RenderError> {
        self.record(XamlEvent::Value(value), "value")
    }

    fn finish(self) -> Result<Self::Output, RenderError> {
        if self.depth != 0 {
            return Err(RenderError::protocol("finish", "unclosed objects or members"));
        }
        Ok(self.events)
    }
}

/// Whether every prefix of `events` has non-negative depth and the whole stream ends at zero.
pub fn is_balanced(events: &[XamlEvent]) -> bool {
    let mut depth = 0;
    for event in events {
        depth += event.depth_delta();
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// Indented, one-event-per-line dump of a stream.
pub fn dump_events(events: &[XamlEvent]) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in events {
        if event.depth_delta() < 0 {
            depth = depth.saturating_sub(1);
        }
        let indent = "  ".repeat(depth);
        let _ = match event {
            XamlEvent::Namespace(ns) => writeln!(out, "{indent}NS {}={}", ns.prefix, ns.uri),
            XamlEvent::StartObject(name) => writeln!(out, "{indent}SO {name}"),
            XamlEvent::EndObject => writeln!(out, "{indent}EO"),
            XamlEvent::StartMember(name) => writeln!(out, "{indent}SM {name}"),
            XamlEvent::EndMember => writeln!(out, "{indent}EM"),
            XamlEvent::StartCollection(name) => writeln!(out, "{indent}SC {name}"),
            XamlEvent::EndCollection => writeln!(out, "{indent}EC"),
            XamlEvent::Value(value) => writeln!(out, "{indent}V {value:?}"),
        };
        if event.depth_delta() > 0 {
            depth += 1;
        }
    }
    out
}
