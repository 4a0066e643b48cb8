//! Markup stream writer
//!
//!     [`XamlWriter`] is the protocol layer between the node renderers and a [`XamlSink`]. It
//!     keeps the stack of open objects, members and items collections, resolves types and
//!     members against the schema, and turns buffered characters into text values.
//!
//!     Items collections are opened lazily. `start_items` only records the member; the
//!     collection start event is issued when the first child object starts or the first text is
//!     flushed. A collection that never receives a child produces no events at all, which keeps
//!     empty `Inlines` / `Blocks` out of the output.
//!
//!     Text is buffered (see [`text_buffer`]) and flushed when an object starts (keeping one
//!     separating space), when a member ends, and when a collection ends. Starting a member
//!     while text is buffered is a protocol error.
//!
//!     Every value written through [`XamlWriter::write_member`] passes through
//!     `write_member_value`, the only place the writer looks at the sink mode: native sinks get
//!     the typed value, textual sinks get the member converter's string form and see known
//!     resource keys as `x:Static` references.

pub mod text_buffer;

use crate::error::RenderError;
use crate::styles::{ResourceKey, ResourceKeyStore, StyleRole, StyleTable};
use crate::xaml::{
    NamespaceDeclaration, SinkMode, XamlMember, XamlSchema, XamlSink, XamlType, XamlValue,
};
use text_buffer::{TextBuffer, TextRun, WhitespaceMode};

/// How a member is named by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberRef<'a> {
    /// A member of the current object (or one of its base types).
    Name(&'a str),
    /// An attached member, e.g. `ToolTipService.ToolTip`.
    Attached { owner: &'a str, name: &'a str },
    Resolved(XamlMember),
}

impl<'a> From<&'a str> for MemberRef<'a> {
    fn from(name: &'a str) -> Self {
        match name.split_once('.') {
            Some((owner, name)) => MemberRef::Attached { owner, name },
            None => MemberRef::Name(name),
        }
    }
}

impl From<XamlMember> for MemberRef<'_> {
    fn from(member: XamlMember) -> Self {
        MemberRef::Resolved(member)
    }
}

/// A style reference: a role resolved through the style table, or an explicit key.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleRef {
    Role(StyleRole),
    Key(ResourceKey),
}

impl From<StyleRole> for StyleRef {
    fn from(role: StyleRole) -> Self {
        StyleRef::Role(role)
    }
}

impl From<ResourceKey> for StyleRef {
    fn from(key: ResourceKey) -> Self {
        StyleRef::Key(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollectionState {
    /// Requested but not yet opened on the sink.
    Pending,
    Open,
}

#[derive(Debug)]
struct ItemsFrame {
    member: XamlMember,
    state: CollectionState,
    saved_mode: WhitespaceMode,
}

#[derive(Debug)]
enum Scope {
    Object(&'static XamlType),
    Member,
    Items(ItemsFrame),
}

pub struct XamlWriter<S: XamlSink> {
    sink: S,
    schema: XamlSchema,
    scopes: Vec<Scope>,
    text: TextBuffer,
    styles: StyleTable,
    keys: ResourceKeyStore,
    root_started: bool,
}

impl<S: XamlSink> XamlWriter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_styles(sink, StyleTable::default(), ResourceKeyStore::default())
    }

    pub fn with_styles(sink: S, styles: StyleTable, keys: ResourceKeyStore) -> Self {
        XamlWriter {
            sink,
            schema: XamlSchema::FLOW_DOCUMENT,
            scopes: Vec::new(),
            text: TextBuffer::new(WhitespaceMode::Collapse),
            styles,
            keys,
            root_started: false,
        }
    }

    pub fn schema(&self) -> XamlSchema {
        self.schema
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    pub fn resource_keys(&self) -> &ResourceKeyStore {
        &self.keys
    }

    /// The innermost open object.
    pub fn current_type(&self) -> Option<&'static XamlType> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Object(ty) => Some(*ty),
            _ => None,
        })
    }

    /// Declare a namespace. Only allowed before the root object starts.
    pub fn write_namespace(&mut self, prefix: &str, uri: &str) -> Result<(), RenderError> {
        if self.root_started {
            return Err(RenderError::protocol(
                "write_namespace",
                "namespaces must precede the root object",
            ));
        }
        self.sink
            .write_namespace(&NamespaceDeclaration::new(prefix, uri))
    }

    pub fn start_object(&mut self, name: &str) -> Result<&'static XamlType, RenderError> {
        let ty = self.schema.get_type(name)?;
        self.start_object_of(ty)?;
        Ok(ty)
    }

    /// Start an object of an already resolved type.
    pub fn start_object_of(&mut self, ty: &'static XamlType) -> Result<(), RenderError> {
        match self.scopes.last() {
            None if self.root_started => {
                return Err(RenderError::protocol("start_object", "second root object"))
            }
            Some(Scope::Object(_)) => {
                return Err(RenderError::protocol(
                    "start_object",
                    "no member open on the current object",
                ))
            }
            _ => {}
        }
        self.flush_items()?;
        self.flush_text(true)?;
        tracing::trace!(object = ty.name, "start object");
        self.sink.write_start_object(ty)?;
        self.root_started = true;
        self.scopes.push(Scope::Object(ty));
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<(), RenderError> {
        match self.scopes.last() {
            Some(Scope::Object(_)) => {}
            Some(_) => {
                return Err(RenderError::protocol(
                    "end_object",
                    "a member or collection is still open",
                ))
            }
            None => return Err(RenderError::protocol("end_object", "no open object")),
        }
        self.scopes.pop();
        self.sink.write_end_object()
    }

    /// Resolve a member relative to the current object.
    pub fn get_member<'a>(&self, member: impl Into<MemberRef<'a>>) -> Result<XamlMember, RenderError> {
        match member.into() {
            MemberRef::Resolved(member) => Ok(member),
            MemberRef::Attached { owner, name } => self.schema.attachable_member(owner, name),
            MemberRef::Name(name) => {
                let ty = self
                    .current_type()
                    .ok_or_else(|| RenderError::protocol("get_member", "no open object"))?;
                self.schema.member(ty, name)
            }
        }
    }

    pub fn start_member<'a>(&mut self, member: impl Into<MemberRef<'a>>) -> Result<(), RenderError> {
        self.expect_object("start_member")?;
        if self.text.is_pending() {
            return Err(RenderError::protocol(
                "start_member",
                "start member during text collection",
            ));
        }
        let member = self.get_member(member)?;
        self.sink.write_start_member(&member)?;
        self.scopes.push(Scope::Member);
        Ok(())
    }

    pub fn end_member(&mut self) -> Result<(), RenderError> {
        if !matches!(self.scopes.last(), Some(Scope::Member)) {
            return Err(RenderError::protocol("end_member", "no open member"));
        }
        self.flush_text(false)?;
        self.scopes.pop();
        self.sink.write_end_member()
    }

    /// Write a complete member. `None` writes nothing.
    pub fn write_member<'a>(
        &mut self,
        member: impl Into<MemberRef<'a>>,
        value: Option<XamlValue>,
    ) -> Result<(), RenderError> {
        let Some(value) = value else {
            return Ok(());
        };
        let member = self.get_member(member)?;
        self.start_member(member.clone())?;
        self.write_member_value(&member, value)?;
        self.end_member()
    }

    fn write_member_value(&mut self, member: &XamlMember, value: XamlValue) -> Result<(), RenderError> {
        match self.sink.mode() {
            SinkMode::Native => self.sink.write_value(value),
            SinkMode::Text => match value {
                XamlValue::ResourceKey(key) if self.keys.contains(&key) => {
                    let reference = self.keys.static_reference(&key);
                    self.start_object("StaticExtension")?;
                    self.start_member(XamlMember::POSITIONAL_PARAMETERS)?;
                    self.sink.write_value(XamlValue::String(reference))?;
                    self.end_member()?;
                    self.end_object()
                }
                value => {
                    let text = member.converter.to_text(member.name, &value)?;
                    self.sink.write_value(XamlValue::String(text))
                }
            },
        }
    }

    /// Begin an items collection on the current object. Nothing reaches the sink until the
    /// first item arrives.
    pub fn start_items<'a>(
        &mut self,
        member: impl Into<MemberRef<'a>>,
        preserve_whitespace: bool,
    ) -> Result<(), RenderError> {
        match self.scopes.last() {
            Some(Scope::Object(_)) => {}
            Some(Scope::Items(frame)) if frame.state == CollectionState::Pending => {
                return Err(RenderError::protocol(
                    "start_items",
                    "previous collection is still pending",
                ))
            }
            _ => return Err(RenderError::protocol("start_items", "no open object")),
        }
        if self.text.is_pending() {
            return Err(RenderError::protocol(
                "start_items",
                "start items during text collection",
            ));
        }
        let member = self.get_member(member)?;
        let saved_mode = self.text.mode();
        let mode = if preserve_whitespace {
            WhitespaceMode::Preserve
        } else {
            WhitespaceMode::Collapse
        };
        self.text.reset(mode);
        self.scopes.push(Scope::Items(ItemsFrame {
            member,
            state: CollectionState::Pending,
            saved_mode,
        }));
        Ok(())
    }

    /// Begin the current object's content collection.
    pub fn start_content_items(&mut self, preserve_whitespace: bool) -> Result<(), RenderError> {
        let content = self.content_property()?;
        self.start_items(content, preserve_whitespace)
    }

    pub fn end_items(&mut self) -> Result<(), RenderError> {
        if !matches!(self.scopes.last(), Some(Scope::Items(_))) {
            return Err(RenderError::protocol("end_items", "no open collection"));
        }
        self.flush_text(false)?;
        let Some(Scope::Items(frame)) = self.scopes.pop() else {
            return Err(RenderError::protocol("end_items", "no open collection"));
        };
        if frame.state == CollectionState::Open {
            self.sink.write_end_collection()?;
        }
        self.text.restore(frame.saved_mode);
        Ok(())
    }

    pub fn write_text(&mut self, text: &str) -> Result<(), RenderError> {
        self.expect_text_scope("write_text")?;
        self.text.push_str(text);
        Ok(())
    }

    pub fn write_char(&mut self, c: char) -> Result<(), RenderError> {
        self.expect_text_scope("write_char")?;
        self.text.push_char(c);
        Ok(())
    }

    /// Write a literal string value. It joins the buffered text like any other text.
    pub fn write_value(&mut self, value: &str) -> Result<(), RenderError> {
        self.expect_text_scope("write_value")?;
        self.text.push_str(value);
        Ok(())
    }

    pub fn write_line_break(&mut self) -> Result<(), RenderError> {
        self.start_object("LineBreak")?;
        self.end_object()
    }

    /// The content member of the current object.
    pub fn content_property(&self) -> Result<XamlMember, RenderError> {
        let ty = self
            .current_type()
            .ok_or_else(|| RenderError::protocol("content_property", "no open object"))?;
        self.schema.content_member(ty)
    }

    /// Attach a style (or another resource) as `{StaticResource key}`. The member defaults to
    /// `Style`.
    pub fn write_resource_member<'a>(
        &mut self,
        member: Option<MemberRef<'a>>,
        resource: impl Into<StyleRef>,
    ) -> Result<(), RenderError> {
        let key = match resource.into() {
            StyleRef::Role(role) => self.styles.resolve(role),
            StyleRef::Key(key) => key,
        };
        self.start_member(member.unwrap_or(MemberRef::Name("Style")))?;
        self.start_object("StaticResourceExtension")?;
        self.start_member(XamlMember::POSITIONAL_PARAMETERS)?;
        self.write_member_value(&XamlMember::POSITIONAL_PARAMETERS, XamlValue::ResourceKey(key))?;
        self.end_member()?;
        self.end_object()?;
        self.end_member()
    }

    /// Close the stream and hand back the sink output.
    pub fn finish(self) -> Result<S::Output, RenderError> {
        if !self.scopes.is_empty() {
            return Err(RenderError::protocol(
                "finish",
                "objects, members or collections still open",
            ));
        }
        self.into_sink().finish()
    }

    /// The sink as it stands, open scopes or not. Nothing already written is rolled back.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn expect_object(&self, operation: &'static str) -> Result<(), RenderError> {
        match self.scopes.last() {
            Some(Scope::Object(_)) => Ok(()),
            Some(_) => Err(RenderError::protocol(operation, "a member or collection is already open")),
            None => Err(RenderError::protocol(operation, "no open object")),
        }
    }

    fn expect_text_scope(&self, operation: &'static str) -> Result<(), RenderError> {
        match self.scopes.last() {
            Some(Scope::Member) | Some(Scope::Items(_)) => Ok(()),
            _ => Err(RenderError::protocol(operation, "text outside a member")),
        }
    }

    fn flush_items(&mut self) -> Result<(), RenderError> {
        if let Some(Scope::Items(frame)) = self.scopes.last_mut() {
            if frame.state == CollectionState::Pending {
                self.sink.write_start_collection(&frame.member)?;
                frame.state = CollectionState::Open;
            }
        }
        Ok(())
    }

    fn flush_text(&mut self, before_sibling: bool) -> Result<(), RenderError> {
        let Some(run) = self.text.take(before_sibling) else {
            return Ok(());
        };
        self.flush_items()?;
        match run {
            TextRun::Value(text) => self.sink.write_value(XamlValue::String(text)),
            TextRun::Literal(text) => {
                let run = self.schema.get_type("Run")?;
                let member = self.schema.member(run, "Text")?;
                self.sink.write_start_object(run)?;
                self.sink.write_start_member(&member)?;
                self.sink.write_value(XamlValue::String(text))?;
                self.sink.write_end_member()?;
                self.sink.write_end_object()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xaml::{EventRecorder, XamlEvent};

    fn recorder(mode: SinkMode) -> XamlWriter<EventRecorder> {
        XamlWriter::new(EventRecorder::new(mode))
    }

    fn values(events: &[XamlEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                XamlEvent::Value(v) => Some(v.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn collapses_paragraph_text_into_one_value() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("hello   ").unwrap();
        w.write_text("world").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert_eq!(
            events,
            vec![
                XamlEvent::StartObject("Paragraph"),
                XamlEvent::StartCollection("Paragraph.Inlines".to_string()),
                XamlEvent::Value(XamlValue::String("hello world".to_string())),
                XamlEvent::EndCollection,
                XamlEvent::EndObject,
            ]
        );
    }

    #[test]
    fn empty_collection_emits_nothing() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("   ").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert_eq!(
            events,
            vec![XamlEvent::StartObject("Paragraph"), XamlEvent::EndObject]
        );
    }

    #[test]
    fn preserve_mode_flushes_a_run() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(true).unwrap();
        w.write_text("a\n  b").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert_eq!(events[2], XamlEvent::StartObject("Run"));
        assert_eq!(events[3], XamlEvent::StartMember("Run.Text".to_string()));
        assert_eq!(values(&events), vec!["a\n  b".to_string()]);
    }

    #[test]
    fn text_before_object_keeps_separator() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("hello ").unwrap();
        w.start_object("Bold").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("x").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        w.write_text(" world").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert_eq!(values(&events), vec!["hello ", "x", " world"]);
    }

    #[test]
    fn value_after_text_keeps_separator() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("hello ").unwrap();
        w.write_value("x").unwrap();
        w.write_value(" y").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert_eq!(values(&events), vec!["hello x y"]);
    }

    #[test]
    fn into_sink_keeps_partial_output() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("lost").unwrap();
        let sink = w.into_sink();
        assert_eq!(sink.events(), &[XamlEvent::StartObject("Paragraph")]);
    }

    #[test]
    fn value_outside_items_is_a_protocol_error() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        assert!(matches!(
            w.write_value("x"),
            Err(RenderError::Protocol { .. })
        ));
    }

    #[test]
    fn enclosing_mode_is_restored_after_nested_items() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.start_object("Span").unwrap();
        w.start_content_items(true).unwrap();
        w.write_text("code").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        w.write_text("  after   text").unwrap();
        w.end_items().unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert_eq!(values(&events), vec!["code", " after text"]);
    }

    #[test]
    fn start_member_during_text_fails() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Paragraph").unwrap();
        w.start_content_items(false).unwrap();
        w.write_text("x").unwrap();
        let err = w.start_member("Style").unwrap_err();
        assert!(matches!(err, RenderError::Protocol { .. }));
    }

    #[test]
    fn member_operations_need_an_object() {
        let mut w = recorder(SinkMode::Native);
        assert!(matches!(
            w.start_member("Style"),
            Err(RenderError::Protocol { .. })
        ));
        assert!(matches!(w.end_object(), Err(RenderError::Protocol { .. })));
        assert!(matches!(w.end_member(), Err(RenderError::Protocol { .. })));
        assert!(matches!(w.content_property(), Err(RenderError::Protocol { .. })));
    }

    #[test]
    fn double_pending_items_fails() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Table").unwrap();
        w.start_items("Columns", false).unwrap();
        assert!(matches!(
            w.start_items("RowGroups", false),
            Err(RenderError::Protocol { .. })
        ));
    }

    #[test]
    fn write_member_none_is_a_no_op() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("TableCell").unwrap();
        w.write_member("ColumnSpan", None).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.finish().unwrap().len(), 2);
    }

    #[test]
    fn native_mode_writes_typed_values() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("TableCell").unwrap();
        w.write_member("ColumnSpan", Some(XamlValue::Int(2))).unwrap();
        w.write_resource_member(None, StyleRole::TableCell).unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert!(events.contains(&XamlEvent::Value(XamlValue::Int(2))));
        assert!(events.contains(&XamlEvent::Value(XamlValue::ResourceKey(
            ResourceKey::new("TableCellStyleKey")
        ))));
    }

    #[test]
    fn text_mode_converts_values_and_uses_static_references() {
        let mut w = XamlWriter::with_styles(
            EventRecorder::new(SinkMode::Text),
            StyleTable::new().with_override(StyleRole::Code, "MonoKey"),
            ResourceKeyStore::default(),
        );
        w.start_object("Span").unwrap();
        w.write_member("Tag", Some(XamlValue::Bool(true))).unwrap();
        w.write_resource_member(None, StyleRole::Code).unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert!(events.contains(&XamlEvent::Value(XamlValue::String("True".to_string()))));
        assert!(events.contains(&XamlEvent::Value(XamlValue::String("MonoKey".to_string()))));
        assert!(!events.contains(&XamlEvent::StartObject("StaticExtension")));

        let mut w = recorder(SinkMode::Text);
        w.start_object("Span").unwrap();
        w.write_resource_member(None, StyleRole::Code).unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert!(events.contains(&XamlEvent::StartObject("StaticExtension")));
        assert!(events.contains(&XamlEvent::Value(XamlValue::String(
            "xmarkdig:MarkdownXaml.CodeStyleKey".to_string()
        ))));
    }

    #[test]
    fn conversion_mismatch_fails() {
        let mut w = recorder(SinkMode::Text);
        w.start_object("TableCell").unwrap();
        assert!(matches!(
            w.write_member("ColumnSpan", Some(XamlValue::Bool(true))),
            Err(RenderError::Conversion { .. })
        ));
    }

    #[test]
    fn namespaces_must_come_first() {
        let mut w = recorder(SinkMode::Native);
        w.write_namespace("x", crate::xaml::XAML_NAMESPACE).unwrap();
        w.start_object("FlowDocument").unwrap();
        assert!(w.write_namespace("y", "urn:y").is_err());
    }

    #[test]
    fn attached_members_resolve_from_dotted_names() {
        let mut w = recorder(SinkMode::Native);
        w.start_object("Image").unwrap();
        w.write_member("ToolTipService.ToolTip", Some("tip".into()))
            .unwrap();
        w.end_object().unwrap();
        let events = w.finish().unwrap();
        assert!(events.contains(&XamlEvent::StartMember(
            "ToolTipService.ToolTip".to_string()
        )));
    }
}
