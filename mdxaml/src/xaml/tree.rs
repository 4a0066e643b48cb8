//! In-memory object graph built from a node stream.

use super::schema::{MemberKind, XamlMember, XamlSchema, XamlType};
use super::sink::{SinkMode, XamlSink};
use super::{NamespaceDeclaration, XamlValue};
use crate::error::RenderError;
use serde::Serialize;

/// A member item: either a nested object or a scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XamlNode {
    Object(XamlObject),
    Value(XamlValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XamlObject {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    #[serde(skip)]
    pub namespace: &'static str,
    #[serde(skip)]
    pub markup_extension: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<XamlMemberNode>,
}

impl XamlObject {
    fn new(ty: &'static XamlType) -> Self {
        XamlObject {
            type_name: ty.name,
            namespace: ty.namespace,
            markup_extension: ty.markup_extension,
            members: Vec::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&XamlMemberNode> {
        self.members.iter().find(|m| m.name == name)
    }

    /// The items of the content member, or an empty slice.
    pub fn content(&self) -> &[XamlNode] {
        self.members
            .iter()
            .find(|m| m.is_content)
            .map(|m| m.items.as_slice())
            .unwrap_or(&[])
    }

    /// The first scalar of a member, if set.
    pub fn value_of(&self, name: &str) -> Option<&XamlValue> {
        self.member(name)?.items.iter().find_map(|item| match item {
            XamlNode::Value(v) => Some(v),
            XamlNode::Object(_) => None,
        })
    }

    /// Concatenated scalar text of this object and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(object: &XamlObject, out: &mut String) {
    for member in &object.members {
        if member.kind != MemberKind::Property || !(member.is_content || member.name == "Text") {
            continue;
        }
        for item in &member.items {
            match item {
                XamlNode::Value(value) => out.push_str(&value.to_string()),
                XamlNode::Object(child) => collect_text(child, out),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XamlMemberNode {
    pub name: &'static str,
    pub owner: &'static str,
    pub kind: MemberKind,
    #[serde(skip)]
    pub is_content: bool,
    #[serde(skip)]
    pub collection: bool,
    pub items: Vec<XamlNode>,
}

/// The finished graph plus the namespaces declared ahead of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XamlDocument {
    pub namespaces: Vec<NamespaceDeclaration>,
    pub root: XamlObject,
}

enum Frame {
    Object(XamlObject, &'static XamlType),
    Member(XamlMemberNode),
}

/// Assembles node events into a tree, checking nesting as it goes.
pub(crate) struct TreeBuilder {
    schema: XamlSchema,
    namespaces: Vec<NamespaceDeclaration>,
    stack: Vec<Frame>,
    root: Option<XamlObject>,
}

impl TreeBuilder {
    pub(crate) fn new(schema: XamlSchema) -> Self {
        TreeBuilder {
            schema,
            namespaces: Vec::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    pub(crate) fn namespace(&mut self, ns: &NamespaceDeclaration) -> Result<(), RenderError> {
        if self.root.is_some() || !self.stack.is_empty() {
            return Err(RenderError::protocol(
                "namespace",
                "namespace declared after the root object started",
            ));
        }
        self.namespaces.push(ns.clone());
        Ok(())
    }

    pub(crate) fn start_object(&mut self, ty: &'static XamlType) -> Result<(), RenderError> {
        match self.stack.last() {
            Some(Frame::Member(_)) => {}
            None if self.root.is_none() => {}
            None => return Err(RenderError::protocol("start_object", "second root object")),
            Some(Frame::Object(..)) => {
                return Err(RenderError::protocol(
                    "start_object",
                    "object started directly inside an object",
                ))
            }
        }
        self.stack.push(Frame::Object(XamlObject::new(ty), ty));
        Ok(())
    }

    pub(crate) fn end_object(&mut self) -> Result<(), RenderError> {
        let object = match self.stack.pop() {
            Some(Frame::Object(object, _)) => object,
            Some(frame) => {
                self.stack.push(frame);
                return Err(RenderError::protocol("end_object", "a member is still open"));
            }
            None => return Err(RenderError::protocol("end_object", "no open object")),
        };
        match self.stack.last_mut() {
            Some(Frame::Member(member)) => member.items.push(XamlNode::Object(object)),
            Some(Frame::Object(..)) => {
                return Err(RenderError::protocol(
                    "end_object",
                    "object closed directly inside an object",
                ))
            }
            None => self.root = Some(object),
        }
        Ok(())
    }

    pub(crate) fn start_member(
        &mut self,
        member: &XamlMember,
        collection: bool,
    ) -> Result<(), RenderError> {
        let ty = match self.stack.last() {
            Some(Frame::Object(_, ty)) => *ty,
            _ => {
                return Err(RenderError::protocol(
                    "start_member",
                    "member started outside an object",
                ))
            }
        };
        let is_content = member.kind == MemberKind::Property
            && self
                .schema
                .content_member(ty)
                .map(|content| content.name == member.name)
                .unwrap_or(false);
        self.stack.push(Frame::Member(XamlMemberNode {
            name: member.name,
            owner: member.owner,
            kind: member.kind,
            is_content,
            collection,
            items: Vec::new(),
        }));
        Ok(())
    }

    pub(crate) fn end_member(&mut self) -> Result<(), RenderError> {
        let member = match self.stack.pop() {
            Some(Frame::Member(member)) => member,
            Some(frame) => {
                self.stack.push(frame);
                return Err(RenderError::protocol("end_member", "an object is still open"));
            }
            None => return Err(RenderError::protocol("end_member", "no open member")),
        };
        match self.stack.last_mut() {
            Some(Frame::Object(object, _)) => object.members.push(member),
            _ => {
                return Err(RenderError::protocol(
                    "end_member",
                    "member closed outside an object",
                ))
            }
        }
        Ok(())
    }

    pub(crate) fn value(&mut self, value: XamlValue) -> Result<(), RenderError> {
        match self.stack.last_mut() {
            Some(Frame::Member(member)) => {
                member.items.push(XamlNode::Value(value));
                Ok(())
            }
            _ => Err(RenderError::protocol("value", "value written outside a member")),
        }
    }

    pub(crate) fn finish(self) -> Result<XamlDocument, RenderError> {
        if !self.stack.is_empty() {
            return Err(RenderError::protocol("finish", "unclosed objects or members"));
        }
        let root = self
            .root
            .ok_or_else(|| RenderError::protocol("finish", "no root object"))?;
        Ok(XamlDocument {
            namespaces: self.namespaces,
            root,
        })
    }
}

/// Sink producing a typed object graph.
pub struct ObjectGraphSink {
    builder: TreeBuilder,
}

impl ObjectGraphSink {
    pub fn new() -> Self {
        ObjectGraphSink {
            builder: TreeBuilder::new(XamlSchema::FLOW_DOCUMENT),
        }
    }
}

impl Default for ObjectGraphSink {
    fn default() -> Self {
        Self::new()
    }
}

impl XamlSink for ObjectGraphSink {
    type Output = XamlDocument;

    fn mode(&self) -> SinkMode {
        SinkMode::Native
    }

    fn write_namespace(&mut self, namespace: &NamespaceDeclaration) -> Result<(), RenderError> {
        self.builder.namespace(namespace)
    }

    fn write_start_object(&mut self, ty: &'static XamlType) -> Result<(), RenderError> {
        self.builder.start_object(ty)
    }

    fn write_end_object(&mut self) -> Result<(), RenderError> {
        self.builder.end_object()
    }

    fn write_start_member(&mut self, member: &XamlMember) -> Result<(), RenderError> {
        self.builder.start_member(member, false)
    }

    fn write_end_member(&mut self) -> Result<(), RenderError> {
        self.builder.end_member()
    }

    fn write_start_collection(&mut self, member: &XamlMember) -> Result<(), RenderError> {
        self.builder.start_member(member, true)
    }

    fn write_end_collection(&mut self) -> Result<(), RenderError> {
        self.builder.end_member()
    }

    fn write_value(&mut self, value: XamlValue) -> Result<(), RenderError> {
        self.builder.value(value)
    }

    fn finish(self) -> Result<Self::Output, RenderError> {
        self.builder.finish()
    }
}
