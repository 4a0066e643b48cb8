//! XAML text output
//!
//!     The text sink assembles the same object graph as [`super::tree::ObjectGraphSink`] and
//!     prints it once the stream is complete. Printing rules:
//!
//!     - a non-content member holding a single value or markup extension becomes an attribute
//!     - markup extensions print in brace syntax, nested ones included:
//!       `{StaticResource {x:Static xmarkdig:MarkdownXaml.CodeStyleKey}}`
//!     - any other non-content member becomes a property element (`<Table.Columns>`)
//!     - content items become children; when text and objects are mixed, the children are
//!       printed inline so no whitespace is introduced between them
//!     - an element whose text would not survive XAML whitespace normalization is marked with
//!       `xml:space="preserve"`
//!
//!     Namespace declarations are placed on the root element.

use super::schema::{MemberKind, XamlMember, XamlSchema, XamlType};
use super::sink::{SinkMode, XamlSink};
use super::tree::{TreeBuilder, XamlDocument, XamlMemberNode, XamlNode, XamlObject};
use super::{NamespaceDeclaration, XamlValue};
use crate::error::RenderError;
use quick_xml::escape::{escape, partial_escape};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions { indent: 2 }
    }
}

/// Sink producing XAML text.
pub struct XamlTextSink {
    builder: TreeBuilder,
    options: TextOptions,
}

impl XamlTextSink {
    pub fn new(options: TextOptions) -> Self {
        XamlTextSink {
            builder: TreeBuilder::new(XamlSchema::FLOW_DOCUMENT),
            options,
        }
    }
}

impl Default for XamlTextSink {
    fn default() -> Self {
        Self::new(TextOptions::default())
    }
}

impl XamlSink for XamlTextSink {
    type Output = String;

    fn mode(&self) -> SinkMode {
        SinkMode::Text
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
        let doc = self.builder.finish()?;
        Ok(to_xaml(&doc, &self.options))
    }
}

/// Print a finished graph as XAML text.
pub fn to_xaml(doc: &XamlDocument, options: &TextOptions) -> String {
    let mut printer = Printer {
        namespaces: &doc.namespaces,
        unit: " ".repeat(options.indent),
        out: String::new(),
    };
    printer.element(&doc.root, 0, false, true);
    printer.out
}

struct Printer<'a> {
    namespaces: &'a [NamespaceDeclaration],
    unit: String,
    out: String,
}

impl Printer<'_> {
    fn qualify(&self, namespace: &str, name: &str) -> String {
        match self.namespaces.iter().find(|ns| ns.uri == namespace) {
            Some(ns) if !ns.prefix.is_empty() => format!("{}:{}", ns.prefix, name),
            _ => name.to_string(),
        }
    }

    fn element_name(&self, object: &XamlObject) -> String {
        self.qualify(object.namespace, object.type_name)
    }

    fn extension_name(&self, object: &XamlObject) -> String {
        let short = object
            .type_name
            .strip_suffix("Extension")
            .unwrap_or(object.type_name);
        self.qualify(object.namespace, short)
    }

    fn pad(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(&self.unit);
        }
    }

    fn element(&mut self, object: &XamlObject, depth: usize, inline: bool, root: bool) {
        let name = self.element_name(object);
        if !inline {
            self.pad(depth);
        }
        self.out.push('<');
        self.out.push_str(&name);

        if root {
            for ns in self.namespaces {
                let attr = if ns.prefix.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{}", ns.prefix)
                };
                let value = attribute_text(&ns.uri);
                self.out.push_str(&format!(" {attr}=\"{value}\""));
            }
        }

        let mut property_elements = Vec::new();
        for member in object.members.iter().filter(|m| !m.is_content) {
            match self.attribute(member) {
                Some(attr) => self.out.push_str(&attr),
                None => property_elements.push(member),
            }
        }
        if needs_preserve(object.content()) {
            self.out.push_str(" xml:space=\"preserve\"");
        }

        let content = object.content();
        if property_elements.is_empty() && content.is_empty() {
            self.out.push_str("/>");
            if !inline {
                self.out.push('\n');
            }
            return;
        }

        self.out.push('>');
        let mixed = inline
            || object
                .members
                .iter()
                .find(|m| m.is_content)
                .is_some_and(prints_inline);
        if !mixed {
            self.out.push('\n');
        }
        for member in property_elements {
            self.property_element(&name, member, depth + 1, mixed);
        }
        self.items(content, depth + 1, mixed);
        if !mixed {
            self.pad(depth);
        }
        self.out.push_str("</");
        self.out.push_str(&name);
        self.out.push('>');
        if !inline {
            self.out.push('\n');
        }
    }

    fn items(&mut self, items: &[XamlNode], depth: usize, inline: bool) {
        for item in items {
            match item {
                XamlNode::Value(value) => {
                    self.out.push_str(&partial_escape(value.to_string()));
                }
                XamlNode::Object(child) => self.element(child, depth, inline, false),
            }
        }
    }

    fn property_element(
        &mut self,
        element: &str,
        member: &XamlMemberNode,
        depth: usize,
        inline: bool,
    ) {
        let name = match member.kind {
            MemberKind::Property => format!("{element}.{}", member.name),
            MemberKind::Attached => format!("{}.{}", member.owner, member.name),
            MemberKind::Directive => format!("x:{}", member.name),
        };
        if !inline {
            self.pad(depth);
        }
        self.out.push_str(&format!("<{name}>"));
        let mixed = inline || prints_inline(member);
        if !mixed {
            self.out.push('\n');
        }
        self.items(&member.items, depth + 1, mixed);
        if !mixed {
            self.pad(depth);
        }
        self.out.push_str(&format!("</{name}>"));
        if !inline {
            self.out.push('\n');
        }
    }

    /// ` Name="value"` when the member fits in an attribute.
    fn attribute(&self, member: &XamlMemberNode) -> Option<String> {
        let [item] = member.items.as_slice() else {
            return None;
        };
        let value = match item {
            XamlNode::Value(value) => {
                let text = value.to_string();
                if text.starts_with('{') {
                    format!("{{}}{text}")
                } else {
                    text
                }
            }
            XamlNode::Object(object) if object.markup_extension => self.extension(object),
            XamlNode::Object(_) => return None,
        };
        let name = match member.kind {
            MemberKind::Property => member.name.to_string(),
            MemberKind::Attached => format!("{}.{}", member.owner, member.name),
            MemberKind::Directive => format!("x:{}", member.name),
        };
        Some(format!(" {name}=\"{}\"", attribute_text(&value)))
    }

    fn extension(&self, object: &XamlObject) -> String {
        let mut args = Vec::new();
        for member in &object.members {
            let rendered: Vec<String> = member
                .items
                .iter()
                .map(|item| match item {
                    XamlNode::Value(value) => extension_argument(&value.to_string()),
                    XamlNode::Object(nested) => self.extension(nested),
                })
                .collect();
            if member.kind == MemberKind::Directive {
                args.extend(rendered);
            } else {
                args.push(format!("{}={}", member.name, rendered.join(", ")));
            }
        }
        let name = self.extension_name(object);
        if args.is_empty() {
            format!("{{{name}}}")
        } else {
            format!("{{{name} {}}}", args.join(", "))
        }
    }
}

fn extension_argument(text: &str) -> String {
    let needs_quotes =
        text.is_empty() || text.contains(|c: char| matches!(c, ',' | '{' | '}' | '=' | '\''));
    if needs_quotes {
        format!("'{}'", text.replace('\'', "\\'"))
    } else {
        text.to_string()
    }
}

fn attribute_text(text: &str) -> String {
    escape(text)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// Whitespace between the items of an `Inlines` collection is content, so such members (and
/// any member holding text) are printed on one line.
fn prints_inline(member: &XamlMemberNode) -> bool {
    member.name == "Inlines"
        || member
            .items
            .iter()
            .any(|item| matches!(item, XamlNode::Value(_)))
}

/// Whether the values among `items` would be altered by whitespace normalization.
fn needs_preserve(items: &[XamlNode]) -> bool {
    let last = items.len().saturating_sub(1);
    items.iter().enumerate().any(|(index, item)| {
        let XamlNode::Value(value) = item else {
            return false;
        };
        let text = value.to_string();
        text.contains(['\n', '\r', '\t'])
            || text.contains("  ")
            || (index == 0 && text.starts_with(char::is_whitespace))
            || (index == last && text.ends_with(char::is_whitespace))
    })
}
