//! XAML node model
//!
//!     The writer never builds markup directly. It issues a stream of node events (start object,
//!     start member, value, end member, end object) against a [`sink::XamlSink`], resolving every
//!     type and member through the static [`schema`] first. Sinks decide what the stream becomes:
//!
//!     - [`sink::EventRecorder`] keeps the raw events (used by tests and the `events` format)
//!     - [`tree::ObjectGraphSink`] builds an in-memory object graph with typed values
//!     - [`text::XamlTextSink`] builds the same graph and prints it as XAML text
//!
//!     Values travel as [`XamlValue`]. Object sinks keep them typed; text sinks only ever receive
//!     the string form produced by the member's converter.

pub mod schema;
pub mod sink;
pub mod text;
pub mod tree;

use crate::styles::ResourceKey;
use serde::{Serialize, Serializer};
use std::fmt;

pub use schema::{Converter, MemberKind, XamlMember, XamlSchema, XamlType};
pub use sink::{EventRecorder, SinkMode, XamlEvent, XamlSink};
pub use text::{TextOptions, XamlTextSink};
pub use tree::{ObjectGraphSink, XamlDocument, XamlMemberNode, XamlNode, XamlObject};

/// Default namespace of the flow document types.
pub const PRESENTATION_NAMESPACE: &str =
    "http://schemas.microsoft.com/winfx/2006/xaml/presentation";

/// The XAML language namespace (`x:`).
pub const XAML_NAMESPACE: &str = "http://schemas.microsoft.com/winfx/2006/xaml";

/// An xmlns declaration emitted ahead of the root object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceDeclaration {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceDeclaration {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        NamespaceDeclaration {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// A scalar member value.
#[derive(Debug, Clone, PartialEq)]
pub enum XamlValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Uri(String),
    Enum {
        type_name: &'static str,
        name: &'static str,
    },
    GridLength(GridLength),
    ResourceKey(ResourceKey),
}

impl XamlValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            XamlValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for XamlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XamlValue::String(s) | XamlValue::Uri(s) => f.write_str(s),
            XamlValue::Int(n) => write!(f, "{n}"),
            XamlValue::Double(n) => write!(f, "{n}"),
            XamlValue::Bool(true) => f.write_str("True"),
            XamlValue::Bool(false) => f.write_str("False"),
            XamlValue::Enum { name, .. } => f.write_str(name),
            XamlValue::GridLength(length) => write!(f, "{length}"),
            XamlValue::ResourceKey(key) => write!(f, "{key}"),
        }
    }
}

impl From<&str> for XamlValue {
    fn from(s: &str) -> Self {
        XamlValue::String(s.to_string())
    }
}

impl From<String> for XamlValue {
    fn from(s: String) -> Self {
        XamlValue::String(s)
    }
}

impl From<bool> for XamlValue {
    fn from(b: bool) -> Self {
        XamlValue::Bool(b)
    }
}

impl From<i64> for XamlValue {
    fn from(n: i64) -> Self {
        XamlValue::Int(n)
    }
}

impl From<ResourceKey> for XamlValue {
    fn from(key: ResourceKey) -> Self {
        XamlValue::ResourceKey(key)
    }
}

impl From<GridLength> for XamlValue {
    fn from(length: GridLength) -> Self {
        XamlValue::GridLength(length)
    }
}

impl Serialize for XamlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            XamlValue::Int(n) => serializer.serialize_i64(*n),
            XamlValue::Double(n) => serializer.serialize_f64(*n),
            XamlValue::Bool(b) => serializer.serialize_bool(*b),
            other => serializer.collect_str(other),
        }
    }
}

/// Width of a table column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLength {
    Auto,
    /// Proportional share of the remaining width.
    Star(f64),
    Pixel(f64),
}

impl fmt::Display for GridLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridLength::Auto => f.write_str("Auto"),
            GridLength::Star(w) if *w == 1.0 => f.write_str("*"),
            GridLength::Star(w) => write!(f, "{w}*"),
            GridLength::Pixel(w) => write!(f, "{w}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlignment {
    Left,
    Right,
    Center,
    Justify,
}

impl TextAlignment {
    pub fn to_value(self) -> XamlValue {
        let name = match self {
            TextAlignment::Left => "Left",
            TextAlignment::Right => "Right",
            TextAlignment::Center => "Center",
            TextAlignment::Justify => "Justify",
        };
        XamlValue::Enum {
            type_name: "TextAlignment",
            name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMarkerStyle {
    None,
    Disc,
    Circle,
    Square,
    Box,
    LowerRoman,
    UpperRoman,
    LowerLatin,
    UpperLatin,
    Decimal,
}

impl TextMarkerStyle {
    pub fn to_value(self) -> XamlValue {
        let name = match self {
            TextMarkerStyle::None => "None",
            TextMarkerStyle::Disc => "Disc",
            TextMarkerStyle::Circle => "Circle",
            TextMarkerStyle::Square => "Square",
            TextMarkerStyle::Box => "Box",
            TextMarkerStyle::LowerRoman => "LowerRoman",
            TextMarkerStyle::UpperRoman => "UpperRoman",
            TextMarkerStyle::LowerLatin => "LowerLatin",
            TextMarkerStyle::UpperLatin => "UpperLatin",
            TextMarkerStyle::Decimal => "Decimal",
        };
        XamlValue::Enum {
            type_name: "TextMarkerStyle",
            name,
        }
    }
}
