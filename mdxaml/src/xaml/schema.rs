//! Static description of the flow document types.
//!
//! Types and members are declared as `static` tables. Member lookup walks the base-type chain,
//! so `Style` resolves on a `Paragraph` through `Block` and `TextElement` up to
//! `FrameworkContentElement`.

use super::{XamlValue, PRESENTATION_NAMESPACE, XAML_NAMESPACE};
use crate::error::RenderError;
use serde::Serialize;

/// How a member's value is turned into its markup string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    String,
    Int32,
    Double,
    Boolean,
    Uri,
    /// An enumeration, identified by its type name.
    Enum(&'static str),
    GridLength,
    /// Any scalar, stringified as is.
    Object,
}

impl Converter {
    /// Convert a value to the string a textual sink receives.
    ///
    /// Strings always pass through unchanged; anything else must match the converter.
    pub fn to_text(self, member: &str, value: &XamlValue) -> Result<String, RenderError> {
        let accepted = match (self, value) {
            (_, XamlValue::String(s)) => return Ok(s.clone()),
            (Converter::Object, _) => true,
            (Converter::Int32, XamlValue::Int(n)) => i32::try_from(*n).is_ok(),
            (Converter::Double, XamlValue::Int(_) | XamlValue::Double(_)) => true,
            (Converter::Boolean, XamlValue::Bool(_)) => true,
            (Converter::Uri, XamlValue::Uri(_)) => true,
            (Converter::Enum(expected), XamlValue::Enum { type_name, .. }) => {
                expected == *type_name
            }
            (Converter::GridLength, XamlValue::GridLength(_)) => true,
            _ => false,
        };
        if accepted {
            Ok(value.to_string())
        } else {
            Err(RenderError::Conversion {
                member: member.to_string(),
                value: format!("{value:?}"),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Property,
    /// Declared on one type, settable on any object (`ToolTipService.ToolTip`).
    Attached,
    /// A language-level member such as the positional parameters of a markup extension.
    Directive,
}

/// A member as declared in a type table.
#[derive(Debug)]
pub struct MemberDef {
    pub name: &'static str,
    pub converter: Converter,
    pub collection: bool,
    pub attachable: bool,
}

const fn prop(name: &'static str, converter: Converter) -> MemberDef {
    MemberDef {
        name,
        converter,
        collection: false,
        attachable: false,
    }
}

const fn items(name: &'static str) -> MemberDef {
    MemberDef {
        name,
        converter: Converter::Object,
        collection: true,
        attachable: false,
    }
}

const fn attachable(name: &'static str, converter: Converter) -> MemberDef {
    MemberDef {
        name,
        converter,
        collection: false,
        attachable: true,
    }
}

/// A type the writer can instantiate.
#[derive(Debug)]
pub struct XamlType {
    pub name: &'static str,
    pub namespace: &'static str,
    pub base: Option<&'static str>,
    pub content_property: Option<&'static str>,
    pub members: &'static [MemberDef],
    pub markup_extension: bool,
}

impl PartialEq for XamlType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

/// A resolved member, tied to the type that declares it.
#[derive(Debug, Clone, PartialEq)]
pub struct XamlMember {
    pub owner: &'static str,
    pub name: &'static str,
    pub converter: Converter,
    pub kind: MemberKind,
    pub collection: bool,
}

impl XamlMember {
    /// Positional arguments of a markup extension, e.g. the key of `{StaticResource Key}`.
    pub const POSITIONAL_PARAMETERS: XamlMember = XamlMember {
        owner: "x",
        name: "_PositionalParameters",
        converter: Converter::Object,
        kind: MemberKind::Directive,
        collection: true,
    };

    fn from_def(owner: &'static str, def: &MemberDef, kind: MemberKind) -> Self {
        XamlMember {
            owner,
            name: def.name,
            converter: def.converter,
            kind,
            collection: def.collection,
        }
    }

    pub fn qualified_name(&self) -> String {
        match self.kind {
            MemberKind::Directive => format!("x:{}", self.name),
            _ => format!("{}.{}", self.owner, self.name),
        }
    }
}

const P: &str = PRESENTATION_NAMESPACE;

const fn ty(
    name: &'static str,
    base: Option<&'static str>,
    content_property: Option<&'static str>,
    members: &'static [MemberDef],
) -> XamlType {
    XamlType {
        name,
        namespace: P,
        base,
        content_property,
        members,
        markup_extension: false,
    }
}

const NONE: &[MemberDef] = &[];

const FRAMEWORK_CONTENT_ELEMENT: [MemberDef; 4] = [
    prop("Style", Converter::Object),
    prop("ToolTip", Converter::Object),
    prop("Tag", Converter::Object),
    prop("Name", Converter::String),
];
const FRAMEWORK_ELEMENT: [MemberDef; 6] = [
    prop("Style", Converter::Object),
    prop("ToolTip", Converter::Object),
    prop("Tag", Converter::Object),
    prop("Name", Converter::String),
    prop("Width", Converter::Double),
    prop("Height", Converter::Double),
];
const TEXT_ELEMENT: [MemberDef; 2] = [
    prop("FontFamily", Converter::String),
    prop("FontSize", Converter::Double),
];
const BLOCK: [MemberDef; 2] = [
    prop("TextAlignment", Converter::Enum("TextAlignment")),
    prop("Margin", Converter::String),
];
const FLOW_DOCUMENT: [MemberDef; 2] = [items("Blocks"), items("Resources")];
const INLINES: [MemberDef; 1] = [items("Inlines")];
const BLOCKS: [MemberDef; 1] = [items("Blocks")];
const LIST: [MemberDef; 3] = [
    items("ListItems"),
    prop("MarkerStyle", Converter::Enum("TextMarkerStyle")),
    prop("StartIndex", Converter::Int32),
];
const TABLE: [MemberDef; 3] = [
    items("RowGroups"),
    items("Columns"),
    prop("CellSpacing", Converter::Double),
];
const TABLE_COLUMN: [MemberDef; 1] = [prop("Width", Converter::GridLength)];
const TABLE_ROW_GROUP: [MemberDef; 1] = [items("Rows")];
const TABLE_ROW: [MemberDef; 1] = [items("Cells")];
const TABLE_CELL: [MemberDef; 4] = [
    items("Blocks"),
    prop("ColumnSpan", Converter::Int32),
    prop("RowSpan", Converter::Int32),
    prop("TextAlignment", Converter::Enum("TextAlignment")),
];
const RUN: [MemberDef; 1] = [prop("Text", Converter::String)];
const HYPERLINK: [MemberDef; 1] = [prop("NavigateUri", Converter::Uri)];
const IMAGE: [MemberDef; 1] = [prop("Source", Converter::Uri)];
const TOOL_TIP_SERVICE: [MemberDef; 1] = [attachable("ToolTip", Converter::Object)];
const STATIC_RESOURCE: [MemberDef; 1] = [prop("ResourceKey", Converter::Object)];
const STATIC: [MemberDef; 1] = [prop("Member", Converter::String)];

const FLOW_DOCUMENT_TYPES: [XamlType; 26] = [
    ty("FrameworkContentElement", None, None, &FRAMEWORK_CONTENT_ELEMENT),
    ty("FrameworkElement", None, None, &FRAMEWORK_ELEMENT),
    ty("TextElement", Some("FrameworkContentElement"), None, &TEXT_ELEMENT),
    ty("Block", Some("TextElement"), None, &BLOCK),
    ty("Inline", Some("TextElement"), None, NONE),
    ty("FlowDocument", Some("FrameworkContentElement"), Some("Blocks"), &FLOW_DOCUMENT),
    ty("Paragraph", Some("Block"), Some("Inlines"), &INLINES),
    ty("Section", Some("Block"), Some("Blocks"), &BLOCKS),
    ty("List", Some("Block"), Some("ListItems"), &LIST),
    ty("ListItem", Some("TextElement"), Some("Blocks"), &BLOCKS),
    ty("Table", Some("Block"), Some("RowGroups"), &TABLE),
    ty("TableColumn", Some("FrameworkContentElement"), None, &TABLE_COLUMN),
    ty("TableRowGroup", Some("TextElement"), Some("Rows"), &TABLE_ROW_GROUP),
    ty("TableRow", Some("TextElement"), Some("Cells"), &TABLE_ROW),
    ty("TableCell", Some("TextElement"), Some("Blocks"), &TABLE_CELL),
    ty("Run", Some("Inline"), Some("Text"), &RUN),
    ty("Span", Some("Inline"), Some("Inlines"), &INLINES),
    ty("Bold", Some("Span"), None, NONE),
    ty("Italic", Some("Span"), None, NONE),
    ty("Underline", Some("Span"), None, NONE),
    ty("Hyperlink", Some("Span"), None, &HYPERLINK),
    ty("LineBreak", Some("Inline"), None, NONE),
    ty("Image", Some("FrameworkElement"), None, &IMAGE),
    ty("ToolTipService", None, None, &TOOL_TIP_SERVICE),
    XamlType {
        name: "StaticResourceExtension",
        namespace: P,
        base: None,
        content_property: None,
        members: &STATIC_RESOURCE,
        markup_extension: true,
    },
    XamlType {
        name: "StaticExtension",
        namespace: XAML_NAMESPACE,
        base: None,
        content_property: None,
        members: &STATIC,
        markup_extension: true,
    },
];

/// A closed set of types the writer resolves against.
#[derive(Debug, Clone, Copy)]
pub struct XamlSchema {
    types: &'static [XamlType],
}

impl XamlSchema {
    /// The flow document vocabulary.
    pub const FLOW_DOCUMENT: XamlSchema = XamlSchema {
        types: &FLOW_DOCUMENT_TYPES,
    };

    pub fn get_type(&self, name: &str) -> Result<&'static XamlType, RenderError> {
        self.types
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| RenderError::UnknownType(name.to_string()))
    }

    /// Resolve an element name as written in markup. `x:Static` style names map to their
    /// `...Extension` type in the language namespace.
    pub fn get_type_in(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<&'static XamlType, RenderError> {
        let extension = format!("{name}Extension");
        self.types
            .iter()
            .find(|t| t.namespace == namespace && (t.name == name || t.name == extension))
            .ok_or_else(|| RenderError::UnknownType(name.to_string()))
    }

    /// Resolve a member on `ty` or any of its base types.
    pub fn member(&self, ty: &XamlType, name: &str) -> Result<XamlMember, RenderError> {
        let mut current = Some(ty);
        while let Some(t) = current {
            if let Some(def) = t.members.iter().find(|m| m.name == name && !m.attachable) {
                return Ok(XamlMember::from_def(t.name, def, MemberKind::Property));
            }
            current = match t.base {
                Some(base) => Some(self.get_type(base)?),
                None => None,
            };
        }
        Err(RenderError::unknown_member(ty.name, name))
    }

    /// Resolve an attached member such as `ToolTipService.ToolTip`.
    pub fn attachable_member(&self, owner: &str, name: &str) -> Result<XamlMember, RenderError> {
        let owner_type = self.get_type(owner)?;
        owner_type
            .members
            .iter()
            .find(|m| m.name == name && m.attachable)
            .map(|def| XamlMember::from_def(owner_type.name, def, MemberKind::Attached))
            .ok_or_else(|| RenderError::unknown_member(owner, name))
    }

    /// The member that receives child items, inherited through the base chain.
    pub fn content_member(&self, ty: &XamlType) -> Result<XamlMember, RenderError> {
        let mut current = Some(ty);
        while let Some(t) = current {
            if let Some(content) = t.content_property {
                return self.member(t, content);
            }
            current = match t.base {
                Some(base) => Some(self.get_type(base)?),
                None => None,
            };
        }
        Err(RenderError::NoContentProperty(ty.name.to_string()))
    }
}

impl Default for XamlSchema {
    fn default() -> Self {
        XamlSchema::FLOW_DOCUMENT
    }
}
