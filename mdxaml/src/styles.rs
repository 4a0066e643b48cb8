//! Style roles and resource keys
//!
//!     Every styled element the renderers emit names a role from a closed set. A role resolves
//!     to a symbolic resource key, `<Role>StyleKey` by default, which the writer attaches as a
//!     `StaticResource` reference. The actual styles live in the consuming application; this
//!     module only ever produces names.
//!
//!     Overrides are installed once, when the [`StyleTable`] is built, and are never mutated
//!     while rendering.

use crate::error::RenderError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A named styling slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleRole {
    Document,
    Code,
    CodeBlock,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Image,
    Inserted,
    Marked,
    QuoteBlock,
    StrikeThrough,
    Subscript,
    Superscript,
    Table,
    TableCell,
    TableHeader,
    TaskList,
    ThematicBreak,
    Hyperlink,
}

impl StyleRole {
    pub const ALL: [StyleRole; 22] = [
        StyleRole::Document,
        StyleRole::Code,
        StyleRole::CodeBlock,
        StyleRole::Heading1,
        StyleRole::Heading2,
        StyleRole::Heading3,
        StyleRole::Heading4,
        StyleRole::Heading5,
        StyleRole::Heading6,
        StyleRole::Image,
        StyleRole::Inserted,
        StyleRole::Marked,
        StyleRole::QuoteBlock,
        StyleRole::StrikeThrough,
        StyleRole::Subscript,
        StyleRole::Superscript,
        StyleRole::Table,
        StyleRole::TableCell,
        StyleRole::TableHeader,
        StyleRole::TaskList,
        StyleRole::ThematicBreak,
        StyleRole::Hyperlink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StyleRole::Document => "Document",
            StyleRole::Code => "Code",
            StyleRole::CodeBlock => "CodeBlock",
            StyleRole::Heading1 => "Heading1",
            StyleRole::Heading2 => "Heading2",
            StyleRole::Heading3 => "Heading3",
            StyleRole::Heading4 => "Heading4",
            StyleRole::Heading5 => "Heading5",
            StyleRole::Heading6 => "Heading6",
            StyleRole::Image => "Image",
            StyleRole::Inserted => "Inserted",
            StyleRole::Marked => "Marked",
            StyleRole::QuoteBlock => "QuoteBlock",
            StyleRole::StrikeThrough => "StrikeThrough",
            StyleRole::Subscript => "Subscript",
            StyleRole::Superscript => "Superscript",
            StyleRole::Table => "Table",
            StyleRole::TableCell => "TableCell",
            StyleRole::TableHeader => "TableHeader",
            StyleRole::TaskList => "TaskList",
            StyleRole::ThematicBreak => "ThematicBreak",
            StyleRole::Hyperlink => "Hyperlink",
        }
    }

    /// Heading role for a level; levels outside 1..=6 are clamped.
    pub fn heading(level: u8) -> StyleRole {
        match level {
            0 | 1 => StyleRole::Heading1,
            2 => StyleRole::Heading2,
            3 => StyleRole::Heading3,
            4 => StyleRole::Heading4,
            5 => StyleRole::Heading5,
            _ => StyleRole::Heading6,
        }
    }

    /// The built-in key for this role.
    pub fn default_key(self) -> ResourceKey {
        ResourceKey::new(format!("{}StyleKey", self.name()))
    }
}

impl fmt::Display for StyleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleRole {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleRole::ALL
            .iter()
            .copied()
            .find(|role| role.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RenderError::UnknownStyleRole(s.to_string()))
    }
}

/// A symbolic name for a style resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(name: impl Into<String>) -> Self {
        ResourceKey(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(name: &str) -> Self {
        ResourceKey::new(name)
    }
}

/// Static declaration of the class that exposes the style keys as members.
///
/// Textual output refers to a known key as `{x:Static prefix:TypeName.Key}`, which requires
/// the `prefix` namespace to be declared on the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceKeyStore {
    pub type_name: String,
    pub prefix: String,
    pub clr_namespace: String,
    pub assembly: String,
    keys: Vec<ResourceKey>,
}

impl ResourceKeyStore {
    pub fn new(
        type_name: impl Into<String>,
        prefix: impl Into<String>,
        clr_namespace: impl Into<String>,
        assembly: impl Into<String>,
    ) -> Self {
        ResourceKeyStore {
            type_name: type_name.into(),
            prefix: prefix.into(),
            clr_namespace: clr_namespace.into(),
            assembly: assembly.into(),
            keys: StyleRole::ALL.iter().map(|r| r.default_key()).collect(),
        }
    }

    /// Declare an additional key as a member of the store.
    pub fn with_key(mut self, key: impl Into<ResourceKey>) -> Self {
        let key = key.into();
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
        self
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.keys.contains(key)
    }

    pub fn keys(&self) -> &[ResourceKey] {
        &self.keys
    }

    /// The xmlns uri under which `prefix` is declared.
    pub fn namespace_uri(&self) -> String {
        format!(
            "clr-namespace:{};assembly={}",
            self.clr_namespace, self.assembly
        )
    }

    /// The `x:Static` member reference for a key, e.g. `xmarkdig:MarkdownXaml.CodeStyleKey`.
    pub fn static_reference(&self, key: &ResourceKey) -> String {
        format!("{}:{}.{}", self.prefix, self.type_name, key)
    }
}

impl Default for ResourceKeyStore {
    fn default() -> Self {
        ResourceKeyStore::new("MarkdownXaml", "xmarkdig", "Neo.Markdig.Xaml", "Neo.Markdig.Xaml")
    }
}

/// Maps roles to keys, falling back to the built-in key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    overrides: HashMap<StyleRole, ResourceKey>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, role: StyleRole, key: impl Into<ResourceKey>) -> Self {
        self.overrides.insert(role, key.into());
        self
    }

    /// Build a table from role names, as read from configuration.
    pub fn from_names<'a, I>(entries: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = StyleTable::new();
        for (role, key) in entries {
            let role: StyleRole = role.parse()?;
            table.overrides.insert(role, ResourceKey::new(key));
        }
        Ok(table)
    }

    pub fn resolve(&self, role: StyleRole) -> ResourceKey {
        self.overrides
            .get(&role)
            .cloned()
            .unwrap_or_else(|| role.default_key())
    }

    pub fn is_overridden(&self, role: StyleRole) -> bool {
        self.overrides.contains_key(&role)
    }
}
