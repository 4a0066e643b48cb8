//! Input document tree consumed by the renderer.
//!
//! The tree is produced by a Markdown parser (see [`crate::formats::markdown`])
//! or built by hand. Rendering only reads it.

/// The root of a parsed document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Document { blocks }
    }
}

/// A structural unit of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Heading(Heading),
    CodeBlock(CodeBlock),
    List(List),
    Quote(Quote),
    ThematicBreak,
    Table(Table),
    /// Raw block-level markup, replayed through the passthrough handler.
    Html(String),
    Custom(CustomBlock),
}

impl Block {
    /// The dispatch tag used to look up this block's handler.
    pub fn kind(&self) -> &str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::Heading(_) => "heading",
            Block::CodeBlock(_) => "code_block",
            Block::List(_) => "list",
            Block::Quote(_) => "quote",
            Block::ThematicBreak => "thematic_break",
            Block::Table(_) => "table",
            Block::Html(_) => "html",
            Block::Custom(custom) => &custom.kind,
        }
    }

    /// Convenience constructor for a paragraph of plain text.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(Paragraph {
            inlines: vec![Inline::Text(text.into())],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub inlines: Vec<Inline>,
}

/// A fenced or indented code block, kept as its raw source lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlock {
    pub info: Option<String>,
    pub lines: Vec<String>,
}

impl CodeBlock {
    pub fn from_literal(info: Option<String>, literal: &str) -> Self {
        let literal = literal.strip_suffix('\n').unwrap_or(literal);
        let lines = if literal.is_empty() {
            Vec::new()
        } else {
            literal.split('\n').map(str::to_string).collect()
        };
        CodeBlock { info, lines }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct List {
    pub ordered: bool,
    /// Start number of an ordered list; `None` means the default (1).
    pub start: Option<u32>,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quote {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<TableRow>,
}

/// Column metadata. A `width` of zero means no width hint was given.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnDefinition {
    pub width: f64,
    pub alignment: Option<ColumnAlignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAlignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub is_header: bool,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    /// Declared column; `None` means the cell's position in the row.
    pub column_index: Option<usize>,
    pub column_span: u32,
    pub row_span: u32,
    pub blocks: Vec<Block>,
}

impl TableCell {
    pub fn new(blocks: Vec<Block>) -> Self {
        TableCell {
            column_index: None,
            column_span: 1,
            row_span: 1,
            blocks,
        }
    }
}

/// A block kind the built-in handlers do not know about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomBlock {
    pub kind: String,
    pub blocks: Vec<Block>,
    pub inlines: Vec<Inline>,
}

/// A span-level unit inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    LineBreak { hard: bool },
    Code(String),
    Emphasis(Emphasis),
    Delimiter(Delimiter),
    Link(Link),
    Autolink(Autolink),
    /// Entity or inline markup passed through verbatim.
    Raw(String),
    TaskMarker { checked: bool },
    Custom(CustomInline),
}

impl Inline {
    /// The dispatch tag used to look up this inline's handler.
    pub fn kind(&self) -> &str {
        match self {
            Inline::Text(_) => "text",
            Inline::LineBreak { .. } => "line_break",
            Inline::Code(_) => "code",
            Inline::Emphasis(_) => "emphasis",
            Inline::Delimiter(_) => "delimiter",
            Inline::Link(_) => "link",
            Inline::Autolink(_) => "autolink",
            Inline::Raw(_) => "raw",
            Inline::TaskMarker { .. } => "task_list",
            Inline::Custom(custom) => &custom.kind,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(text.into())
    }
}

/// An emphasis run: the delimiter character and how many of them opened it.
#[derive(Debug, Clone, PartialEq)]
pub struct Emphasis {
    pub delimiter: char,
    pub count: u8,
    pub children: Vec<Inline>,
}

/// A delimiter run the parser could not match; rendered as literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct Delimiter {
    pub literal: String,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub url: String,
    pub title: Option<String>,
    pub is_image: bool,
    pub children: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Autolink {
    pub url: String,
    pub is_email: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomInline {
    pub kind: String,
    pub children: Vec<Inline>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_block_splits_literal_lines() {
        let block = CodeBlock::from_literal(None, "a\n  b\n");
        assert_eq!(block.lines, vec!["a".to_string(), "  b".to_string()]);
    }

    #[test]
    fn empty_code_block_has_no_lines() {
        assert!(CodeBlock::from_literal(None, "").lines.is_empty());
        assert!(CodeBlock::from_literal(None, "\n").lines.is_empty());
    }

    #[test]
    fn custom_kinds_report_their_tag() {
        let block = Block::Custom(CustomBlock {
            kind: "admonition".to_string(),
            ..Default::default()
        });
        assert_eq!(block.kind(), "admonition");

        let inline = Inline::Custom(CustomInline {
            kind: "mention".to_string(),
            children: vec![],
        });
        assert_eq!(inline.kind(), "mention");
    }
}
