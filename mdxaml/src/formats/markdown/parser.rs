//! Markdown parsing (Markdown → input tree)
//!
//! Pipeline: Markdown string → Comrak AST → [`crate::ast::Document`]

use super::MarkdownExtensions;
use crate::ast::{
    Autolink, Block, CodeBlock, ColumnAlignment, ColumnDefinition, Document, Emphasis, Heading,
    Inline, Link, List, ListItem, Paragraph, Quote, Table, TableCell, TableRow,
};
use crate::error::FormatError;
use comrak::nodes::{AstNode, ListType, NodeValue, TableAlignment};
use comrak::{parse_document, Arena, ComrakOptions};

/// Parse a Markdown string into the input tree.
pub fn parse_markdown(
    source: &str,
    extensions: &MarkdownExtensions,
) -> Result<Document, FormatError> {
    let arena = Arena::new();
    let options = comrak_options(extensions);
    let root = parse_document(&arena, source, &options);

    let blocks = collect_blocks(root)?;
    tracing::debug!(blocks = blocks.len(), "parsed markdown");
    Ok(Document::new(blocks))
}

fn comrak_options(extensions: &MarkdownExtensions) -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = extensions.tables;
    options.extension.strikethrough = extensions.strikethrough;
    options.extension.autolink = extensions.autolink;
    options.extension.tasklist = extensions.tasklist;
    options.extension.superscript = extensions.superscript;
    options.extension.front_matter_delimiter = extensions
        .front_matter
        .then(|| "---".to_string());
    options
}

fn collect_blocks<'a>(node: &'a AstNode<'a>) -> Result<Vec<Block>, FormatError> {
    let mut blocks = Vec::new();
    for child in node.children() {
        if let Some(block) = convert_block(child)? {
            blocks.push(block);
        }
    }
    Ok(blocks)
}

fn convert_block<'a>(node: &'a AstNode<'a>) -> Result<Option<Block>, FormatError> {
    let block = match &node.data.borrow().value {
        NodeValue::Paragraph => Block::Paragraph(Paragraph {
            inlines: collect_inlines(node),
        }),

        NodeValue::Heading(heading) => Block::Heading(Heading {
            level: heading.level,
            inlines: collect_inlines(node),
        }),

        NodeValue::CodeBlock(code_block) => {
            let info = (!code_block.info.is_empty()).then(|| code_block.info.clone());
            Block::CodeBlock(CodeBlock::from_literal(info, &code_block.literal))
        }

        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let start = ordered.then(|| u32::try_from(list.start).unwrap_or(u32::MAX));
            let mut items = Vec::new();
            for item in node.children() {
                items.push(convert_list_item(item)?);
            }
            Block::List(List {
                ordered,
                start,
                items,
            })
        }

        NodeValue::BlockQuote => Block::Quote(Quote {
            blocks: collect_blocks(node)?,
        }),

        NodeValue::ThematicBreak => Block::ThematicBreak,

        NodeValue::HtmlBlock(html) => Block::Html(html.literal.clone()),

        NodeValue::Table(table) => {
            let columns = table
                .alignments
                .iter()
                .map(|alignment| ColumnDefinition {
                    width: 0.0,
                    alignment: match alignment {
                        TableAlignment::Left => Some(ColumnAlignment::Left),
                        TableAlignment::Center => Some(ColumnAlignment::Center),
                        TableAlignment::Right => Some(ColumnAlignment::Right),
                        TableAlignment::None => None,
                    },
                })
                .collect();
            let mut rows = Vec::new();
            for row in node.children() {
                rows.push(convert_table_row(row)?);
            }
            Block::Table(Table { columns, rows })
        }

        // Front matter is metadata, not content
        NodeValue::FrontMatter(_) => return Ok(None),

        _ => {
            tracing::trace!("skipping unsupported markdown block");
            return Ok(None);
        }
    };
    Ok(Some(block))
}

fn convert_list_item<'a>(node: &'a AstNode<'a>) -> Result<ListItem, FormatError> {
    let task = match &node.data.borrow().value {
        NodeValue::Item(_) => None,
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => {
            return Err(FormatError::ParseError(
                "list contains a non-item child".to_string(),
            ))
        }
    };
    let mut blocks = collect_blocks(node)?;
    if let Some(checked) = task {
        let marker = Inline::TaskMarker { checked };
        match blocks.first_mut() {
            Some(Block::Paragraph(paragraph)) => paragraph.inlines.insert(0, marker),
            _ => blocks.insert(
                0,
                Block::Paragraph(Paragraph {
                    inlines: vec![marker],
                }),
            ),
        }
    }
    Ok(ListItem { blocks })
}

fn convert_table_row<'a>(node: &'a AstNode<'a>) -> Result<TableRow, FormatError> {
    let is_header = match &node.data.borrow().value {
        NodeValue::TableRow(header) => *header,
        _ => {
            return Err(FormatError::ParseError(
                "table contains a non-row child".to_string(),
            ))
        }
    };
    let cells = node
        .children()
        .map(|cell| {
            let inlines = collect_inlines(cell);
            let blocks = if inlines.is_empty() {
                Vec::new()
            } else {
                vec![Block::Paragraph(Paragraph { inlines })]
            };
            TableCell::new(blocks)
        })
        .collect();
    Ok(TableRow { is_header, cells })
}

fn collect_inlines<'a>(node: &'a AstNode<'a>) -> Vec<Inline> {
    node.children().filter_map(convert_inline).collect()
}

fn convert_inline<'a>(node: &'a AstNode<'a>) -> Option<Inline> {
    let emphasis = |delimiter: char, count: u8| {
        Inline::Emphasis(Emphasis {
            delimiter,
            count,
            children: collect_inlines(node),
        })
    };
    let inline = match &node.data.borrow().value {
        NodeValue::Text(text) => Inline::Text(text.clone()),
        NodeValue::SoftBreak => Inline::LineBreak { hard: false },
        NodeValue::LineBreak => Inline::LineBreak { hard: true },
        NodeValue::Code(code) => Inline::Code(code.literal.clone()),
        NodeValue::Emph => emphasis('*', 1),
        NodeValue::Strong => emphasis('*', 2),
        NodeValue::Strikethrough => emphasis('~', 2),
        NodeValue::Superscript => emphasis('^', 2),
        NodeValue::HtmlInline(html) => Inline::Raw(html.clone()),
        NodeValue::Link(link) => {
            let text = plain_text(node);
            if text == link.url {
                Inline::Autolink(Autolink {
                    url: link.url.clone(),
                    is_email: false,
                })
            } else if link.url.strip_prefix("mailto:") == Some(text.as_str()) {
                Inline::Autolink(Autolink {
                    url: text,
                    is_email: true,
                })
            } else {
                Inline::Link(Link {
                    url: link.url.clone(),
                    title: (!link.title.is_empty()).then(|| link.title.clone()),
                    is_image: false,
                    children: collect_inlines(node),
                })
            }
        }
        NodeValue::Image(link) => Inline::Link(Link {
            url: link.url.clone(),
            title: (!link.title.is_empty()).then(|| link.title.clone()),
            is_image: true,
            children: collect_inlines(node),
        }),
        _ => {
            tracing::trace!("skipping unsupported markdown inline");
            return None;
        }
    };
    Some(inline)
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.descendants().skip(1) {
        if let NodeValue::Text(text) = &child.data.borrow().value {
            out.push_str(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(md: &str) -> Document {
        parse_markdown(md, &MarkdownExtensions::default()).unwrap()
    }

    #[test]
    fn test_simple_paragraph() {
        let doc = parse("This is a simple paragraph.\n");
        assert_eq!(doc.blocks, vec![Block::paragraph("This is a simple paragraph.")]);
    }

    #[test]
    fn test_heading_level() {
        let doc = parse("### Third\n");
        assert!(matches!(&doc.blocks[0], Block::Heading(h) if h.level == 3));
    }

    #[test]
    fn test_code_block_lines() {
        let doc = parse("```rust\nfn main() {}\n    indented\n```\n");
        let Block::CodeBlock(code) = &doc.blocks[0] else {
            panic!("expected code block");
        };
        assert_eq!(code.info.as_deref(), Some("rust"));
        assert_eq!(code.lines, vec!["fn main() {}", "    indented"]);
    }

    #[test]
    fn test_ordered_list_start() {
        let doc = parse("3. three\n4. four\n");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert!(list.ordered);
        assert_eq!(list.start, Some(3));
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_emphasis_delimiters() {
        let doc = parse("*a* **b** ~~c~~\n");
        let Block::Paragraph(p) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        let delimiters: Vec<(char, u8)> = p
            .inlines
            .iter()
            .filter_map(|i| match i {
                Inline::Emphasis(e) => Some((e.delimiter, e.count)),
                _ => None,
            })
            .collect();
        assert_eq!(delimiters, vec![('*', 1), ('*', 2), ('~', 2)]);
    }

    #[test]
    fn test_autolinks() {
        let doc = parse("<https://example.com> and someone@example.com\n");
        let Block::Paragraph(p) = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(p.inlines.contains(&Inline::Autolink(Autolink {
            url: "https://example.com".to_string(),
            is_email: false,
        })));
        assert!(p.inlines.contains(&Inline::Autolink(Autolink {
            url: "someone@example.com".to_string(),
            is_email: true,
        })));
    }

    #[test]
    fn test_task_items() {
        let doc = parse("- [x] done\n- [ ] todo\n");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        let first = &list.items[0].blocks[0];
        assert!(matches!(first, Block::Paragraph(p)
            if p.inlines[0] == Inline::TaskMarker { checked: true }));
        let second = &list.items[1].blocks[0];
        assert!(matches!(second, Block::Paragraph(p)
            if p.inlines[0] == Inline::TaskMarker { checked: false }));
    }

    #[test]
    fn test_table_parsing() {
        let doc = parse("| A | B |\n|:-|-:|\n| 1 | 2 |\n");
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(
            table.columns.iter().map(|c| c.alignment).collect::<Vec<_>>(),
            vec![Some(ColumnAlignment::Left), Some(ColumnAlignment::Right)]
        );
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].is_header);
        assert!(!table.rows[1].is_header);
        assert_eq!(table.rows[1].cells.len(), 2);
    }

    #[test]
    fn test_html_is_kept_raw() {
        let doc = parse("<div>block</div>\n\ntext <b>bold</b>\n");
        assert!(matches!(&doc.blocks[0], Block::Html(html) if html.starts_with("<div>")));
        let Block::Paragraph(p) = &doc.blocks[1] else {
            panic!("expected paragraph");
        };
        assert!(p.inlines.contains(&Inline::Raw("<b>".to_string())));
    }

    #[test]
    fn test_front_matter_is_skipped() {
        let doc = parse("---\ntitle: x\n---\n\nBody\n");
        assert_eq!(doc.blocks, vec![Block::paragraph("Body")]);
    }
}
