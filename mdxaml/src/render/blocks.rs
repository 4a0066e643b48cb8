use super::{mismatch, MarkdownRenderer};
use crate::ast::Block;
use crate::error::RenderError;
use crate::styles::StyleRole;
use crate::xaml::{TextMarkerStyle, XamlSink, XamlValue};

pub(super) fn paragraph<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::Paragraph(paragraph) = block else {
        return Err(mismatch("paragraph"));
    };
    r.writer().start_object("Paragraph")?;
    r.write_items_inlines(&paragraph.inlines, false)?;
    r.writer().end_object()
}

pub(super) fn heading<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::Heading(heading) = block else {
        return Err(mismatch("heading"));
    };
    r.writer().start_object("Paragraph")?;
    r.writer()
        .write_resource_member(None, StyleRole::heading(heading.level))?;
    r.write_items_inlines(&heading.inlines, false)?;
    r.writer().end_object()
}

pub(super) fn code_block<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::CodeBlock(code) = block else {
        return Err(mismatch("code_block"));
    };
    r.writer().start_object("Paragraph")?;
    r.writer().write_resource_member(None, StyleRole::CodeBlock)?;
    r.write_items_lines(&code.lines)?;
    r.writer().end_object()
}

pub(super) fn list<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::List(list) = block else {
        return Err(mismatch("list"));
    };
    let writer = r.writer();
    writer.start_object("List")?;
    if list.ordered {
        writer.write_member("MarkerStyle", Some(TextMarkerStyle::Decimal.to_value()))?;
        let start = list.start.filter(|start| *start != 1);
        writer.write_member("StartIndex", start.map(|n| XamlValue::Int(n.into())))?;
    } else {
        writer.write_member("MarkerStyle", Some(TextMarkerStyle::Disc.to_value()))?;
    }

    writer.start_content_items(false)?;
    for item in &list.items {
        r.writer().start_object("ListItem")?;
        r.write_items_blocks(&item.blocks)?;
        r.writer().end_object()?;
    }
    r.writer().end_items()?;
    r.writer().end_object()
}

pub(super) fn quote<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::Quote(quote) = block else {
        return Err(mismatch("quote"));
    };
    r.writer().start_object("Section")?;
    r.writer().write_resource_member(None, StyleRole::QuoteBlock)?;
    r.write_items_blocks(&quote.blocks)?;
    r.writer().end_object()
}

pub(super) fn thematic_break<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    if !matches!(block, Block::ThematicBreak) {
        return Err(mismatch("thematic_break"));
    }
    let writer = r.writer();
    writer.start_object("Paragraph")?;
    writer.write_resource_member(None, StyleRole::ThematicBreak)?;
    writer.end_object()
}
