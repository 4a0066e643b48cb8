use super::{mismatch, MarkdownRenderer};
use crate::ast::{Block, ColumnAlignment, ColumnDefinition, TableCell};
use crate::error::RenderError;
use crate::styles::StyleRole;
use crate::xaml::{GridLength, TextAlignment, XamlSink, XamlValue};

/// The column a cell takes its alignment from. A missing or out-of-range declared index falls
/// back to the cell's position, clamped to the last column.
pub(crate) fn effective_column(cell: &TableCell, position: usize, columns: usize) -> Option<usize> {
    if columns == 0 {
        return None;
    }
    let index = cell
        .column_index
        .filter(|index| *index < columns)
        .unwrap_or(position);
    Some(index.min(columns - 1))
}

fn column_width(column: &ColumnDefinition) -> GridLength {
    if column.width > 0.0 {
        GridLength::Star(column.width)
    } else {
        GridLength::Auto
    }
}

fn text_alignment(alignment: ColumnAlignment) -> TextAlignment {
    match alignment {
        ColumnAlignment::Left => TextAlignment::Left,
        ColumnAlignment::Center => TextAlignment::Center,
        ColumnAlignment::Right => TextAlignment::Right,
    }
}

fn span(n: u32) -> Option<XamlValue> {
    (n > 1).then(|| XamlValue::Int(n.into()))
}

pub(super) fn table<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::Table(table) = block else {
        return Err(mismatch("table"));
    };
    let writer = r.writer();
    writer.start_object("Table")?;
    writer.write_resource_member(None, StyleRole::Table)?;

    writer.start_items("Columns", false)?;
    for column in &table.columns {
        writer.start_object("TableColumn")?;
        writer.write_member("Width", Some(column_width(column).into()))?;
        writer.end_object()?;
    }
    writer.end_items()?;

    writer.start_content_items(false)?;
    writer.start_object("TableRowGroup")?;
    writer.start_content_items(false)?;
    for row in &table.rows {
        r.writer().start_object("TableRow")?;
        if row.is_header {
            r.writer()
                .write_resource_member(None, StyleRole::TableHeader)?;
        }
        r.writer().start_content_items(false)?;
        for (position, cell) in row.cells.iter().enumerate() {
            let writer = r.writer();
            writer.start_object("TableCell")?;
            writer.write_resource_member(None, StyleRole::TableCell)?;
            writer.write_member("ColumnSpan", span(cell.column_span))?;
            writer.write_member("RowSpan", span(cell.row_span))?;
            let alignment = effective_column(cell, position, table.columns.len())
                .and_then(|index| table.columns[index].alignment)
                .map(|alignment| text_alignment(alignment).to_value());
            writer.write_member("TextAlignment", alignment)?;
            r.write_items_blocks(&cell.blocks)?;
            r.writer().end_object()?;
        }
        r.writer().end_items()?;
        r.writer().end_object()?;
    }
    let writer = r.writer();
    writer.end_items()?;
    writer.end_object()?;
    writer.end_items()?;
    writer.end_object()
}
