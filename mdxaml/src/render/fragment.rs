//! Raw markup passthrough
//!
//! Raw fragments (HTML blocks, inline HTML, entities) are parsed as XAML and replayed through
//! the writer: each element becomes an object, each attribute a member, child nodes go into
//! the content collection and text goes through the text buffer. Unprefixed elements resolve
//! in the presentation namespace. Fragment namespaces are only used for lookup; nothing is
//! re-declared on the output root.
//!
//! Property-element syntax (`<Table.Columns>`), namespaced attributes and fragments that are
//! not well-formed are rejected with [`RenderError::UnsupportedFragment`].

use super::{mismatch, MarkdownRenderer, RawMarkupPolicy};
use crate::ast::{Block, Inline};
use crate::error::RenderError;
use crate::writer::XamlWriter;
use crate::xaml::{XamlSink, XamlValue, PRESENTATION_NAMESPACE, XAML_NAMESPACE};
use roxmltree::Node;

/// Parse `fragment` and replay it into the writer's current collection.
pub fn replay_fragment<S: XamlSink>(
    writer: &mut XamlWriter<S>,
    fragment: &str,
) -> Result<(), RenderError> {
    if !fragment.contains('<') {
        let text = quick_xml::escape::unescape(fragment)
            .map_err(|e| RenderError::unsupported_fragment(fragment, e.to_string()))?;
        return writer.write_text(&text);
    }

    let wrapped = format!(
        "<fragment xmlns=\"{PRESENTATION_NAMESPACE}\" xmlns:x=\"{XAML_NAMESPACE}\">{fragment}</fragment>"
    );
    let doc = roxmltree::Document::parse(&wrapped)
        .map_err(|e| RenderError::unsupported_fragment(fragment, e.to_string()))?;
    tracing::trace!(fragment, "replaying raw markup");
    replay_children(writer, doc.root_element(), fragment)
}

fn replay_children<S: XamlSink>(
    writer: &mut XamlWriter<S>,
    node: Node,
    fragment: &str,
) -> Result<(), RenderError> {
    for child in node.children() {
        if child.is_element() {
            replay_element(writer, child, fragment)?;
        } else if let Some(text) = child.text().filter(|_| child.is_text()) {
            writer.write_text(text)?;
        }
    }
    Ok(())
}

fn replay_element<S: XamlSink>(
    writer: &mut XamlWriter<S>,
    node: Node,
    fragment: &str,
) -> Result<(), RenderError> {
    let tag = node.tag_name();
    if tag.name().contains('.') {
        return Err(RenderError::unsupported_fragment(
            fragment,
            format!("property element <{}> is not supported", tag.name()),
        ));
    }
    let namespace = tag.namespace().unwrap_or(PRESENTATION_NAMESPACE);
    let ty = writer.schema().get_type_in(namespace, tag.name())?;
    writer.start_object_of(ty)?;

    for attribute in node.attributes() {
        if attribute.namespace().is_some() {
            return Err(RenderError::unsupported_fragment(
                fragment,
                format!("namespaced attribute '{}' is not supported", attribute.name()),
            ));
        }
        writer.write_member(attribute.name(), Some(XamlValue::from(attribute.value())))?;
    }

    let has_content = node.children().any(|child| {
        child.is_element() || (child.is_text() && child.text().is_some_and(|t| !t.trim().is_empty()))
    });
    if has_content {
        writer.start_content_items(false)?;
        replay_children(writer, node, fragment)?;
        writer.end_items()?;
    }
    writer.end_object()
}

pub(super) fn raw_inline<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Raw(raw) = inline else {
        return Err(mismatch("raw"));
    };
    match r.options().raw_markup {
        RawMarkupPolicy::Replay => replay_fragment(r.writer(), raw),
        RawMarkupPolicy::Text => r.writer().write_value(raw),
        RawMarkupPolicy::Skip => {
            tracing::debug!(raw = raw.as_str(), "skipping raw inline markup");
            Ok(())
        }
    }
}

pub(super) fn html_block<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    block: &Block,
) -> Result<(), RenderError> {
    let Block::Html(html) = block else {
        return Err(mismatch("html"));
    };
    match r.options().raw_markup {
        RawMarkupPolicy::Replay => replay_fragment(r.writer(), html.trim()),
        RawMarkupPolicy::Text => {
            r.writer().start_object("Paragraph")?;
            r.write_items_text(html, false)?;
            r.writer().end_object()
        }
        RawMarkupPolicy::Skip => {
            tracing::debug!("skipping raw block markup");
            Ok(())
        }
    }
}
