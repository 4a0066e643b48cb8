use super::{mismatch, MarkdownRenderer};
use crate::ast::Inline;
use crate::error::RenderError;
use crate::styles::StyleRole;
use crate::xaml::XamlSink;

/// What an emphasis run becomes: a dedicated element, a styled span, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EmphasisTarget {
    Element(&'static str),
    Styled(StyleRole),
    Unwrapped,
}

pub(crate) fn emphasis_target(delimiter: char, count: u8) -> EmphasisTarget {
    match (delimiter, count) {
        ('*' | '_', 2) => EmphasisTarget::Element("Bold"),
        ('*' | '_', 1) => EmphasisTarget::Element("Italic"),
        ('~', _) => EmphasisTarget::Styled(StyleRole::StrikeThrough),
        ('^', 2) => EmphasisTarget::Styled(StyleRole::Superscript),
        ('^', 1) => EmphasisTarget::Styled(StyleRole::Subscript),
        ('+', _) => EmphasisTarget::Styled(StyleRole::Inserted),
        ('=', _) => EmphasisTarget::Styled(StyleRole::Marked),
        _ => EmphasisTarget::Unwrapped,
    }
}

pub(super) fn text<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Text(text) = inline else {
        return Err(mismatch("text"));
    };
    r.writer().write_text(text)
}

pub(super) fn line_break<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    match inline {
        Inline::LineBreak { hard: true } => r.writer().write_line_break(),
        Inline::LineBreak { hard: false } => r.writer().write_char(' '),
        _ => Err(mismatch("line_break")),
    }
}

pub(super) fn code<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Code(code) = inline else {
        return Err(mismatch("code"));
    };
    r.writer().start_object("Span")?;
    r.writer().write_resource_member(None, StyleRole::Code)?;
    r.write_items_text(code, true)?;
    r.writer().end_object()
}

pub(super) fn emphasis<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Emphasis(emphasis) = inline else {
        return Err(mismatch("emphasis"));
    };
    match emphasis_target(emphasis.delimiter, emphasis.count) {
        EmphasisTarget::Element(name) => {
            r.writer().start_object(name)?;
        }
        EmphasisTarget::Styled(role) => {
            r.writer().start_object("Span")?;
            r.writer().write_resource_member(None, role)?;
        }
        EmphasisTarget::Unwrapped => {
            return emphasis
                .children
                .iter()
                .try_for_each(|child| r.render_inline(child));
        }
    }
    r.write_items_inlines(&emphasis.children, false)?;
    r.writer().end_object()
}

pub(super) fn delimiter<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Delimiter(delimiter) = inline else {
        return Err(mismatch("delimiter"));
    };
    r.writer().write_value(&delimiter.literal)?;
    delimiter
        .children
        .iter()
        .try_for_each(|child| r.render_inline(child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Delimiter, Document, Emphasis, Paragraph};
    use crate::render::{render_document, RenderOptions};
    use crate::styles::ResourceKey;
    use crate::xaml::{EventRecorder, SinkMode, XamlEvent, XamlValue};

    fn events(inlines: Vec<Inline>) -> Vec<XamlEvent> {
        render_document(
            &Document::new(vec![Block::Paragraph(Paragraph { inlines })]),
            EventRecorder::new(SinkMode::Native),
            &RenderOptions::default(),
        )
        .unwrap()
    }

    fn emph(delimiter: char, count: u8, text: &str) -> Inline {
        Inline::Emphasis(Emphasis {
            delimiter,
            count,
            children: vec![Inline::text(text)],
        })
    }

    #[test]
    fn emphasis_mapping() {
        assert_eq!(emphasis_target('*', 2), EmphasisTarget::Element("Bold"));
        assert_eq!(emphasis_target('_', 1), EmphasisTarget::Element("Italic"));
        for count in 1..=3 {
            assert_eq!(
                emphasis_target('~', count),
                EmphasisTarget::Styled(StyleRole::StrikeThrough)
            );
        }
        assert_eq!(
            emphasis_target('^', 2),
            EmphasisTarget::Styled(StyleRole::Superscript)
        );
        assert_eq!(
            emphasis_target('^', 1),
            EmphasisTarget::Styled(StyleRole::Subscript)
        );
        assert_eq!(
            emphasis_target('+', 2),
            EmphasisTarget::Styled(StyleRole::Inserted)
        );
        assert_eq!(
            emphasis_target('=', 2),
            EmphasisTarget::Styled(StyleRole::Marked)
        );
        assert_eq!(emphasis_target('*', 3), EmphasisTarget::Unwrapped);
        assert_eq!(emphasis_target('%', 1), EmphasisTarget::Unwrapped);
    }

    #[test]
    fn strong_and_emphasis_elements() {
        let events = events(vec![emph('*', 2, "bold"), emph('*', 1, "italic")]);
        assert!(events.contains(&XamlEvent::StartObject("Bold")));
        assert!(events.contains(&XamlEvent::StartObject("Italic")));
    }

    #[test]
    fn strike_through_is_a_styled_span() {
        let events = events(vec![emph('~', 2, "gone")]);
        assert!(events.contains(&XamlEvent::StartObject("Span")));
        assert!(events.contains(&XamlEvent::Value(XamlValue::ResourceKey(
            ResourceKey::new("StrikeThroughStyleKey")
        ))));
    }

    #[test]
    fn unknown_delimiter_unwraps_children() {
        let events = events(vec![emph('%', 1, "plain")]);
        assert!(!events.contains(&XamlEvent::StartObject("Span")));
        assert!(events.contains(&XamlEvent::Value("plain".into())));
    }

    #[test]
    fn code_span_preserves_whitespace() {
        let events = events(vec![Inline::text("call "), Inline::Code("f(  x )".into())]);
        assert!(events.contains(&XamlEvent::Value(XamlValue::ResourceKey(
            ResourceKey::new("CodeStyleKey")
        ))));
        assert!(events.contains(&XamlEvent::StartObject("Run")));
        assert!(events.contains(&XamlEvent::Value("f(  x )".into())));
        assert!(events.contains(&XamlEvent::Value("call ".into())));
    }

    #[test]
    fn soft_break_is_a_space_and_hard_break_an_object() {
        let events = events(vec![
            Inline::text("one"),
            Inline::LineBreak { hard: false },
            Inline::text("two"),
            Inline::LineBreak { hard: true },
            Inline::text("three"),
        ]);
        assert!(events.contains(&XamlEvent::Value("one two".into())));
        assert!(events.contains(&XamlEvent::StartObject("LineBreak")));
        assert!(events.contains(&XamlEvent::Value("three".into())));
    }

    #[test]
    fn delimiter_writes_literal_then_children() {
        let events = events(vec![Inline::Delimiter(Delimiter {
            literal: "**".to_string(),
            children: vec![Inline::text("open")],
        })]);
        assert!(events.contains(&XamlEvent::Value("**open".into())));
    }
}
