//! Hyperlinks, images and the url checks they share.
//!
//! Targets that are not well-formed uri references are replaced by `#`, so a broken link still
//! renders as a (dead) hyperlink instead of failing the document. Relative targets are resolved
//! against [`RenderOptions::base_uri`](super::RenderOptions::base_uri) when one is set.

use super::{mismatch, MarkdownRenderer};
use crate::ast::Inline;
use crate::error::RenderError;
use crate::styles::StyleRole;
use crate::xaml::{XamlSink, XamlValue};
use url::{ParseError, Url};

/// Whether `url` is an absolute uri or a well-formed relative reference.
pub fn is_well_formed_reference(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let forbidden = |c: char| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '"' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}')
    };
    if url.contains(forbidden) || !valid_percent_escapes(url) {
        return false;
    }
    match Url::parse(url) {
        Ok(_) => true,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse("http://relative.invalid/")
            .and_then(|base| base.join(url))
            .is_ok(),
        Err(_) => false,
    }
}

fn valid_percent_escapes(url: &str) -> bool {
    let bytes = url.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3);
            if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Resolve a relative reference against `base`. Absolute uris and fragment-only references
/// are returned unchanged.
pub fn resolve_uri(url: &str, base: Option<&Url>) -> String {
    if url.starts_with('#') {
        return url.to_string();
    }
    match (Url::parse(url), base) {
        (Err(ParseError::RelativeUrlWithoutBase), Some(base)) => base
            .join(url)
            .map(String::from)
            .unwrap_or_else(|_| url.to_string()),
        _ => url.to_string(),
    }
}

/// The target written to `NavigateUri` / `Source`.
pub fn navigate_uri(url: &str, base: Option<&Url>) -> String {
    if url.starts_with('#') {
        return url.to_string();
    }
    if !is_well_formed_reference(url) {
        tracing::warn!(url, "malformed link target replaced by '#'");
        return "#".to_string();
    }
    resolve_uri(url, base)
}

pub(super) fn link<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Link(link) = inline else {
        return Err(mismatch("link"));
    };
    let target = navigate_uri(&link.url, r.options().base_uri.as_ref());
    let title = link.title.as_deref().filter(|t| !t.is_empty());

    if link.is_image {
        let writer = r.writer();
        writer.start_object("Image")?;
        writer.write_resource_member(None, StyleRole::Image)?;
        writer.write_member("ToolTipService.ToolTip", title.map(XamlValue::from))?;
        writer.write_member("Source", Some(XamlValue::Uri(target)))?;
        return writer.end_object();
    }

    start_hyperlink(r, target, title)?;
    r.write_items_inlines(&link.children, false)?;
    r.writer().end_object()
}

pub(super) fn autolink<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::Autolink(autolink) = inline else {
        return Err(mismatch("autolink"));
    };
    let url = if autolink.is_email && !autolink.url.starts_with("mailto:") {
        format!("mailto:{}", autolink.url)
    } else {
        autolink.url.clone()
    };
    let target = navigate_uri(&url, r.options().base_uri.as_ref());
    start_hyperlink(r, target, Some(&autolink.url))?;
    r.write_items_text(&autolink.url, false)?;
    r.writer().end_object()
}

fn start_hyperlink<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    target: String,
    title: Option<&str>,
) -> Result<(), RenderError> {
    let tooltip = title.map(str::to_string).unwrap_or_else(|| target.clone());
    let writer = r.writer();
    writer.start_object("Hyperlink")?;
    writer.write_resource_member(None, StyleRole::Hyperlink)?;
    writer.write_member("NavigateUri", Some(XamlValue::Uri(target)))?;
    writer.write_member("ToolTip", Some(XamlValue::String(tooltip)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Autolink, Block, Document, Link, Paragraph};
    use crate::render::{render_document, RenderOptions};
    use crate::xaml::{EventRecorder, SinkMode, XamlEvent};

    fn events(inlines: Vec<Inline>, options: &RenderOptions) -> Vec<XamlEvent> {
        render_document(
            &Document::new(vec![Block::Paragraph(Paragraph { inlines })]),
            EventRecorder::new(SinkMode::Native),
            options,
        )
        .unwrap()
    }

    fn link(url: &str, title: Option<&str>, is_image: bool) -> Inline {
        Inline::Link(Link {
            url: url.to_string(),
            title: title.map(str::to_string),
            is_image,
            children: vec![Inline::text("label")],
        })
    }

    #[test]
    fn well_formed_references() {
        assert!(is_well_formed_reference("https://example.com/a?b=c#d"));
        assert!(is_well_formed_reference("docs/page.md"));
        assert!(is_well_formed_reference("../up%20one"));
        assert!(is_well_formed_reference("mailto:someone@example.com"));
        assert!(!is_well_formed_reference("not a url"));
        assert!(!is_well_formed_reference("bad%zzescape"));
        assert!(!is_well_formed_reference("a<b"));
        assert!(!is_well_formed_reference(""));
    }

    #[test]
    fn resolves_relative_targets_against_base() {
        let base = Url::parse("https://example.com/docs/").unwrap();
        assert_eq!(
            resolve_uri("guide.html", Some(&base)),
            "https://example.com/docs/guide.html"
        );
        assert_eq!(
            resolve_uri("https://other.org/", Some(&base)),
            "https://other.org/"
        );
        assert_eq!(resolve_uri("#top", Some(&base)), "#top");
        assert_eq!(resolve_uri("guide.html", None), "guide.html");
    }

    #[test]
    fn malformed_link_degrades_to_hash() {
        let events = events(vec![link("not a url", None, false)], &RenderOptions::default());
        assert!(events.contains(&XamlEvent::Value(XamlValue::Uri("#".to_string()))));
        assert!(events.contains(&XamlEvent::Value(XamlValue::String("#".to_string()))));
    }

    #[test]
    fn hyperlink_tooltip_prefers_title() {
        let events = events(
            vec![link("https://example.com", Some("Example"), false)],
            &RenderOptions::default(),
        );
        assert!(events.contains(&XamlEvent::StartObject("Hyperlink")));
        assert!(events.contains(&XamlEvent::Value("Example".into())));
        assert!(events.contains(&XamlEvent::Value("label".into())));
    }

    #[test]
    fn image_with_title_sets_attached_tooltip() {
        let events = events(
            vec![link("img.png", Some("A picture"), true)],
            &RenderOptions::default(),
        );
        assert!(events.contains(&XamlEvent::StartObject("Image")));
        assert!(events.contains(&XamlEvent::StartMember(
            "ToolTipService.ToolTip".to_string()
        )));
        assert!(events.contains(&XamlEvent::Value(XamlValue::Uri("img.png".to_string()))));
        assert!(!events.contains(&XamlEvent::Value("label".into())));
    }

    #[test]
    fn image_without_title_has_no_tooltip() {
        let events = events(vec![link("img.png", None, true)], &RenderOptions::default());
        assert!(!events.contains(&XamlEvent::StartMember(
            "ToolTipService.ToolTip".to_string()
        )));
    }

    #[test]
    fn email_autolink_gets_mailto() {
        let events = events(
            vec![Inline::Autolink(Autolink {
                url: "someone@example.com".to_string(),
                is_email: true,
            })],
            &RenderOptions::default(),
        );
        assert!(events.contains(&XamlEvent::Value(XamlValue::Uri(
            "mailto:someone@example.com".to_string()
        ))));
        assert!(events.contains(&XamlEvent::Value("someone@example.com".into())));
    }

    #[test]
    fn base_uri_applies_to_links() {
        let options = RenderOptions::default()
            .with_base_uri("https://example.com/docs/")
            .unwrap();
        let events = events(vec![link("page.html", None, false)], &options);
        assert!(events.contains(&XamlEvent::Value(XamlValue::Uri(
            "https://example.com/docs/page.html".to_string()
        ))));
    }
}
