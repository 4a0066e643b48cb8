//! Task list markers.
//!
//! The marker renders as an empty span styled with the `TaskList` role and carrying the checked
//! state in `Tag`; turning it into an interactive check box is left to the application's style.

use super::{mismatch, MarkdownRenderer};
use crate::ast::Inline;
use crate::error::RenderError;
use crate::styles::StyleRole;
use crate::xaml::{XamlSink, XamlValue};

pub(super) fn task_marker<S: XamlSink>(
    r: &mut MarkdownRenderer<'_, S>,
    inline: &Inline,
) -> Result<(), RenderError> {
    let Inline::TaskMarker { checked } = inline else {
        return Err(mismatch("task_list"));
    };
    let writer = r.writer();
    writer.start_object("Span")?;
    writer.write_resource_member(None, StyleRole::TaskList)?;
    writer.write_member("Tag", Some(XamlValue::Bool(*checked)))?;
    writer.end_object()
}
