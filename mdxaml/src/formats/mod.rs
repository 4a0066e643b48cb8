//! Format implementations
//!
//! Markdown is read; XAML, the JSON object graph and the writer event dump are written.

pub mod events;
pub mod json;
pub mod markdown;
pub mod xaml;

pub use events::EventsFormat;
pub use json::JsonFormat;
pub use markdown::{MarkdownExtensions, MarkdownFormat};
pub use xaml::XamlFormat;
