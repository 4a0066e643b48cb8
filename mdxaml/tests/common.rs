//! Shared helpers for the integration tests

use mdxaml::ast::Document;
use mdxaml::formats::{MarkdownExtensions, MarkdownFormat};
use mdxaml::Format;
use std::path::PathBuf;

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

pub fn parse(md: &str) -> Document {
    MarkdownFormat::new(MarkdownExtensions::default())
        .parse(md)
        .expect("Should parse markdown")
}
