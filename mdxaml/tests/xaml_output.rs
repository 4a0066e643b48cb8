//! XAML text output tests (Markdown → XAML)

use crate::common::{fixture, parse};
use insta::assert_snapshot;
use mdxaml::render::{LineJoin, RawMarkupPolicy};
use mdxaml::styles::{ResourceKeyStore, StyleRole, StyleTable};
use mdxaml::xaml::TextOptions;
use mdxaml::{to_xaml, RenderError, RenderOptions};

fn xaml(md: &str, options: &RenderOptions) -> String {
    to_xaml(&parse(md), options, &TextOptions::default()).expect("Should render")
}

#[test]
fn test_heading_and_emphasis_snapshot() {
    let out = xaml("# Title\n\nHello *world*\n", &RenderOptions::default());
    assert_snapshot!(out, @r#"
    <FlowDocument xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation" xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml" xmlns:xmarkdig="clr-namespace:Neo.Markdig.Xaml;assembly=Neo.Markdig.Xaml" Style="{StaticResource {x:Static xmarkdig:MarkdownXaml.DocumentStyleKey}}">
      <Paragraph Style="{StaticResource {x:Static xmarkdig:MarkdownXaml.Heading1StyleKey}}">Title</Paragraph>
      <Paragraph>Hello <Italic>world</Italic></Paragraph>
    </FlowDocument>
    "#);
}

#[test]
fn test_adjacent_inline_elements_snapshot() {
    let out = xaml("**a***b*\n\n`x`**y**\n", &RenderOptions::default());
    assert_snapshot!(out, @r#"
    <FlowDocument xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation" xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml" xmlns:xmarkdig="clr-namespace:Neo.Markdig.Xaml;assembly=Neo.Markdig.Xaml" Style="{StaticResource {x:Static xmarkdig:MarkdownXaml.DocumentStyleKey}}">
      <Paragraph><Bold>a</Bold><Italic>b</Italic></Paragraph>
      <Paragraph><Span Style="{StaticResource {x:Static xmarkdig:MarkdownXaml.CodeStyleKey}}"><Run>x</Run></Span><Bold>y</Bold></Paragraph>
    </FlowDocument>
    "#);
}

#[test]
fn test_empty_document() {
    let out = xaml("", &RenderOptions::default());
    assert!(out.starts_with("<FlowDocument "));
    assert!(out.trim_end().ends_with("/>"));
}

#[test]
fn test_sample_fixture() {
    let out = xaml(&fixture("sample.md"), &RenderOptions::default());

    // Lists
    assert!(out.contains("MarkerStyle=\"Decimal\""));
    assert!(out.contains("StartIndex=\"3\""));
    assert!(out.contains("MarkerStyle=\"Disc\""));
    assert!(out.contains("Tag=\"True\""));
    assert!(out.contains("Tag=\"False\""));

    // Code block keeps its lines
    assert!(out.contains("xml:space=\"preserve\""));
    assert!(out.contains("    println!(\"hi\");"));

    // Table
    assert!(out.contains("<Table.Columns>"));
    assert!(out.contains("Width=\"Auto\""));
    assert!(out.contains("TextAlignment=\"Left\""));
    assert!(out.contains("TextAlignment=\"Right\""));
    assert!(out.contains("MarkdownXaml.TableHeaderStyleKey"));

    // Links and images
    assert!(out.contains("NavigateUri=\"https://example.com/docs\""));
    assert!(out.contains("ToolTip=\"Docs\""));
    assert!(out.contains("NavigateUri=\"https://example.com\""));
    assert!(out.contains("ToolTipService.ToolTip=\"Project logo\""));
    assert!(out.contains("Source=\"logo.png\""));

    // Front matter never reaches the output
    assert!(!out.contains("title: Sample"));
}

#[test]
fn test_soft_breaks_collapse_to_a_space() {
    let out = xaml("one\ntwo\n", &RenderOptions::default());
    assert!(out.contains("<Paragraph>one two</Paragraph>"));
}

#[test]
fn test_hard_break_is_a_line_break() {
    let out = xaml("one  \ntwo\n", &RenderOptions::default());
    assert!(out.contains("<Paragraph>one<LineBreak/>two</Paragraph>"));
}

#[test]
fn test_code_lines_joined_with_line_breaks() {
    let options = RenderOptions {
        code_line_join: LineJoin::LineBreak,
        ..Default::default()
    };
    let out = xaml("```\na\nb\n```\n", &options);
    assert!(out.contains("<LineBreak/>"));
    assert!(!out.contains("a\nb"));
}

#[test]
fn test_base_uri_resolves_relative_links() {
    let options = RenderOptions::default()
        .with_base_uri("https://example.com/guide/")
        .unwrap();
    let out = xaml("[next](page2.html)\n", &options);
    assert!(out.contains("NavigateUri=\"https://example.com/guide/page2.html\""));
}

#[test]
fn test_style_override_and_custom_store() {
    let options = RenderOptions {
        styles: StyleTable::new().with_override(StyleRole::Heading1, "TitleKey"),
        resource_keys: ResourceKeyStore::new("Keys", "k", "My.App", "My.App.Styles"),
        ..Default::default()
    };
    let out = xaml("# Title\n", &options);
    assert!(out.contains("xmlns:k=\"clr-namespace:My.App;assembly=My.App.Styles\""));
    assert!(out.contains("{x:Static k:Keys.DocumentStyleKey}"));
    // Unknown to the store, so referenced by name
    assert!(out.contains("Style=\"{StaticResource TitleKey}\""));
}

fn replay() -> RenderOptions {
    RenderOptions {
        raw_markup: RawMarkupPolicy::Replay,
        ..Default::default()
    }
}

#[test]
fn test_raw_html_is_dropped_by_default() {
    let out = mdxaml::markdown_to_xaml("a<br>b\n\n<div>x</div>\n").expect("Should render");
    assert!(out.contains("<Paragraph>ab</Paragraph>"));
    assert!(!out.contains("div"));
    assert!(!out.contains("<br"));

    let out = xaml("a <b>b</b> c\n", &RenderOptions::default());
    assert!(out.contains("<Paragraph>a b c</Paragraph>"));
}

#[test]
fn test_html_block_replay() {
    let out = xaml(
        "<Section><Paragraph>inner</Paragraph></Section>\n\nafter\n",
        &replay(),
    );
    assert!(out.contains("<Section>"));
    assert!(out.contains("<Paragraph>inner</Paragraph>"));
    assert!(out.contains("<Paragraph>after</Paragraph>"));
}

#[test]
fn test_split_inline_tags_cannot_be_replayed() {
    // comrak hands over `<Bold>` and `</Bold>` as separate fragments
    let err = to_xaml(
        &parse("a <Bold>b</Bold> c\n"),
        &replay(),
        &TextOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedFragment { .. }));
}

#[test]
fn test_self_contained_inline_tag_is_replayed() {
    let out = xaml("a <LineBreak/> c\n", &replay());
    assert!(out.contains("<Paragraph>a <LineBreak/> c</Paragraph>"));
}

#[test]
fn test_raw_markup_as_text() {
    let options = RenderOptions {
        raw_markup: RawMarkupPolicy::Text,
        ..Default::default()
    };
    let out = xaml("a <b>b</b> c\n", &options);
    assert!(out.contains("a &lt;b&gt;b&lt;/b&gt; c"));
}
