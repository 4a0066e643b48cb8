use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("mdxaml")
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn convert_markdown_to_xaml_via_cli() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("convert").arg(fixture_path("sample.md"));

    let output_pred = predicate::str::starts_with("<FlowDocument ")
        .and(predicate::str::contains("MarkdownXaml.Heading1StyleKey"))
        .and(predicate::str::contains("StartIndex=\"3\""))
        .and(predicate::str::contains("<Table.Columns>"))
        .and(predicate::str::contains("NavigateUri=\"https://example.com/docs\""))
        .and(predicate::str::contains("title: Sample").not());

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn convert_subcommand_is_optional() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg(fixture_path("sample.md")).arg("--to").arg("events");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SO FlowDocument"));
}

#[test]
fn convert_reads_stdin() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("-").write_stdin("Hello *stdin*\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "<Paragraph>Hello <Italic>stdin</Italic></Paragraph>",
        ));
}

#[test]
fn convert_writes_output_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    let output_path = dir.path().join("doc.xaml");
    fs::write(&input_path, "# Title\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("convert")
        .arg(input_path.as_os_str())
        .arg("-o")
        .arg(output_path.as_os_str());

    cmd.assert().success().stdout(predicate::str::is_empty());
    let written = fs::read_to_string(&output_path).unwrap();
    assert!(written.contains("MarkdownXaml.Heading1StyleKey"));
    assert!(written.contains(">Title</Paragraph>"));
}

#[test]
fn convert_to_json() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("-").arg("--to").arg("json").write_stdin("text\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("{").and(predicate::str::contains("FlowDocument")));
}

#[test]
fn convert_drops_raw_html_by_default() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("-").write_stdin("a<br>b\n\n<div>x</div>\n");

    cmd.assert().success().stdout(
        predicate::str::contains("<Paragraph>ab</Paragraph>")
            .and(predicate::str::contains("div").not()),
    );
}

#[test]
fn convert_applies_base_uri() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("-")
        .arg("--base-uri")
        .arg("https://example.com/guide/")
        .write_stdin("[next](page2.html)\n");

    cmd.assert().success().stdout(predicate::str::contains(
        "NavigateUri=\"https://example.com/guide/page2.html\"",
    ));
}

#[test]
fn convert_rejects_unknown_format() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg(fixture_path("sample.md")).arg("--to").arg("pdf");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:").and(predicate::str::contains("pdf")));
}

#[test]
fn convert_rejects_undetectable_input() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.txt");
    fs::write(&input_path, "text\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg(input_path.as_os_str());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--from"));
}

#[test]
fn convert_reports_missing_input() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("convert").arg("/definitely/not/here.md");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error: reading"));
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("mdxaml");
    cmd.arg("--list-formats");

    cmd.assert().success().stdout(
        predicate::str::contains("Available formats")
            .and(predicate::str::contains("markdown"))
            .and(predicate::str::contains("xaml"))
            .and(predicate::str::contains("json"))
            .and(predicate::str::contains("events")),
    );
}
