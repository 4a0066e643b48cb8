use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const FORMATS: &[&str] = &["markdown", "xaml", "json", "events"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let format_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .help(help)
            .value_parser(clap::builder::PossibleValuesParser::new(FORMATS))
            .value_hint(ValueHint::Other)
    };

    let mut cmd = Command::new("mdxaml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render Markdown as WPF FlowDocument XAML")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to an mdxaml.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render a document (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file path, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("base-uri")
                        .long("base-uri")
                        .help("Resolve relative targets against this uri")
                        .value_hint(ValueHint::Url),
                ),
        )
        .subcommand(
            Command::new("styles").about("List style roles and the resource keys they resolve to"),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "mdxaml", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "mdxaml", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "mdxaml", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
