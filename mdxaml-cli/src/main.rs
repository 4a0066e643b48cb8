// Command-line interface for mdxaml
//
// This binary renders Markdown into WPF FlowDocument XAML. The heavy lifting is done by the
// mdxaml library; this crate only reads input, layers configuration and writes the result.
//
// Converting:
//
// The source format is detected from the file extension (stdin is always Markdown) and can be
// overridden with --from. The target defaults to the configured output format.
// Usage:
//  mdxaml <input> [--to <format>] [--from <format>] [--output <file>]  - Convert (default)
//  mdxaml convert <input> [--to <format>] ...                          - Same as above (explicit)
//  mdxaml styles                                                       - List style roles and keys
//  mdxaml --list-formats                                               - List available formats
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<key> <value>. Dotted keys address the
// configuration file directly (--extra-render.raw_markup text); a few short aliases exist for
// the common ones (--extra-raw-markup text, --extra-indent 4).
// Example:
//  mdxaml notes.md --to xaml --extra-styles.Heading1 TitleKey

use clap::{Arg, ArgAction, Command, ValueHint};
use mdxaml::styles::StyleRole;
use mdxaml_config::{ConfigError, Loader, MdXamlConfig};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use tracing_subscriber::EnvFilter;

/// Short `--extra-*` names and the configuration keys they stand for.
const EXTRA_ALIASES: &[(&str, &str)] = &[
    ("base-uri", "render.base_uri"),
    ("raw-markup", "render.raw_markup"),
    ("code-line-join", "render.code_line_join"),
    ("indent", "output.indent"),
    ("tables", "markdown.tables"),
    ("strikethrough", "markdown.strikethrough"),
    ("autolink", "markdown.autolink"),
    ("tasklist", "markdown.tasklist"),
    ("superscript", "markdown.superscript"),
    ("front-matter", "markdown.front_matter"),
];

/// Split `--extra-<key> [value]` config overrides (or `--extras-<key>`) off the arguments clap
/// sees. A key with no value is a boolean switch.
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned = Vec::new();
    let mut overrides = HashMap::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        let Some(key) = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"))
        else {
            cleaned.push(arg.clone());
            continue;
        };
        let value = iter
            .next_if(|next| !next.starts_with('-'))
            .cloned()
            .unwrap_or_else(|| "true".to_string());
        overrides.insert(key.to_string(), value);
    }

    (cleaned, overrides)
}

fn build_cli() -> Command {
    Command::new("mdxaml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render Markdown as WPF FlowDocument XAML")
        .long_about(
            "mdxaml renders Markdown documents into FlowDocument markup whose styles are\n\
            static resource references, ready to be themed by the hosting application.\n\n\
            Commands:\n  \
            - convert: Render a document (default command)\n  \
            - styles:  List style roles and the resource keys they resolve to\n\n\
            Extra Parameters:\n  \
            Use --extra-<key> [value] to override a configuration key.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            mdxaml notes.md                              # XAML to stdout\n  \
            mdxaml notes.md --to json                    # Object graph as JSON\n  \
            mdxaml notes.md -o notes.xaml                # XAML to a file\n  \
            cat notes.md | mdxaml -                      # Read from stdin\n  \
            mdxaml notes.md --extra-raw-markup replay    # Replay inline XAML"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .value_name("PATH")
                .help("Path to an mdxaml.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr (RUST_LOG overrides)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render a document (default command)")
                .long_about(
                    "Render a document into one of the output formats.\n\n\
                    Output formats:\n  \
                    - xaml:   FlowDocument markup (.xaml)\n  \
                    - json:   Rendered object graph as JSON\n  \
                    - events: Writer event stream, for debugging\n\n\
                    The source format is auto-detected from the file extension; '-' reads\n\
                    Markdown from stdin. Output goes to stdout by default, or use -o.\n\n\
                    Examples:\n  \
                    mdxaml convert notes.md --to xaml -o notes.xaml\n  \
                    mdxaml notes.md --base-uri https://example.com/docs/   # 'convert' is optional"
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to output.format from the configuration)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("base-uri")
                        .long("base-uri")
                        .value_name("URI")
                        .help("Resolve relative link and image targets against this uri")
                        .value_hint(ValueHint::Url),
                ),
        )
        .subcommand(
            Command::new("styles")
                .about("List style roles and the resource keys they resolve to")
                .long_about(
                    "Print every style role with its resolved resource key and the static\n\
                    reference written into XAML. Overrides from the configuration are marked.\n\n\
                    Examples:\n  \
                    mdxaml styles\n  \
                    mdxaml styles --config mdxaml.toml"
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare input path means the convert subcommand was left out
            if cleaned_args.len() > 1
                && (!cleaned_args[1].starts_with('-') || cleaned_args[1] == "-")
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "styles"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    let base_uri = matches
        .subcommand_matches("convert")
        .and_then(|sub| sub.get_one::<String>("base-uri"));
    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
        base_uri.map(|s| s.as_str()),
    );

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&config);
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("an input path is required");
            };
            let to = sub_matches
                .get_one::<String>("to")
                .cloned()
                .unwrap_or_else(|| config.output.format.clone());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            handle_convert_command(input, from, &to, output, &config);
        }
        Some(("styles", _)) => handle_styles_command(&config),
        _ => fail("unknown subcommand. Use --help for usage information."),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: Option<&str>,
    to: &str,
    output: Option<&str>,
    config: &MdXamlConfig,
) {
    let registry = config.registry().unwrap_or_else(|e| fail(e));

    let from = match from {
        Some(f) => f.to_string(),
        None if input == "-" => "markdown".to_string(),
        None => registry
            .detect_format_from_filename(input)
            .unwrap_or_else(|| {
                fail(format!(
                    "could not detect format from filename '{input}'. Please specify --from explicitly"
                ))
            }),
    };

    // Validate formats exist
    for name in [from.as_str(), to] {
        if let Err(e) = registry.get(name) {
            fail(e);
        }
    }

    let source = read_input(input).unwrap_or_else(|e| fail(format!("reading '{input}': {e}")));
    let rendered = registry
        .convert(&source, &from, to)
        .unwrap_or_else(|e| fail(e));

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .unwrap_or_else(|e| fail(format!("writing file '{path}': {e}")));
            tracing::debug!(path, "output written");
        }
        None => print!("{rendered}"),
    }
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(input)
    }
}

/// Handle the styles command
fn handle_styles_command(config: &MdXamlConfig) {
    let options = config.render_options().unwrap_or_else(|e| fail(e));
    print!("{}", styles_listing(&options));
}

fn styles_listing(options: &mdxaml::RenderOptions) -> String {
    let store = &options.resource_keys;
    let mut out = format!(
        "Resource keys: xmlns:{}=\"{}\"\n\n",
        store.prefix,
        store.namespace_uri()
    );
    for role in StyleRole::ALL {
        let key = options.styles.resolve(role);
        let reference = if store.contains(&key) {
            format!("{{x:Static {}}}", store.static_reference(&key))
        } else {
            key.to_string()
        };
        let marker = if options.styles.is_overridden(role) {
            "  (override)"
        } else {
            ""
        };
        out.push_str(&format!("  {:<14} {reference}{marker}\n", role.name()));
    }
    out
}

/// Handle the list-formats command
fn handle_list_formats_command(config: &MdXamlConfig) {
    let registry = config.registry().unwrap_or_else(|e| fail(e));
    println!("Available formats:\n");
    for name in registry.list_formats() {
        let Ok(format) = registry.get(&name) else {
            continue;
        };
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "in/out",
            (true, false) => "in",
            (false, true) => "out",
            (false, false) => "-",
        };
        println!("  {name:<10} {direction:<6} {}", format.description());
    }
}

fn load_cli_config(
    explicit_path: Option<&str>,
    extra_params: &HashMap<String, String>,
    base_uri: Option<&str>,
) -> MdXamlConfig {
    let loader = Loader::new().with_optional_file("mdxaml.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let loader = apply_config_overrides(loader, extra_params).unwrap_or_else(|e| fail(e));
    let loader = match base_uri {
        Some(uri) => loader
            .set_override("render.base_uri", uri)
            .unwrap_or_else(|e| fail(e)),
        None => loader,
    };

    loader
        .build()
        .unwrap_or_else(|err| fail(format!("failed to load configuration: {err}")))
}

fn apply_config_overrides(
    mut loader: Loader,
    extra_params: &HashMap<String, String>,
) -> Result<Loader, ConfigError> {
    for (key, raw) in extra_params {
        let key = config_key(key);
        tracing::debug!(key = key.as_str(), value = raw.as_str(), "config override");
        loader = match override_value(raw) {
            OverrideValue::Bool(b) => loader.set_override(&key, b)?,
            OverrideValue::Int(n) => loader.set_override(&key, n)?,
            OverrideValue::Str(s) => loader.set_override(&key, s)?,
        };
    }
    Ok(loader)
}

/// Map an `--extra-*` name to its configuration key.
fn config_key(extra: &str) -> String {
    if let Some((_, key)) = EXTRA_ALIASES.iter().find(|(alias, _)| *alias == extra) {
        return key.to_string();
    }
    match extra.split_once('.') {
        // Style role names are case sensitive keys; leave them alone
        Some(("styles", role)) => format!("styles.{role}"),
        _ => extra.replace('-', "_"),
    }
}

#[derive(Debug, PartialEq)]
enum OverrideValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

fn override_value(raw: &str) -> OverrideValue {
    match raw.to_lowercase().as_str() {
        "true" | "yes" => return OverrideValue::Bool(true),
        "false" | "no" => return OverrideValue::Bool(false),
        _ => {}
    }
    match raw.parse::<i64>() {
        Ok(n) => OverrideValue::Int(n),
        Err(_) => OverrideValue::Str(raw.to_string()),
    }
}
