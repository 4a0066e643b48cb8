//! Shared configuration loader for the mdxaml toolchain.
//!
//! `defaults/mdxaml.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdXamlConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use mdxaml::formats::MarkdownExtensions;
use mdxaml::render::{LineJoin, RawMarkupPolicy, RenderOptions};
use mdxaml::styles::{ResourceKeyStore, StyleTable};
use mdxaml::xaml::TextOptions;
use mdxaml::FormatRegistry;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/mdxaml.default.toml");

/// Top-level configuration consumed by mdxaml applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdXamlConfig {
    pub markdown: MarkdownConfig,
    pub render: RenderConfig,
    /// Role name → resource key overrides.
    #[serde(default)]
    pub styles: HashMap<String, String>,
    pub resources: ResourcesConfig,
    pub output: OutputConfig,
}

/// Markdown extensions handed to comrak.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
    pub superscript: bool,
    pub front_matter: bool,
}

impl From<&MarkdownConfig> for MarkdownExtensions {
    fn from(config: &MarkdownConfig) -> Self {
        MarkdownExtensions {
            tables: config.tables,
            strikethrough: config.strikethrough,
            autolink: config.autolink,
            tasklist: config.tasklist,
            superscript: config.superscript,
            front_matter: config.front_matter,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub base_uri: Option<String>,
    pub code_line_join: CodeLineJoin,
    pub raw_markup: RawMarkup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CodeLineJoin {
    #[serde(rename = "newline")]
    Newline,
    #[serde(rename = "line-break")]
    LineBreak,
}

impl From<CodeLineJoin> for LineJoin {
    fn from(join: CodeLineJoin) -> Self {
        match join {
            CodeLineJoin::Newline => LineJoin::Newline,
            CodeLineJoin::LineBreak => LineJoin::LineBreak,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RawMarkup {
    #[serde(rename = "replay")]
    Replay,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "skip")]
    Skip,
}

impl From<RawMarkup> for RawMarkupPolicy {
    fn from(policy: RawMarkup) -> Self {
        match policy {
            RawMarkup::Replay => RawMarkupPolicy::Replay,
            RawMarkup::Text => RawMarkupPolicy::Text,
            RawMarkup::Skip => RawMarkupPolicy::Skip,
        }
    }
}

/// Location of the static resource key class.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourcesConfig {
    pub type_name: String,
    pub prefix: String,
    pub clr_namespace: String,
    pub assembly: String,
}

impl From<&ResourcesConfig> for ResourceKeyStore {
    fn from(config: &ResourcesConfig) -> Self {
        ResourceKeyStore::new(
            config.type_name.as_str(),
            config.prefix.as_str(),
            config.clr_namespace.as_str(),
            config.assembly.as_str(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub indent: usize,
}

impl MdXamlConfig {
    pub fn markdown_extensions(&self) -> MarkdownExtensions {
        (&self.markdown).into()
    }

    /// Render options with style overrides and base uri validated.
    pub fn render_options(&self) -> Result<RenderOptions, ConfigError> {
        let styles = StyleTable::from_names(
            self.styles
                .iter()
                .map(|(role, key)| (role.as_str(), key.as_str())),
        )
        .map_err(|e| ConfigError::Message(e.to_string()))?;

        let mut options = RenderOptions {
            code_line_join: self.render.code_line_join.into(),
            raw_markup: self.render.raw_markup.into(),
            styles,
            resource_keys: (&self.resources).into(),
            ..Default::default()
        };
        if let Some(uri) = self.render.base_uri.as_deref().filter(|u| !u.is_empty()) {
            options = options
                .with_base_uri(uri)
                .map_err(|e| ConfigError::Message(e.to_string()))?;
        }
        Ok(options)
    }

    pub fn text_options(&self) -> TextOptions {
        TextOptions {
            indent: self.output.indent,
        }
    }

    /// A registry whose built-in formats use this configuration.
    pub fn registry(&self) -> Result<FormatRegistry, ConfigError> {
        Ok(FormatRegistry::with_options(
            self.markdown_extensions(),
            self.render_options()?,
            self.text_options(),
        ))
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        tracing::debug!(path = %path.as_ref().display(), "layering config file");
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdXamlConfig, ConfigError> {
        let config: MdXamlConfig = self.builder.build()?.try_deserialize()?;
        tracing::debug!(
            format = config.output.format.as_str(),
            overrides = config.styles.len(),
            "configuration loaded"
        );
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdXamlConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdxaml::styles::{ResourceKey, StyleRole};
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.markdown.tables);
        assert!(!config.markdown.superscript);
        assert_eq!(config.render.base_uri, None);
        assert_eq!(config.render.code_line_join, CodeLineJoin::Newline);
        assert_eq!(config.render.raw_markup, RawMarkup::Skip);
        assert!(config.styles.is_empty());
        assert_eq!(config.output.format, "xaml");
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.markdown_extensions(), MarkdownExtensions::default());
        let options = config.render_options().expect("options to convert");
        assert_eq!(options.resource_keys, ResourceKeyStore::default());
        assert_eq!(options.code_line_join, LineJoin::Newline);
        assert_eq!(options.raw_markup, RawMarkupPolicy::default());
        assert_eq!(config.text_options(), TextOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("render.raw_markup", "replay")
            .expect("override to apply")
            .set_override("output.indent", 4)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.render.raw_markup, RawMarkup::Replay);
        assert_eq!(config.output.indent, 4);
        assert_eq!(
            config.render_options().unwrap().raw_markup,
            RawMarkupPolicy::Replay
        );
    }

    #[test]
    fn layers_a_file_over_defaults() {
        let mut file = tempfile_in_target("layered.toml");
        writeln!(
            file.1,
            "[render]\nbase_uri = \"https://example.com/docs/\"\ncode_line_join = \"line-break\"\n\n[styles]\nHeading1 = \"TitleKey\"\n"
        )
        .unwrap();

        let config = Loader::new().with_file(&file.0).build().expect("config");
        let options = config.render_options().expect("options");
        assert_eq!(
            options.base_uri.map(String::from),
            Some("https://example.com/docs/".to_string())
        );
        assert_eq!(options.code_line_join, LineJoin::LineBreak);
        assert_eq!(
            options.styles.resolve(StyleRole::Heading1),
            ResourceKey::new("TitleKey")
        );
        // Untouched sections keep their defaults
        assert!(config.markdown.tasklist);
        std::fs::remove_file(&file.0).ok();
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/definitely/not/here/mdxaml.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/mdxaml.toml")
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let config = Loader::new()
            .set_override("styles.NotARole", "X")
            .unwrap()
            .build()
            .unwrap();
        assert!(config.render_options().is_err());

        let config = Loader::new()
            .set_override("render.base_uri", "not a uri")
            .unwrap()
            .build()
            .unwrap();
        assert!(config.render_options().is_err());

        let result = Loader::new()
            .set_override("render.code_line_join", "sideways")
            .unwrap()
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn registry_uses_configured_options() {
        let config = Loader::new()
            .set_override("output.indent", 4)
            .unwrap()
            .build()
            .unwrap();
        let registry = config.registry().expect("registry");
        let xaml = registry.convert("text\n", "markdown", "xaml").unwrap();
        assert!(xaml.contains("\n    <Paragraph>text</Paragraph>"));
    }

    fn tempfile_in_target(name: &str) -> (std::path::PathBuf, std::fs::File) {
        let dir = std::env::temp_dir().join(format!("mdxaml-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
