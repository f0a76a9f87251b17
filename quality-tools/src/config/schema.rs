//! Configuration schema definitions.
//!
//! This module defines the key layout of a quality-tools configuration file,
//! the set of known tools, and the typed structures the merged tree is read
//! into once it has passed validation.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Root key every configuration document nests under.
pub const ROOT_KEY: &str = "quality-tools";

/// Keys of a `paths` block. Each holds a path list with additive merge semantics.
pub const PATH_LIST_KEYS: &[&str] = &["scan", "exclude", "additional"];

/// Key of the `{ replace: [...] }` form that opts a path list out of appending.
pub const REPLACE_KEY: &str = "replace";

/// Whether the dotted key `path` receives additive (append + dedupe) merging.
///
/// The set is fixed: `quality-tools.paths.{scan,exclude,additional}` and
/// `quality-tools.tools.<tool>.paths.{scan,exclude,additional}`. Every other
/// sequence, such as `typoscript-lint.ignore_patterns`, is replaced wholesale.
///
/// # Examples
///
/// ```
/// use quality_tools::config::schema::is_additive_path;
///
/// assert!(is_additive_path(&["quality-tools", "paths", "scan"]));
/// assert!(is_additive_path(&["quality-tools", "tools", "phpstan", "paths", "exclude"]));
/// assert!(!is_additive_path(&["quality-tools", "tools", "typoscript-lint", "ignore_patterns"]));
/// ```
#[must_use]
pub fn is_additive_path(path: &[&str]) -> bool {
    match path {
        [root, "paths", key] => *root == ROOT_KEY && PATH_LIST_KEYS.contains(key),
        [root, "tools", _, "paths", key] => *root == ROOT_KEY && PATH_LIST_KEYS.contains(key),
        _ => false,
    }
}

/// The external tools this orchestrator knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Tool {
    /// PHP refactoring engine.
    Rector,
    /// Refactoring engine for non-PHP files (TypoScript, XML, YAML).
    Fractor,
    /// Static analyzer.
    Phpstan,
    /// Code style fixer.
    #[value(name = "php-cs-fixer")]
    PhpCsFixer,
    /// TypoScript linter.
    #[value(name = "typoscript-lint")]
    TypoScriptLint,
    /// composer.json normalizer.
    #[value(name = "composer-normalize")]
    ComposerNormalize,
}

impl Tool {
    /// Every tool, in a fixed order.
    pub const ALL: [Tool; 6] = [
        Tool::Rector,
        Tool::Fractor,
        Tool::Phpstan,
        Tool::PhpCsFixer,
        Tool::TypoScriptLint,
        Tool::ComposerNormalize,
    ];

    /// The key used for this tool under `quality-tools.tools`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Rector => "rector",
            Self::Fractor => "fractor",
            Self::Phpstan => "phpstan",
            Self::PhpCsFixer => "php-cs-fixer",
            Self::TypoScriptLint => "typoscript-lint",
            Self::ComposerNormalize => "composer-normalize",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| Error::UnknownTool {
                name: s.to_string(),
            })
    }
}

/// Output verbosity as written in `output.verbosity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Default output.
    #[default]
    Normal,
    /// Additional progress information.
    Verbose,
    /// Everything.
    Debug,
}

impl Verbosity {
    /// Accepted spellings, in order.
    pub const NAMES: &'static [&'static str] = &["quiet", "normal", "verbose", "debug"];
}

/// Indentation character used by composer-normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Spaces.
    #[default]
    Space,
    /// Tabs.
    Tab,
}

impl IndentStyle {
    /// Accepted spellings, in order.
    pub const NAMES: &'static [&'static str] = &["space", "tab"];

    /// Spelling passed to the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Tab => "tab",
        }
    }
}

/// A complete configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    /// Everything lives under the root key.
    #[serde(rename = "quality-tools", default)]
    pub quality_tools: QualityToolsConfig,
}

/// Contents of the `quality-tools` root.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QualityToolsConfig {
    /// Project metadata.
    pub project: Option<ProjectConfig>,
    /// Global scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Per-tool settings.
    pub tools: Option<ToolsConfig>,
    /// Output settings.
    pub output: Option<OutputConfig>,
    /// Performance settings.
    pub performance: Option<PerformanceConfig>,
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Human-readable project name.
    pub name: Option<String>,
    /// Target PHP version, `MAJOR.MINOR`.
    pub php_version: Option<String>,
    /// Target TYPO3 version.
    pub typo3_version: Option<String>,
}

/// A `paths` block, global or per tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Inclusion patterns.
    pub scan: Option<Vec<String>>,
    /// Exclusion patterns.
    pub exclude: Option<Vec<String>>,
    /// Explicitly opted-in paths, typically packages inside the vendor directory.
    pub additional: Option<Vec<String>>,
}

/// Per-tool settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Rector.
    pub rector: Option<RectorConfig>,
    /// Fractor.
    pub fractor: Option<FractorConfig>,
    /// PHPStan.
    pub phpstan: Option<PhpstanConfig>,
    /// PHP-CS-Fixer.
    #[serde(rename = "php-cs-fixer")]
    pub php_cs_fixer: Option<PhpCsFixerConfig>,
    /// TypoScript linter.
    #[serde(rename = "typoscript-lint")]
    pub typoscript_lint: Option<TypoScriptLintConfig>,
    /// composer-normalize.
    #[serde(rename = "composer-normalize")]
    pub composer_normalize: Option<ComposerNormalizeConfig>,
}

/// Rector settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RectorConfig {
    /// Whether the tool runs at all.
    pub enabled: Option<bool>,
    /// Tool-specific scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Rule set level, e.g. `typo3-13`.
    pub level: Option<String>,
    /// Target PHP version override.
    pub php_version: Option<String>,
    /// Path to the tool's own configuration file.
    pub config_file: Option<String>,
}

/// Fractor settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FractorConfig {
    /// Whether the tool runs at all.
    pub enabled: Option<bool>,
    /// Tool-specific scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Indentation width, 1 through 8.
    pub indentation: Option<u8>,
    /// Path to the tool's own configuration file.
    pub config_file: Option<String>,
}

/// PHPStan settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PhpstanConfig {
    /// Whether the tool runs at all.
    pub enabled: Option<bool>,
    /// Tool-specific scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Rule level, 0 through 9.
    pub level: Option<u8>,
    /// `-1` or a size such as `512M`.
    #[serde(default, deserialize_with = "string_or_integer")]
    pub memory_limit: Option<String>,
    /// Path to the tool's own configuration file.
    pub config_file: Option<String>,
}

/// PHP-CS-Fixer settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PhpCsFixerConfig {
    /// Whether the tool runs at all.
    pub enabled: Option<bool>,
    /// Tool-specific scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Path to the tool's own configuration file.
    pub config_file: Option<String>,
    /// Cache file location.
    pub cache_file: Option<String>,
}

/// TypoScript linter settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TypoScriptLintConfig {
    /// Whether the tool runs at all.
    pub enabled: Option<bool>,
    /// Tool-specific scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Indentation width, 1 through 8.
    pub indentation: Option<u8>,
    /// File patterns the linter skips.
    pub ignore_patterns: Option<Vec<String>>,
    /// Path to the tool's own configuration file.
    pub config_file: Option<String>,
}

/// composer-normalize settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ComposerNormalizeConfig {
    /// Whether the tool runs at all.
    pub enabled: Option<bool>,
    /// Tool-specific scan/exclude lists.
    pub paths: Option<PathsConfig>,
    /// Indentation width, 1 through 8.
    pub indent_size: Option<u8>,
    /// Indentation character.
    pub indent_style: Option<IndentStyle>,
}

/// Output settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// How much the tools print.
    pub verbosity: Option<Verbosity>,
    /// Colored output.
    pub colors: Option<bool>,
    /// Progress indicators.
    pub progress: Option<bool>,
    /// Treat tool warnings as success.
    pub tolerate_warnings: Option<bool>,
}

/// Performance settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PerformanceConfig {
    /// Allow tools to run in parallel mode.
    pub parallel: Option<bool>,
    /// Upper bound for parallel worker processes, 1 through 64.
    pub max_processes: Option<u16>,
    /// Allow tools to use their result caches.
    pub cache_enabled: Option<bool>,
}

/// Accept `memory_limit: -1` as well as `memory_limit: "1G"`.
fn string_or_integer<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Integer(i64),
        String(String),
    }

    Ok(Option::<Helper>::deserialize(deserializer)?.map(|h| match h {
        Helper::Integer(i) => i.to_string(),
        Helper::String(s) => s,
    }))
}
