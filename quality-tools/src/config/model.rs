//! Typed read view over a merged configuration.

use serde_yaml::Value;

use crate::config::schema::{
    ConfigDocument, IndentStyle, PathsConfig, QualityToolsConfig, Tool, ToolsConfig, Verbosity,
};
use crate::error::{Error, Result};
use crate::paths::pattern::is_vendor_pattern;
use crate::paths::ToolPathSpec;

/// Default PHPStan rule level.
pub const DEFAULT_PHPSTAN_LEVEL: u8 = 6;
/// Default PHPStan memory limit.
pub const DEFAULT_MEMORY_LIMIT: &str = "1G";
/// Default Rector rule set.
pub const DEFAULT_RECTOR_LEVEL: &str = "typo3-13";
/// Default target PHP version.
pub const DEFAULT_PHP_VERSION: &str = "8.3";
/// Default indentation width for Fractor and the TypoScript linter.
pub const DEFAULT_INDENTATION: u8 = 2;
/// Default composer.json indentation width.
pub const DEFAULT_INDENT_SIZE: u8 = 4;
/// Default worker count.
pub const DEFAULT_MAX_PROCESSES: u16 = 4;

/// The resolved configuration for one command invocation.
///
/// Built once from a merged, validated tree and never mutated afterwards.
/// Getters fall back to documented defaults when a value is absent, so a
/// tree that lacks the package defaults still yields sensible values.
///
/// # Examples
///
/// ```
/// use quality_tools::config::Configuration;
/// use quality_tools::Tool;
///
/// let tree = serde_yaml::from_str("quality-tools: {tools: {phpstan: {level: 5}}}").unwrap();
/// let config = Configuration::from_tree(tree).unwrap();
/// assert_eq!(config.phpstan_level(), 5);
/// assert!(config.is_tool_enabled(Tool::Rector));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    settings: QualityToolsConfig,
    tree: Value,
}

impl Configuration {
    /// Project a merged tree into the typed view.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tree does not match the schema.
    /// Running [`ConfigValidator`](crate::config::ConfigValidator) first
    /// yields better messages.
    pub fn from_tree(tree: Value) -> Result<Self> {
        let document: ConfigDocument =
            serde_yaml::from_value(tree.clone()).map_err(|e| Error::Configuration {
                file: None,
                key: None,
                message: e.to_string(),
            })?;

        Ok(Self {
            settings: document.quality_tools,
            tree,
        })
    }

    /// The merged tree this view was built from.
    #[must_use]
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Render the merged tree as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.tree).map_err(|e| Error::Configuration {
            file: None,
            key: None,
            message: format!("failed to render configuration: {e}"),
        })
    }

    // Project

    /// Project name, if configured.
    #[must_use]
    pub fn project_name(&self) -> Option<&str> {
        self.settings.project.as_ref()?.name.as_deref()
    }

    /// Target PHP version.
    #[must_use]
    pub fn php_version(&self) -> &str {
        self.settings
            .project
            .as_ref()
            .and_then(|p| p.php_version.as_deref())
            .unwrap_or(DEFAULT_PHP_VERSION)
    }

    /// Target TYPO3 version, if configured.
    #[must_use]
    pub fn typo3_version(&self) -> Option<&str> {
        self.settings.project.as_ref()?.typo3_version.as_deref()
    }

    // Global paths

    fn global_paths(&self) -> Option<&PathsConfig> {
        self.settings.paths.as_ref()
    }

    /// Global inclusion patterns.
    #[must_use]
    pub fn scan_paths(&self) -> &[String] {
        self.global_paths()
            .and_then(|p| p.scan.as_deref())
            .unwrap_or_default()
    }

    /// Global exclusion patterns.
    #[must_use]
    pub fn exclude_paths(&self) -> &[String] {
        self.global_paths()
            .and_then(|p| p.exclude.as_deref())
            .unwrap_or_default()
    }

    /// Globally opted-in extra paths.
    #[must_use]
    pub fn additional_paths(&self) -> &[String] {
        self.global_paths()
            .and_then(|p| p.additional.as_deref())
            .unwrap_or_default()
    }

    // Tools

    fn tools(&self) -> Option<&ToolsConfig> {
        self.settings.tools.as_ref()
    }

    /// Whether `tool` should run. Tools are enabled unless explicitly disabled.
    #[must_use]
    pub fn is_tool_enabled(&self, tool: Tool) -> bool {
        let Some(tools) = self.tools() else {
            return true;
        };
        let enabled = match tool {
            Tool::Rector => tools.rector.as_ref().and_then(|t| t.enabled),
            Tool::Fractor => tools.fractor.as_ref().and_then(|t| t.enabled),
            Tool::Phpstan => tools.phpstan.as_ref().and_then(|t| t.enabled),
            Tool::PhpCsFixer => tools.php_cs_fixer.as_ref().and_then(|t| t.enabled),
            Tool::TypoScriptLint => tools.typoscript_lint.as_ref().and_then(|t| t.enabled),
            Tool::ComposerNormalize => tools.composer_normalize.as_ref().and_then(|t| t.enabled),
        };
        enabled.unwrap_or(true)
    }

    /// The tool's own `paths` block, if any.
    #[must_use]
    pub fn tool_paths(&self, tool: Tool) -> Option<&PathsConfig> {
        let tools = self.tools()?;
        match tool {
            Tool::Rector => tools.rector.as_ref()?.paths.as_ref(),
            Tool::Fractor => tools.fractor.as_ref()?.paths.as_ref(),
            Tool::Phpstan => tools.phpstan.as_ref()?.paths.as_ref(),
            Tool::PhpCsFixer => tools.php_cs_fixer.as_ref()?.paths.as_ref(),
            Tool::TypoScriptLint => tools.typoscript_lint.as_ref()?.paths.as_ref(),
            Tool::ComposerNormalize => tools.composer_normalize.as_ref()?.paths.as_ref(),
        }
    }

    /// The tool's own configuration file, if any.
    #[must_use]
    pub fn tool_config_file(&self, tool: Tool) -> Option<&str> {
        let tools = self.tools()?;
        match tool {
            Tool::Rector => tools.rector.as_ref()?.config_file.as_deref(),
            Tool::Fractor => tools.fractor.as_ref()?.config_file.as_deref(),
            Tool::Phpstan => tools.phpstan.as_ref()?.config_file.as_deref(),
            Tool::PhpCsFixer => tools.php_cs_fixer.as_ref()?.config_file.as_deref(),
            Tool::TypoScriptLint => tools.typoscript_lint.as_ref()?.config_file.as_deref(),
            Tool::ComposerNormalize => None,
        }
    }

    /// Path specification for `tool`.
    ///
    /// Inclusion is the tool's `scan` list when it defines one, otherwise the
    /// global one, followed by the global and then the tool's `additional`
    /// entries. Exclusion is the tool's `exclude` list when defined, otherwise
    /// the global one. Every `additional` entry and every inclusion pattern
    /// that points into the vendor directory is exempt from vendor exclusion.
    #[must_use]
    pub fn tool_path_spec(&self, tool: Tool) -> ToolPathSpec {
        let own = self.tool_paths(tool);

        let scan = own
            .and_then(|p| p.scan.as_deref())
            .unwrap_or_else(|| self.scan_paths());
        let exclude = own
            .and_then(|p| p.exclude.as_deref())
            .unwrap_or_else(|| self.exclude_paths());
        let own_additional = own
            .and_then(|p| p.additional.as_deref())
            .unwrap_or_default();

        let additional: Vec<String> = self
            .additional_paths()
            .iter()
            .chain(own_additional)
            .cloned()
            .collect();

        let mut include: Vec<String> = scan.to_vec();
        include.extend(additional.iter().cloned());

        let mut exemptions = additional;
        exemptions.extend(scan.iter().filter(|p| is_vendor_pattern(p)).cloned());

        ToolPathSpec::new(include, exclude.to_vec(), exemptions)
    }

    /// Rector rule set.
    #[must_use]
    pub fn rector_level(&self) -> &str {
        self.tools()
            .and_then(|t| t.rector.as_ref())
            .and_then(|r| r.level.as_deref())
            .unwrap_or(DEFAULT_RECTOR_LEVEL)
    }

    /// PHP version Rector targets; falls back to the project version.
    #[must_use]
    pub fn rector_php_version(&self) -> &str {
        self.tools()
            .and_then(|t| t.rector.as_ref())
            .and_then(|r| r.php_version.as_deref())
            .unwrap_or_else(|| self.php_version())
    }

    /// Fractor indentation width.
    #[must_use]
    pub fn fractor_indentation(&self) -> u8 {
        self.tools()
            .and_then(|t| t.fractor.as_ref())
            .and_then(|f| f.indentation)
            .unwrap_or(DEFAULT_INDENTATION)
    }

    /// PHPStan rule level.
    #[must_use]
    pub fn phpstan_level(&self) -> u8 {
        self.tools()
            .and_then(|t| t.phpstan.as_ref())
            .and_then(|p| p.level)
            .unwrap_or(DEFAULT_PHPSTAN_LEVEL)
    }

    /// PHPStan memory limit.
    #[must_use]
    pub fn phpstan_memory_limit(&self) -> &str {
        self.tools()
            .and_then(|t| t.phpstan.as_ref())
            .and_then(|p| p.memory_limit.as_deref())
            .unwrap_or(DEFAULT_MEMORY_LIMIT)
    }

    /// PHP-CS-Fixer cache file.
    #[must_use]
    pub fn php_cs_fixer_cache_file(&self) -> Option<&str> {
        self.tools()?.php_cs_fixer.as_ref()?.cache_file.as_deref()
    }

    /// TypoScript linter indentation width.
    #[must_use]
    pub fn typoscript_indentation(&self) -> u8 {
        self.tools()
            .and_then(|t| t.typoscript_lint.as_ref())
            .and_then(|t| t.indentation)
            .unwrap_or(DEFAULT_INDENTATION)
    }

    /// File patterns the TypoScript linter skips.
    #[must_use]
    pub fn typoscript_ignore_patterns(&self) -> &[String] {
        self.tools()
            .and_then(|t| t.typoscript_lint.as_ref())
            .and_then(|t| t.ignore_patterns.as_deref())
            .unwrap_or_default()
    }

    /// composer.json indentation width.
    #[must_use]
    pub fn composer_indent_size(&self) -> u8 {
        self.tools()
            .and_then(|t| t.composer_normalize.as_ref())
            .and_then(|c| c.indent_size)
            .unwrap_or(DEFAULT_INDENT_SIZE)
    }

    /// composer.json indentation character.
    #[must_use]
    pub fn composer_indent_style(&self) -> IndentStyle {
        self.tools()
            .and_then(|t| t.composer_normalize.as_ref())
            .and_then(|c| c.indent_style)
            .unwrap_or_default()
    }

    // Output

    /// Output verbosity.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        self.settings
            .output
            .as_ref()
            .and_then(|o| o.verbosity)
            .unwrap_or_default()
    }

    /// Whether colored output is enabled.
    #[must_use]
    pub fn colors(&self) -> bool {
        self.settings
            .output
            .as_ref()
            .and_then(|o| o.colors)
            .unwrap_or(true)
    }

    /// Whether progress indicators are enabled.
    #[must_use]
    pub fn progress(&self) -> bool {
        self.settings
            .output
            .as_ref()
            .and_then(|o| o.progress)
            .unwrap_or(true)
    }

    /// Whether tool warnings count as success.
    #[must_use]
    pub fn tolerate_warnings(&self) -> bool {
        self.settings
            .output
            .as_ref()
            .and_then(|o| o.tolerate_warnings)
            .unwrap_or(false)
    }

    // Performance

    /// Whether tools may run in parallel mode.
    #[must_use]
    pub fn parallel(&self) -> bool {
        self.settings
            .performance
            .as_ref()
            .and_then(|p| p.parallel)
            .unwrap_or(true)
    }

    /// Upper bound for worker processes.
    #[must_use]
    pub fn max_processes(&self) -> u16 {
        self.settings
            .performance
            .as_ref()
            .and_then(|p| p.max_processes)
            .unwrap_or(DEFAULT_MAX_PROCESSES)
    }

    /// Whether tools may use their result caches.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.settings
            .performance
            .as_ref()
            .and_then(|p| p.cache_enabled)
            .unwrap_or(true)
    }
}
