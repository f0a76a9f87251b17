//! Configuration validation.
//!
//! This module checks a raw or merged configuration tree against the known
//! schema. Unlike deserialization, which stops at the first problem, the
//! validator walks the whole tree and collects every issue so they can be
//! reported together.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::Value;

use crate::config::loader::ConfigSource;
use crate::config::merger::key_to_string;
use crate::config::schema::{IndentStyle, Tool, Verbosity, REPLACE_KEY, ROOT_KEY};
use crate::error::{Error, Result};

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted key path of the offending entry.
    pub path: String,
    /// What is wrong with it.
    pub message: String,
    /// File the entry was written in, when known.
    pub file: Option<PathBuf>,
}

impl ValidationIssue {
    /// Create an issue for `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Attribute the issue to `file`.
    #[must_use]
    pub fn in_file(mut self, file: &Path) -> Self {
        self.file = Some(file.to_path_buf());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}: ", file.display())?;
        }
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Outcome of validating a tree: valid, or an ordered list of issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Wrap already collected issues.
    #[must_use]
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// True when no issue was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues in the order they were found.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Turn an invalid report into [`Error::Validation`].
    ///
    /// # Errors
    ///
    /// Returns the report itself as an error when it holds any issue.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {issue}")?;
        }
        Ok(())
    }
}

/// Expected shape of a leaf.
#[derive(Debug, Clone, Copy)]
enum Field {
    Bool,
    Str,
    PhpVersion,
    DottedVersion,
    Int { min: i64, max: i64 },
    MemoryLimit,
    OneOf(&'static [&'static str]),
    StringList,
    PathList,
    Paths,
}

const PROJECT_FIELDS: &[(&str, Field)] = &[
    ("name", Field::Str),
    ("php_version", Field::PhpVersion),
    ("typo3_version", Field::DottedVersion),
];

const PATHS_FIELDS: &[(&str, Field)] = &[
    ("scan", Field::PathList),
    ("exclude", Field::PathList),
    ("additional", Field::PathList),
];

const OUTPUT_FIELDS: &[(&str, Field)] = &[
    ("verbosity", Field::OneOf(Verbosity::NAMES)),
    ("colors", Field::Bool),
    ("progress", Field::Bool),
    ("tolerate_warnings", Field::Bool),
];

const PERFORMANCE_FIELDS: &[(&str, Field)] = &[
    ("parallel", Field::Bool),
    ("max_processes", Field::Int { min: 1, max: 64 }),
    ("cache_enabled", Field::Bool),
];

const RECTOR_FIELDS: &[(&str, Field)] = &[
    ("enabled", Field::Bool),
    ("paths", Field::Paths),
    ("level", Field::Str),
    ("php_version", Field::PhpVersion),
    ("config_file", Field::Str),
];

const FRACTOR_FIELDS: &[(&str, Field)] = &[
    ("enabled", Field::Bool),
    ("paths", Field::Paths),
    ("indentation", Field::Int { min: 1, max: 8 }),
    ("config_file", Field::Str),
];

const PHPSTAN_FIELDS: &[(&str, Field)] = &[
    ("enabled", Field::Bool),
    ("paths", Field::Paths),
    ("level", Field::Int { min: 0, max: 9 }),
    ("memory_limit", Field::MemoryLimit),
    ("config_file", Field::Str),
];

const PHP_CS_FIXER_FIELDS: &[(&str, Field)] = &[
    ("enabled", Field::Bool),
    ("paths", Field::Paths),
    ("config_file", Field::Str),
    ("cache_file", Field::Str),
];

const TYPOSCRIPT_LINT_FIELDS: &[(&str, Field)] = &[
    ("enabled", Field::Bool),
    ("paths", Field::Paths),
    ("indentation", Field::Int { min: 1, max: 8 }),
    ("ignore_patterns", Field::StringList),
    ("config_file", Field::Str),
];

const COMPOSER_NORMALIZE_FIELDS: &[(&str, Field)] = &[
    ("enabled", Field::Bool),
    ("paths", Field::Paths),
    ("indent_size", Field::Int { min: 1, max: 8 }),
    ("indent_style", Field::OneOf(IndentStyle::NAMES)),
];

const fn tool_fields(tool: Tool) -> &'static [(&'static str, Field)] {
    match tool {
        Tool::Rector => RECTOR_FIELDS,
        Tool::Fractor => FRACTOR_FIELDS,
        Tool::Phpstan => PHPSTAN_FIELDS,
        Tool::PhpCsFixer => PHP_CS_FIXER_FIELDS,
        Tool::TypoScriptLint => TYPOSCRIPT_LINT_FIELDS,
        Tool::ComposerNormalize => COMPOSER_NORMALIZE_FIELDS,
    }
}

fn php_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d+\.\d+$").unwrap_or_else(|e| unreachable!("version pattern is valid: {e}"))
    })
}

fn dotted_version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d+(\.\d+)*$")
            .unwrap_or_else(|e| unreachable!("version pattern is valid: {e}"))
    })
}

fn memory_limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(-1|\d+[KMGkmg]?)$")
            .unwrap_or_else(|e| unreachable!("memory limit pattern is valid: {e}"))
    })
}

/// Validates configuration trees against the schema.
///
/// # Examples
///
/// ```
/// use quality_tools::config::ConfigValidator;
///
/// let tree = serde_yaml::from_str("quality-tools: {tools: {phpstan: {level: 12}}}").unwrap();
/// let report = ConfigValidator::validate(&tree);
/// assert!(!report.is_valid());
/// assert_eq!(report.issues()[0].path, "quality-tools.tools.phpstan.level");
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration tree.
    ///
    /// An empty tree is valid. Null leaves count as unset and are skipped.
    #[must_use]
    pub fn validate(tree: &Value) -> ValidationReport {
        let mut issues = Vec::new();

        match tree {
            Value::Null => {}
            Value::Mapping(map) => {
                for (key, value) in map {
                    let key = key_to_string(key);
                    if key == ROOT_KEY {
                        Self::validate_root(value, &mut issues);
                    } else {
                        issues.push(ValidationIssue::new(
                            key,
                            format!("unknown key; configuration must be nested under '{ROOT_KEY}'"),
                        ));
                    }
                }
            }
            _ => issues.push(ValidationIssue::new(
                "",
                "configuration document must be a mapping",
            )),
        }

        ValidationReport::from_issues(issues)
    }

    /// Validate every source on its own, then the merged tree.
    ///
    /// Issues found in a file-backed source name that file. The merged tree
    /// only contributes issues at paths no source was already blamed for.
    #[must_use]
    pub fn validate_sources(sources: &[ConfigSource], merged: &Value) -> ValidationReport {
        let mut issues: Vec<ValidationIssue> = Vec::new();
        for source in sources {
            let found = Self::validate(&source.tree).issues;
            issues.extend(found.into_iter().map(|issue| match &source.path {
                Some(path) => issue.in_file(path),
                None => issue,
            }));
        }

        for issue in Self::validate(merged).issues {
            if !issues.iter().any(|known| known.path == issue.path) {
                issues.push(issue);
            }
        }

        ValidationReport::from_issues(issues)
    }

    /// Validate and convert failure into an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] carrying every issue found.
    pub fn validate_or_err(tree: &Value) -> Result<()> {
        Self::validate(tree).into_result()
    }

    fn validate_root(value: &Value, issues: &mut Vec<ValidationIssue>) {
        let Some(map) = Self::expect_mapping(value, ROOT_KEY, issues) else {
            return;
        };

        for (key, value) in map {
            let key = key_to_string(key);
            let path = format!("{ROOT_KEY}.{key}");
            match key.as_str() {
                "project" => Self::validate_section(value, &path, PROJECT_FIELDS, issues),
                "paths" => Self::validate_section(value, &path, PATHS_FIELDS, issues),
                "tools" => Self::validate_tools(value, &path, issues),
                "output" => Self::validate_section(value, &path, OUTPUT_FIELDS, issues),
                "performance" => Self::validate_section(value, &path, PERFORMANCE_FIELDS, issues),
                _ => issues.push(ValidationIssue::new(path, "unknown key")),
            }
        }
    }

    fn validate_tools(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        let Some(map) = Self::expect_mapping(value, path, issues) else {
            return;
        };

        for (key, value) in map {
            let name = key_to_string(key);
            let tool_path = format!("{path}.{name}");
            match name.parse::<Tool>() {
                Ok(tool) => Self::validate_section(value, &tool_path, tool_fields(tool), issues),
                Err(_) => issues.push(ValidationIssue::new(
                    tool_path,
                    format!(
                        "unknown tool; expected one of {}",
                        Tool::ALL.map(Tool::key).join(", ")
                    ),
                )),
            }
        }
    }

    fn validate_section(
        value: &Value,
        path: &str,
        fields: &[(&str, Field)],
        issues: &mut Vec<ValidationIssue>,
    ) {
        let Some(map) = Self::expect_mapping(value, path, issues) else {
            return;
        };

        for (key, value) in map {
            let key = key_to_string(key);
            let field_path = format!("{path}.{key}");
            match fields.iter().find(|(name, _)| *name == key) {
                Some((_, field)) => Self::validate_field(value, &field_path, *field, issues),
                None => issues.push(ValidationIssue::new(field_path, "unknown key")),
            }
        }
    }

    /// `None` when the node is null or not a mapping; the latter is reported.
    fn expect_mapping<'a>(
        value: &'a Value,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Option<&'a serde_yaml::Mapping> {
        match value {
            Value::Mapping(map) => Some(map),
            Value::Null => None,
            _ => {
                issues.push(ValidationIssue::new(path, "expected a mapping"));
                None
            }
        }
    }

    fn validate_field(value: &Value, path: &str, field: Field, issues: &mut Vec<ValidationIssue>) {
        if value.is_null() {
            return;
        }

        let problem = match field {
            Field::Bool => (!value.is_bool()).then(|| "expected true or false".to_string()),
            Field::Str => (!value.is_string()).then(|| "expected a string".to_string()),
            Field::PhpVersion => match value.as_str() {
                Some(s) if php_version_pattern().is_match(s) => None,
                Some(s) => Some(format!("'{s}' is not a MAJOR.MINOR version")),
                None => Some("expected a quoted version string such as \"8.3\"".to_string()),
            },
            Field::DottedVersion => match value.as_str() {
                Some(s) if dotted_version_pattern().is_match(s) => None,
                Some(s) => Some(format!("'{s}' is not a dotted version")),
                None => Some("expected a quoted version string such as \"13.4\"".to_string()),
            },
            Field::Int { min, max } => match value.as_i64() {
                Some(n) if (min..=max).contains(&n) => None,
                Some(n) => Some(format!("{n} is out of range; must be between {min} and {max}")),
                None => Some(format!("expected an integer between {min} and {max}")),
            },
            Field::MemoryLimit => Self::check_memory_limit(value),
            Field::OneOf(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => None,
                _ => Some(format!(
                    "must be one of {}, got {}",
                    allowed.join(", "),
                    describe(value)
                )),
            },
            Field::StringList => Self::check_string_list(value, false),
            Field::PathList => match value {
                Value::Mapping(map) => match map.get(REPLACE_KEY) {
                    Some(inner) if map.len() == 1 => Self::check_string_list(inner, true)
                        .map(|p| format!("{REPLACE_KEY}: {p}")),
                    _ => Some(format!(
                        "expected a list of paths or {{ {REPLACE_KEY}: [...] }}"
                    )),
                },
                other => Self::check_string_list(other, true),
            },
            Field::Paths => {
                Self::validate_section(value, path, PATHS_FIELDS, issues);
                None
            }
        };

        if let Some(message) = problem {
            issues.push(ValidationIssue::new(path, message));
        }
    }

    fn check_memory_limit(value: &Value) -> Option<String> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Some(format!("expected a memory size, got {}", describe(other))),
        };
        if memory_limit_pattern().is_match(&text) {
            None
        } else {
            Some(format!(
                "'{text}' is not a memory size; use -1 or digits with an optional K, M or G unit"
            ))
        }
    }

    fn check_string_list(value: &Value, non_empty: bool) -> Option<String> {
        let Some(items) = value.as_sequence() else {
            return Some(format!("expected a list, got {}", describe(value)));
        };
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) if non_empty && s.trim().is_empty() => {
                    return Some(format!("entry {i} is empty"));
                }
                Some(_) => {}
                None => return Some(format!("entry {i} must be a string")),
            }
        }
        None
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(_) => "a tagged value".to_string(),
    }
}
