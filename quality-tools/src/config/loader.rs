//! Configuration file discovery and loading.
//!
//! This module handles discovering and loading quality-tools configuration
//! files from the fixed source hierarchy, running environment interpolation
//! over each file before it is parsed.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::environment::{interpolate, reference_path, EnvSource};
use crate::config::merger::ConfigMerger;
use crate::error::{Error, Result};

/// Package defaults, shipped inside the binary.
pub const DEFAULTS_YAML: &str = include_str!("defaults.yaml");

/// Project file names, tried in this order; the first existing one wins.
pub const PROJECT_FILE_NAMES: &[&str] = &[
    ".quality-tools.yaml",
    "quality-tools.yaml",
    "quality-tools.yml",
    ".quality-tools.json",
    "quality-tools.json",
];

/// File name of the per-user configuration inside the home directory.
pub const GLOBAL_FILE_NAME: &str = ".quality-tools.yaml";

/// Where a configuration source came from.
///
/// Variants are declared from lowest to highest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    /// Defaults compiled into the package.
    PackageDefault,
    /// The per-user file in the home directory.
    Global,
    /// The project file, discovered or given with `--config`.
    Project,
    /// Values supplied as command-line flags.
    CliOverride,
}

impl SourceKind {
    /// Precedence rank; higher values win.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::PackageDefault => 0,
            Self::Global => 1,
            Self::Project => 2,
            Self::CliOverride => 3,
        }
    }
}

/// One origin of configuration data with its parsed tree.
///
/// # Examples
///
/// ```
/// use quality_tools::config::{ConfigLoader, SourceKind};
///
/// let defaults = ConfigLoader::package_defaults().unwrap();
/// assert_eq!(defaults.kind, SourceKind::PackageDefault);
/// assert!(defaults.path.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Kind of source.
    pub kind: SourceKind,
    /// Path to the file, if the source is a file.
    pub path: Option<PathBuf>,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed tree.
    pub tree: Value,
}

impl ConfigSource {
    /// A source built from command-line flag values.
    #[must_use]
    pub fn cli_overrides(tree: Value) -> Self {
        Self {
            kind: SourceKind::CliOverride,
            path: None,
            precedence: SourceKind::CliOverride.precedence(),
            tree,
        }
    }

    /// Short label for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.path, self.kind) {
            (Some(path), _) => path.display().to_string(),
            (None, SourceKind::PackageDefault) => "package defaults".to_string(),
            (None, SourceKind::CliOverride) => "command-line flags".to_string(),
            (None, kind) => format!("{kind:?}"),
        }
    }
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (default).
    Yaml,
    /// JSON, using the same schema.
    Json,
}

impl ConfigFormat {
    /// Format implied by a file's extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Loads configuration from the source hierarchy.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and merge package defaults, the global file and the project file.
    ///
    /// A missing global or project file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if any existing file cannot be read, interpolated or
    /// parsed.
    pub fn load(project_root: &Path, env: &dyn EnvSource) -> Result<Value> {
        let mut sources = vec![Self::package_defaults()?];

        if let Some(global) = Self::default_global_path() {
            sources.extend(Self::load_optional(&global, SourceKind::Global, env)?);
        }
        if let Some(project) = Self::discover_project_file(project_root) {
            sources.push(Self::load_file(&project, SourceKind::Project, env)?);
        }

        Ok(ConfigMerger::merge(&sources))
    }

    /// The compiled-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if the shipped defaults are broken.
    pub fn package_defaults() -> Result<ConfigSource> {
        Ok(ConfigSource {
            kind: SourceKind::PackageDefault,
            path: None,
            precedence: SourceKind::PackageDefault.precedence(),
            tree: Self::parse(DEFAULTS_YAML, ConfigFormat::Yaml, None)?,
        })
    }

    /// `~/.quality-tools.yaml`, if the home directory is known.
    #[must_use]
    pub fn default_global_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(GLOBAL_FILE_NAME))
    }

    /// First existing project file in [`PROJECT_FILE_NAMES`] order.
    #[must_use]
    pub fn discover_project_file(project_root: &Path) -> Option<PathBuf> {
        PROJECT_FILE_NAMES
            .iter()
            .map(|name| project_root.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load `path` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_optional(
        path: &Path,
        kind: SourceKind,
        env: &dyn EnvSource,
    ) -> Result<Option<ConfigSource>> {
        if !path.exists() {
            log::debug!("no {kind:?} configuration at {}", path.display());
            return Ok(None);
        }
        Self::load_file(path, kind, env).map(Some)
    }

    /// Load a file named explicitly by the user (`--config`).
    ///
    /// # Errors
    ///
    /// Returns a file-system error if the path is missing or not a regular
    /// file, otherwise the same errors as [`ConfigLoader::load_file`].
    pub fn load_explicit(path: &Path, env: &dyn EnvSource) -> Result<ConfigSource> {
        if !path.exists() {
            return Err(Error::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(Error::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Self::load_file(path, SourceKind::Project, env)
    }

    /// Read, interpolate and parse one configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, references an unset
    /// variable without default, or is not valid YAML/JSON.
    pub fn load_file(path: &Path, kind: SourceKind, env: &dyn EnvSource) -> Result<ConfigSource> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::PathNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Error::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Error::InvalidPath {
                path: path.to_path_buf(),
                reason: format!("failed to read configuration file: {e}"),
            },
        })?;

        let format = ConfigFormat::from_path(path);
        let text =
            interpolate(&raw, env).map_err(|e| Self::locate(e, &raw, format).in_file(path))?;
        let tree = Self::parse(&text, format, Some(path))?;

        log::debug!("loaded {kind:?} configuration from {}", path.display());
        Ok(ConfigSource {
            kind,
            path: Some(path.to_path_buf()),
            precedence: kind.precedence(),
            tree,
        })
    }

    /// Fill in the key of a missing-variable error from the uninterpolated
    /// document. Left unset when the raw text does not parse.
    fn locate(err: Error, raw: &str, format: ConfigFormat) -> Error {
        match err {
            Error::MissingVariable {
                variable,
                file,
                key: None,
            } => {
                let key = Self::parse(raw, format, None)
                    .ok()
                    .and_then(|tree| reference_path(&tree, &variable));
                Error::MissingVariable { variable, file, key }
            }
            other => other,
        }
    }

    /// Parse configuration text into a raw tree.
    ///
    /// An empty document yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns a configuration error carrying the parser's message.
    pub fn parse(text: &str, format: ConfigFormat, path: Option<&Path>) -> Result<Value> {
        let parsed = match format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str::<Value>(text).map_err(|e| Error::Configuration {
                    file: path.map(Path::to_path_buf),
                    key: None,
                    message: format!("invalid YAML: {e}"),
                })?
            }
            ConfigFormat::Json => {
                if text.trim().is_empty() {
                    Value::Null
                } else {
                    let json: serde_json::Value =
                        serde_json::from_str(text).map_err(|e| Error::Configuration {
                            file: path.map(Path::to_path_buf),
                            key: None,
                            message: format!("invalid JSON: {e}"),
                        })?;
                    serde_yaml::to_value(json).map_err(|e| Error::Configuration {
                        file: path.map(Path::to_path_buf),
                        key: None,
                        message: format!("unsupported JSON value: {e}"),
                    })?
                }
            }
        };

        Ok(match parsed {
            Value::Null => Value::Mapping(Mapping::new()),
            other => other,
        })
    }
}
