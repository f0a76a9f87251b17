//! Configuration pipeline: load, merge, validate, project.

use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::config::environment::{EnvSource, ProcessEnv};
use crate::config::loader::{ConfigLoader, ConfigSource, SourceKind};
use crate::config::merger::ConfigMerger;
use crate::config::model::Configuration;
use crate::config::schema::{Verbosity, ROOT_KEY};
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Where the global configuration file is looked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum GlobalLocation {
    #[default]
    Home,
    Path(PathBuf),
    Skip,
}

/// Values from command-line flags that map onto configuration leaves.
///
/// Only flags that were actually given are set; everything else stays
/// `None` so lower sources keep their values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `output.verbosity`.
    pub verbosity: Option<Verbosity>,
    /// `output.colors`.
    pub colors: Option<bool>,
}

impl CliOverrides {
    /// True when no flag was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verbosity.is_none() && self.colors.is_none()
    }

    /// The overrides as a configuration tree.
    #[must_use]
    pub fn to_tree(&self) -> Value {
        let mut output = Mapping::new();
        if let Some(verbosity) = self.verbosity {
            let name = match verbosity {
                Verbosity::Quiet => "quiet",
                Verbosity::Normal => "normal",
                Verbosity::Verbose => "verbose",
                Verbosity::Debug => "debug",
            };
            output.insert("verbosity".into(), name.into());
        }
        if let Some(colors) = self.colors {
            output.insert("colors".into(), colors.into());
        }

        let mut root = Mapping::new();
        if !output.is_empty() {
            root.insert("output".into(), Value::Mapping(output));
        }
        let mut doc = Mapping::new();
        doc.insert(ROOT_KEY.into(), Value::Mapping(root));
        Value::Mapping(doc)
    }
}

/// Builder for loading the effective configuration.
///
/// # Examples
///
/// ```no_run
/// use quality_tools::config::ConfigBuilder;
/// use std::path::Path;
///
/// let config = ConfigBuilder::new()
///     .with_project_root(Path::new("/path/to/project"))
///     .build()
///     .unwrap();
/// println!("phpstan level {}", config.phpstan_level());
/// ```
///
/// Skipping every file source:
///
/// ```
/// use quality_tools::config::{CliOverrides, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .with_overrides(CliOverrides { colors: Some(false), ..Default::default() })
///     .build()
///     .unwrap();
/// assert!(!config.colors());
/// ```
pub struct ConfigBuilder {
    project_root: Option<PathBuf>,
    config_file: Option<PathBuf>,
    global: GlobalLocation,
    skip_project: bool,
    overrides: CliOverrides,
    env: Box<dyn EnvSource>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Create a new configuration builder reading the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            project_root: None,
            config_file: None,
            global: GlobalLocation::Home,
            skip_project: false,
            overrides: CliOverrides::default(),
            env: Box::new(ProcessEnv),
        }
    }

    /// Directory searched for the project file.
    #[must_use]
    pub fn with_project_root(mut self, root: &Path) -> Self {
        self.project_root = Some(root.to_path_buf());
        self
    }

    /// Use this file instead of discovering the project file.
    #[must_use]
    pub fn with_config_file(mut self, path: &Path) -> Self {
        self.config_file = Some(path.to_path_buf());
        self
    }

    /// Read the global file from `path` instead of the home directory.
    #[must_use]
    pub fn with_global_file(mut self, path: &Path) -> Self {
        self.global = GlobalLocation::Path(path.to_path_buf());
        self
    }

    /// Do not read the global file.
    #[must_use]
    pub fn skip_global(mut self) -> Self {
        self.global = GlobalLocation::Skip;
        self
    }

    /// Do not read any file; package defaults and overrides only.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.global = GlobalLocation::Skip;
        self.skip_project = true;
        self
    }

    /// Apply command-line overrides with the highest precedence.
    #[must_use]
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Read interpolation variables from `env`.
    #[must_use]
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Collect every source in ascending precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if any existing file fails to load, or if an
    /// explicit configuration file is missing.
    pub fn sources(&self) -> Result<Vec<ConfigSource>> {
        let env = self.env.as_ref();
        let mut sources = vec![ConfigLoader::package_defaults()?];

        let global = match &self.global {
            GlobalLocation::Home => ConfigLoader::default_global_path(),
            GlobalLocation::Path(path) => Some(path.clone()),
            GlobalLocation::Skip => None,
        };
        if let Some(path) = global {
            sources.extend(ConfigLoader::load_optional(&path, SourceKind::Global, env)?);
        }

        if let Some(path) = &self.config_file {
            sources.push(ConfigLoader::load_explicit(path, env)?);
        } else if !self.skip_project {
            let root = match &self.project_root {
                Some(root) => root.clone(),
                None => std::env::current_dir()?,
            };
            if let Some(path) = ConfigLoader::discover_project_file(&root) {
                sources.push(ConfigLoader::load_file(&path, SourceKind::Project, env)?);
            } else {
                log::debug!("no project configuration in {}", root.display());
            }
        }

        if !self.overrides.is_empty() {
            sources.push(ConfigSource::cli_overrides(self.overrides.to_tree()));
        }

        Ok(sources)
    }

    /// Load, merge and validate, then build the typed view.
    ///
    /// Validation is a hard gate: every issue is reported at once and no
    /// partially valid configuration is returned.
    ///
    /// # Errors
    ///
    /// Returns a loading error, or [`Error::Validation`](crate::Error::Validation)
    /// listing every schema violation.
    pub fn build(self) -> Result<Configuration> {
        let sources = self.sources()?;
        let merged = ConfigMerger::merge(&sources);
        ConfigValidator::validate_sources(&sources, &merged).into_result()?;
        Configuration::from_tree(merged)
    }
}
