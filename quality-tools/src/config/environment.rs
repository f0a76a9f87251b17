//! Environment variable interpolation for configuration text.
//!
//! Configuration files may reference environment variables as `${NAME}` or
//! `${NAME:-default}`. Interpolation runs over the raw file text before it is
//! parsed, so everything outside a token (including YAML/JSON syntax) passes
//! through untouched.

use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use crate::config::merger::key_to_string;
use crate::error::{Error, Result};

/// A read-only view of environment variables.
///
/// The process environment is the usual source; tests supply a [`MapEnv`]
/// so they never have to mutate global state.
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource {
    /// Value of `name`, or `None` if it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads from the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

/// An in-memory environment.
///
/// # Examples
///
/// ```
/// use quality_tools::config::environment::{EnvSource, MapEnv};
///
/// let env: MapEnv = [("LEVEL", "5")].into_iter().collect();
/// assert_eq!(env.var("LEVEL").as_deref(), Some("5"));
/// assert_eq!(env.var("OTHER"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// An empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .unwrap_or_else(|e| unreachable!("token pattern is valid: {e}"))
    })
}

/// Replace every `${NAME}` / `${NAME:-default}` token in `text`.
///
/// A default is substituted literally; it is not itself interpolated. A set
/// variable wins over its default even when its value is empty.
///
/// # Errors
///
/// Returns [`Error::MissingVariable`] for the first token whose variable is
/// unset and has no default. The loader attaches the file and, via
/// [`reference_path`], the key.
///
/// # Examples
///
/// ```
/// use quality_tools::config::environment::{interpolate, MapEnv};
///
/// let env = MapEnv::new().with("FOO", "baz");
/// assert_eq!(interpolate("a: ${FOO:-bar}", &env).unwrap(), "a: baz");
/// assert_eq!(interpolate("a: ${NOPE:-bar}", &env).unwrap(), "a: bar");
/// assert!(interpolate("a: ${NOPE}", &env).is_err());
/// ```
pub fn interpolate(text: &str, env: &dyn EnvSource) -> Result<String> {
    let mut missing: Option<String> = None;

    let replaced = token_pattern().replace_all(text, |caps: &Captures<'_>| {
        let name = &caps[1];
        match (env.var(name), caps.get(2)) {
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        }
    });

    if let Some(variable) = missing {
        return Err(Error::MissingVariable {
            variable,
            file: None,
            key: None,
        });
    }

    Ok(replaced.into_owned())
}

/// Dotted key path of the first string leaf in `tree` that references
/// `variable`.
///
/// Sequence entries report the key that holds the sequence. Works the same
/// for trees parsed from YAML or JSON.
///
/// # Examples
///
/// ```
/// use quality_tools::config::environment::reference_path;
///
/// let tree = serde_yaml::from_str("a:\n  b: ${LEVEL}\n  c: [x, '${SRC:-src}']\n").unwrap();
/// assert_eq!(reference_path(&tree, "LEVEL").as_deref(), Some("a.b"));
/// assert_eq!(reference_path(&tree, "SRC").as_deref(), Some("a.c"));
/// assert_eq!(reference_path(&tree, "OTHER"), None);
/// ```
#[must_use]
pub fn reference_path(tree: &Value, variable: &str) -> Option<String> {
    let mut keys = Vec::new();
    find_reference(tree, variable, &mut keys).then(|| keys.join("."))
}

fn find_reference(value: &Value, variable: &str, keys: &mut Vec<String>) -> bool {
    match value {
        Value::String(text) => token_pattern()
            .captures_iter(text)
            .any(|caps| &caps[1] == variable),
        Value::Sequence(items) => items.iter().any(|item| find_reference(item, variable, keys)),
        Value::Mapping(map) => {
            for (key, child) in map {
                keys.push(key_to_string(key));
                if find_reference(child, variable, keys) {
                    return true;
                }
                keys.pop();
            }
            false
        }
        Value::Tagged(tagged) => find_reference(&tagged.value, variable, keys),
        _ => false,
    }
}
