//! Configuration merging and precedence handling.
//!
//! This module implements hierarchical deep merging of raw configuration
//! trees, with special handling for the accumulated path lists enumerated in
//! [`is_additive_path`](crate::config::schema::is_additive_path).

use serde_yaml::{Mapping, Value};

use crate::config::loader::ConfigSource;
use crate::config::schema::{is_additive_path, REPLACE_KEY};

/// Merges configuration trees according to precedence rules.
///
/// # Examples
///
/// ```
/// use quality_tools::config::ConfigMerger;
///
/// let mut merged: serde_yaml::Value =
///     serde_yaml::from_str("quality-tools: {output: {colors: true}}").unwrap();
/// let high: serde_yaml::Value =
///     serde_yaml::from_str("quality-tools: {output: {colors: false}}").unwrap();
///
/// ConfigMerger::merge_into(&mut merged, &high);
/// assert_eq!(merged["quality-tools"]["output"]["colors"], serde_yaml::Value::Bool(false));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into one tree.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: &[ConfigSource]) -> Value {
        let mut result = Value::Mapping(Mapping::new());

        for source in sources {
            log::debug!("merging {} (precedence {})", source.describe(), source.precedence);
            Self::merge_into(&mut result, &source.tree);
        }

        result
    }

    /// Merge `source` into `target`; `source` has the higher precedence.
    ///
    /// # Merging Rules
    ///
    /// - Mappings: keys are unioned, common keys merge recursively
    /// - Additive path lists: appended, then deduplicated keeping first occurrence,
    ///   unless the source writes `{ replace: [...] }`
    /// - Everything else (scalars, other sequences): source replaces target
    /// - Null source values leave the target untouched
    pub fn merge_into(target: &mut Value, source: &Value) {
        let mut path = Vec::new();
        Self::merge_at(target, source, &mut path);
    }

    fn merge_at(target: &mut Value, source: &Value, path: &mut Vec<String>) {
        if source.is_null() {
            return;
        }

        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
        if is_additive_path(&segments) {
            Self::merge_path_list(target, source);
            return;
        }

        match source {
            Value::Mapping(source_map) => {
                if !target.is_mapping() {
                    *target = Value::Mapping(Mapping::new());
                }
                if let Value::Mapping(target_map) = target {
                    for (key, value) in source_map {
                        path.push(key_to_string(key));
                        let slot = target_map.entry(key.clone()).or_insert(Value::Null);
                        Self::merge_at(slot, value, path);
                        path.pop();
                    }
                }
            }
            other => *target = other.clone(),
        }
    }

    /// Append (or replace) an additive path list.
    fn merge_path_list(target: &mut Value, source: &Value) {
        let (incoming, replace) = match source {
            Value::Sequence(items) => (items.clone(), false),
            Value::Mapping(map) => match map.get(REPLACE_KEY) {
                Some(Value::Sequence(items)) if map.len() == 1 => (items.clone(), true),
                _ => {
                    // Malformed; keep it verbatim so validation can point at it.
                    *target = source.clone();
                    return;
                }
            },
            other => {
                *target = other.clone();
                return;
            }
        };

        let mut combined = match target {
            Value::Sequence(existing) if !replace => existing.clone(),
            _ => Vec::new(),
        };
        combined.extend(incoming);
        *target = Value::Sequence(dedupe(combined));
    }
}

/// Remove duplicates, keeping the first occurrence of each value.
fn dedupe(items: Vec<Value>) -> Vec<Value> {
    let mut result: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if !result.contains(&item) {
            result.push(item);
        }
    }
    result
}

pub(crate) fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "~".to_string(),
        _ => "?".to_string(),
    }
}
