//! Property-based tests for interpolation and validation.

use super::environment::{interpolate, MapEnv};
use super::loader::ConfigLoader;
use super::merger::ConfigMerger;
use super::validator::ConfigValidator;
use proptest::prelude::*;
use serde_yaml::Value;

// Text that never forms a `${...}` token
fn plain_text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 :_\\-\\[\\]{}'\"#\n]{0,80}"
}

fn var_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,12}"
}

fn phpstan_doc(level: i64) -> Value {
    serde_yaml::from_str(&format!(
        "quality-tools: {{tools: {{phpstan: {{level: {level}}}}}}}"
    ))
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Text without tokens passes through unchanged
    #[test]
    fn interpolation_is_identity_without_tokens(text in plain_text_strategy()) {
        let out = interpolate(&text, &MapEnv::new()).unwrap();
        prop_assert_eq!(out, text);
    }

    // A set variable always wins over its default
    #[test]
    fn set_variable_wins_over_default(
        name in var_name_strategy(),
        value in "[a-z0-9]{0,10}",
        default in "[a-z0-9]{0,10}",
    ) {
        let env = MapEnv::new().with(name.clone(), value.clone());
        let out = interpolate(&format!("x: ${{{name}:-{default}}}"), &env).unwrap();
        prop_assert_eq!(out, format!("x: {value}"));
    }

    // An unset variable without default always fails and names the variable
    #[test]
    fn unset_variable_without_default_fails(name in var_name_strategy()) {
        let err = interpolate(&format!("x: ${{{name}}}"), &MapEnv::new()).unwrap_err();
        prop_assert!(format!("{err}").contains(&name));
    }

    // Levels inside 0..=9 validate, everything else is reported at the level key
    #[test]
    fn phpstan_level_range(level in -20i64..40) {
        let report = ConfigValidator::validate(&phpstan_doc(level));
        if (0..=9).contains(&level) {
            prop_assert!(report.is_valid());
        } else {
            prop_assert_eq!(report.issues().len(), 1);
            prop_assert_eq!(&report.issues()[0].path, "quality-tools.tools.phpstan.level");
        }
    }

    // Merging a valid project document over the defaults stays valid
    #[test]
    fn valid_overrides_keep_defaults_valid(
        level in 0i64..=9,
        scan in prop::collection::vec("[a-z]{1,8}/", 0..4),
        colors in any::<bool>(),
    ) {
        let mut tree = ConfigLoader::package_defaults().unwrap().tree;
        let project: Value = serde_yaml::from_str(&format!(
            "quality-tools: {{tools: {{phpstan: {{level: {level}}}}}, paths: {{scan: {scan:?}}}, output: {{colors: {colors}}}}}"
        ))
        .unwrap();
        ConfigMerger::merge_into(&mut tree, &project);
        prop_assert!(ConfigValidator::validate(&tree).is_valid());
    }
}
