//! Property-based tests for pattern expansion and exclusion matching.
//!
//! Normalization has its own property tests in the normalize module.

use super::exclusion::{ExclusionSet, MatchCandidates};
use super::pattern::{expand_braces, has_glob_chars, namespace_of};
use proptest::prelude::*;
use std::path::PathBuf;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,11}"
}

fn relative_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment_strategy(), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Without braces, expansion is the identity.
    #[test]
    fn braces_identity_without_groups(pattern in "[a-z/*?]{0,30}") {
        prop_assert_eq!(expand_braces(&pattern), vec![pattern.clone()]);
    }

    // One group with n alternatives yields n patterns, none with braces left.
    #[test]
    fn braces_one_group(head in segment_strategy(), alts in prop::collection::vec(segment_strategy(), 1..5)) {
        let pattern = format!("{head}/{{{}}}", alts.join(","));
        let expanded = expand_braces(&pattern);
        prop_assert_eq!(expanded.len(), alts.len());
        for (out, alt) in expanded.iter().zip(&alts) {
            prop_assert_eq!(out, &format!("{head}/{alt}"));
        }
    }

    // Any plain segment pattern excludes paths that contain it.
    #[test]
    fn plain_segment_excludes_descendants(parts in relative_strategy(), pick in any::<prop::sample::Index>()) {
        let segment = pick.get(&parts).clone();
        prop_assume!(segment != "vendor");
        let root = PathBuf::from("/project");
        let path = parts.iter().fold(root.clone(), |p, s| p.join(s));

        let set = ExclusionSet::compile(&[format!("{segment}/")]).unwrap();
        let candidates = MatchCandidates::for_path(&path, &root, None);
        prop_assert!(set.is_excluded(&candidates, false));
        prop_assert!(set.is_excluded(&candidates, true));
    }

    // The generic vendor rule never drops an exempt path.
    #[test]
    fn exempt_paths_survive_vendor_rule(parts in relative_strategy()) {
        let root = PathBuf::from("/project");
        let vendor = root.join("vendor");
        let path = parts.iter().fold(vendor.clone(), |p, s| p.join(s));

        let set = ExclusionSet::compile(&["vendor/".to_string()]).unwrap();
        let candidates = MatchCandidates::for_path(&path, &root, Some(&vendor));
        prop_assert!(set.is_excluded(&candidates, false));
        prop_assert!(!set.is_excluded(&candidates, true));
    }

    // A namespace pattern is always a plain name followed by `/*`.
    #[test]
    fn namespace_round_trip(ns in segment_strategy()) {
        let pattern = format!("{ns}/*");
        prop_assert!(has_glob_chars(&pattern));
        prop_assert_eq!(namespace_of(&pattern), Some(ns.as_str()));
    }
}
