//! Property-based tests for extraction containment and name matching.

#![allow(clippy::expect_used)]

use cachepack_core::MatchStrategy;
use cachepack_core::security::ExtractionGuard;
use cachepack_core::types::DestDir;
use proptest::prelude::*;
use tempfile::TempDir;

fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = DestDir::new(temp.path().to_path_buf()).expect("failed to create dest");
    (temp, dest)
}

proptest! {
    /// Any name with a `..` segment is rejected.
    #[test]
    fn prop_parent_segments_rejected(
        prefix in "([a-z]+/){0,5}",
        suffix in "([a-z]+/?){0,5}"
    ) {
        let (_temp, dest) = create_test_dest();
        let guard = ExtractionGuard::new(&dest);
        let name = format!("{prefix}../{suffix}");
        prop_assert!(guard.entry_target(&name).is_err());
    }

    /// Plain relative names land under the root.
    #[test]
    fn prop_relative_names_contained(
        components in prop::collection::vec("[a-zA-Z0-9_.-]{1,20}", 1..6)
    ) {
        prop_assume!(components.iter().all(|c| c != "." && c != ".."));
        let (_temp, dest) = create_test_dest();
        let guard = ExtractionGuard::new(&dest);
        let target = guard.entry_target(&components.join("/")).expect("valid name");
        prop_assert!(target.absolute().starts_with(dest.as_path()));
    }

    /// Symlink text that climbs more levels than the link is deep escapes.
    #[test]
    fn prop_symlink_climbing_out_rejected(
        depth in 0usize..5,
        extra in 1usize..5
    ) {
        let (_temp, dest) = create_test_dest();
        let guard = ExtractionGuard::new(&dest);
        let mut name: Vec<String> = (0..depth).map(|i| format!("d{i}")).collect();
        name.push("link".into());
        let link = guard.entry_target(&name.join("/")).expect("valid name");

        let text = "../".repeat(depth + extra) + "etc/passwd";
        prop_assert!(guard.symlink_target(&link, &text).is_err());
    }

    /// A name always matches itself and its base name under both
    /// strategies.
    #[test]
    fn prop_name_matches_its_suffixes(
        components in prop::collection::vec("[a-z0-9]{1,8}", 1..5)
    ) {
        let name = components.join("/");
        let base = components.last().expect("non-empty");
        for strategy in [MatchStrategy::Suffix, MatchStrategy::Relaxed] {
            prop_assert!(strategy.matches(&name, &name));
            prop_assert!(strategy.matches(&name, base));
        }
    }
}
