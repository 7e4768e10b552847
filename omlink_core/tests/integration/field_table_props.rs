//! Property tests: field path table lookup.
//!
//! Validates: every registered path resolves in any letter case → lookup
//! agrees with a linear scan for mutated and arbitrary paths.

use omlink_core::field::{Category, FieldPathTable, FieldTag};
use proptest::prelude::*;

fn linear_scan(table: &FieldPathTable, path: &str) -> FieldTag {
    table
        .entries()
        .iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(path))
        .map_or(FieldTag::Unrecognized, |e| e.1)
}

fn recase(path: &str, mask: &[bool]) -> String {
    path.chars()
        .zip(mask.iter().cycle())
        .map(|(c, &upper)| {
            if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn registered_paths_resolve_in_any_case(
        pick in any::<prop::sample::Index>(),
        mask in prop::collection::vec(any::<bool>(), 1..32),
    ) {
        let table = FieldPathTable::new();
        let (path, tag) = table.entries()[pick.index(table.len())];
        let candidate = recase(path, &mask);
        prop_assert_eq!(table.lookup(&candidate), tag);
        prop_assert_ne!(tag, FieldTag::Unrecognized);
    }

    #[test]
    fn mutated_paths_match_linear_scan(
        pick in any::<prop::sample::Index>(),
        cut in 0usize..40,
        suffix in "[a-zA-Z.^]{0,6}",
    ) {
        let table = FieldPathTable::new();
        let (path, _) = table.entries()[pick.index(table.len())];
        let keep = cut.min(path.len());
        let candidate = format!("{}{}", &path[..keep], suffix);
        prop_assert_eq!(table.lookup(&candidate), linear_scan(&table, &candidate));
    }

    #[test]
    fn arbitrary_paths_match_linear_scan(candidate in "[a-zA-Z.^]{0,24}") {
        let table = FieldPathTable::new();
        prop_assert_eq!(table.lookup(&candidate), linear_scan(&table, &candidate));
    }

    #[test]
    fn category_keys_resolve_in_any_case(
        pick in 0usize..Category::COUNT,
        mask in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let category = Category::ALL[pick];
        prop_assert_eq!(Category::from_key(&recase(category.key(), &mask)), Some(category));
    }
}

#[test]
fn marker_suffix_is_never_registered() {
    let table = FieldPathTable::new();
    for (path, _) in table.entries() {
        let candidate = format!("{path}#");
        assert_eq!(table.lookup(&candidate), FieldTag::Unrecognized, "{candidate}");
    }
}
