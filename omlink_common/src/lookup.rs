//! Lookup in tables sorted by a string key.
//!
//! Every name table in the workspace (field paths, category keys, status
//! names) is searched through [`find_sorted_by`]. The comparison is a
//! parameter; the wire tables all use [`cmp_ignore_ascii_case`].

use core::cmp::Ordering;

/// Entry of a table searched by string key.
pub trait Keyed {
    /// The key the table is sorted by.
    fn key(&self) -> &str;
}

impl<V> Keyed for (&str, V) {
    #[inline]
    fn key(&self) -> &str {
        self.0
    }
}

/// ASCII case-insensitive ordering, byte-wise like `strcasecmp`.
pub fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Binary search `table` for `key`.
///
/// `cmp(key, entry)` must order `key` against the entry's key, and `table`
/// must be sorted ascending under the same ordering. O(log n); returns
/// `None` when no entry compares equal.
pub fn find_sorted_by<'t, T, K, F>(table: &'t [T], key: &K, mut cmp: F) -> Option<&'t T>
where
    K: ?Sized,
    F: FnMut(&K, &T) -> Ordering,
{
    table
        .binary_search_by(|entry| cmp(key, entry).reverse())
        .ok()
        .map(|idx| &table[idx])
}

/// Case-insensitive lookup of `key` in a [`Keyed`] table.
#[inline]
pub fn find_ignore_case<'t, T: Keyed>(table: &'t [T], key: &str) -> Option<&'t T> {
    find_sorted_by(table, key, |k, entry| cmp_ignore_ascii_case(k, entry.key()))
}

/// Sort a [`Keyed`] table case-insensitively.
pub fn sort_ignore_case<T: Keyed>(table: &mut [T]) {
    table.sort_unstable_by(|a, b| cmp_ignore_ascii_case(a.key(), b.key()));
}

/// Check that a [`Keyed`] table is strictly ascending (sorted, no duplicate keys).
pub fn is_strictly_sorted_ignore_case<T: Keyed>(table: &[T]) -> bool {
    table
        .windows(2)
        .all(|w| cmp_ignore_ascii_case(w[0].key(), w[1].key()) == Ordering::Less)
}
