//! Ordering policy for every public name enumeration.

use std::cmp::Ordering;

/// Ascending ordinal comparison of two names (byte-wise, case-sensitive).
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Sort names in place with [`compare_names`].
pub fn sort_default(names: &mut [String]) {
    names.sort_unstable_by(|a, b| compare_names(a, b));
}

/// Collect names, drop duplicates and sort them with [`compare_names`].
pub fn sorted_unique<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = names.into_iter().map(Into::into).collect();
    sort_default(&mut out);
    out.dedup();
    out
}
