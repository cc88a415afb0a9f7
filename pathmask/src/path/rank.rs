//! Choosing one winner among several matching patterns.

use super::pattern::{MatchOptions, Pattern, PatternMatch};

/// Returns the entry whose pattern best matches `path`.
///
/// An exact pattern wins outright. Otherwise the highest
/// [`Specificity`](super::Specificity) wins, and among equals the entry
/// registered first.
pub(crate) fn select_best<'a, T>(
    entries: &'a [(Pattern, T)],
    path: &[String],
    options: MatchOptions,
) -> Option<(&'a T, PatternMatch)> {
    let mut best: Option<(&'a T, PatternMatch)> = None;
    for (pattern, value) in entries {
        let Some(found) = pattern.match_path(path, options) else {
            continue;
        };
        if found.exact {
            return Some((value, found));
        }
        let better = best
            .as_ref()
            .map_or(true, |(_, current)| found.specificity > current.specificity);
        if better {
            best = Some((value, found));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::select_best;
    use crate::path::{MatchOptions, Pattern};

    fn entries(patterns: &[(&str, u8)]) -> Vec<(Pattern, u8)> {
        patterns
            .iter()
            .map(|(pattern, id)| (Pattern::parse(*pattern), *id))
            .collect()
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn exact_beats_any_wildcard() {
        let rules = entries(&[("a.*", 1), ("**.b", 2), ("a.b", 3)]);
        let (id, found) = select_best(&rules, &path(&["a", "b"]), MatchOptions::default()).unwrap();
        assert_eq!(*id, 3);
        assert!(found.exact);
    }

    #[test]
    fn most_specific_wildcard_wins() {
        let rules = entries(&[("**", 1), ("a.**", 2), ("a.*.c", 3), ("c", 4)]);
        let (id, _) = select_best(&rules, &path(&["a", "b", "c"]), MatchOptions::default()).unwrap();
        assert_eq!(*id, 3);
    }

    #[test]
    fn ties_go_to_first_registered() {
        let rules = entries(&[("**.b", 1), ("a.**", 2)]);
        let (id, _) = select_best(&rules, &path(&["a", "b"]), MatchOptions::default()).unwrap();
        assert_eq!(*id, 1);

        let rules = entries(&[("a.**", 2), ("**.b", 1)]);
        let (id, _) = select_best(&rules, &path(&["a", "b"]), MatchOptions::default()).unwrap();
        assert_eq!(*id, 2);
    }

    #[test]
    fn bare_key_is_least_specific() {
        let rules = entries(&[("name", 1), ("**", 2)]);
        let (id, _) = select_best(&rules, &path(&["user", "name"]), MatchOptions::default()).unwrap();
        assert_eq!(*id, 2);
    }

    #[test]
    fn nothing_matches() {
        let rules = entries(&[("a.b", 1)]);
        assert!(select_best(&rules, &path(&["a", "c"]), MatchOptions::default()).is_none());
    }
}
