//! Subsequence matching with edit-distance ranking.
//!
//! A candidate matches when the folded query's characters appear, in order, somewhere in the
//! folded candidate. Matches are ranked by Levenshtein distance between the raw strings.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank<'a> {
    pub target: &'a str,
    pub distance: usize,
}

/// Canonical decomposition, combining marks stripped, lowercased: "Café" -> "cafe".
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn matches(term: &str, candidate: &str) -> bool {
    is_subsequence(&fold(term), &fold(candidate))
}

fn is_subsequence(needle: &str, hay: &str) -> bool {
    let mut it = hay.chars();
    for ch in needle.chars() {
        if !it.by_ref().any(|c| c == ch) {
            return false;
        }
    }
    true
}

/// Rank every vocabulary entry `term` matches, best first.
pub fn rank_find<'a, S: AsRef<str>>(term: &str, vocabulary: &'a [S]) -> Vec<Rank<'a>> {
    let folded: Vec<String> = vocabulary.iter().map(|s| fold(s.as_ref())).collect();
    rank_prefolded(term, vocabulary, &folded)
}

/// Like [`rank_find`] with the vocabulary already folded; `folded[i]` must be `fold(vocabulary[i])`.
///
/// The sort is stable, so entries at equal distance keep vocabulary order.
pub fn rank_prefolded<'a, S: AsRef<str>>(term: &str, vocabulary: &'a [S], folded: &[String]) -> Vec<Rank<'a>> {
    debug_assert_eq!(vocabulary.len(), folded.len());
    let needle = fold(term);
    let mut ranks: Vec<Rank<'a>> = vocabulary
        .iter()
        .zip(folded)
        .filter(|(_, f)| is_subsequence(&needle, f))
        .map(|(target, _)| {
            let target = target.as_ref();
            Rank { target, distance: strsim::levenshtein(term, target) }
        })
        .collect();
    ranks.sort_by_key(|r| r.distance);
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_case_and_accents() {
        assert_eq!(fold("Café"), "cafe");
        assert_eq!(fold("GARCÍA MÁRQUEZ"), "garcia marquez");
    }

    #[test]
    fn distance_counts_chars_of_raw_strings() {
        fn dist(term: &str) -> Vec<(&'static str, usize)> {
            static VOCAB: [&str; 3] = ["Dune", "Café", "García Márquez"];
            rank_find(term, &VOCAB).iter().map(|r| (r.target, r.distance)).collect()
        }
        assert_eq!(dist("dune"), vec![("Dune", 1)]);
        // accents fold for matching but still count toward distance
        assert_eq!(dist("cafe"), vec![("Café", 2)]);
        assert_eq!(dist("garcia"), vec![("García Márquez", 10)]);
        assert_eq!(dist(""), vec![("Dune", 4), ("Café", 4), ("García Márquez", 14)]);
    }

    #[test]
    fn ranks_by_distance_then_vocabulary_order() {
        let vocab = ["Dune Messiah", "Dune", "dune", "Foundation", "xdune", "dunex"];
        let targets: Vec<&str> = rank_find("dune", &vocab).iter().map(|r| r.target).collect();
        assert_eq!(targets, vec!["dune", "Dune", "xdune", "dunex", "Dune Messiah"]);
        assert!(rank_find("xyz", &vocab).is_empty());
    }

    #[test]
    fn subsequence_not_substring() {
        assert!(matches("hbrt", "Herbert"));
        assert!(matches("", "anything"));
        assert!(!matches("trebreh", "Herbert"));
    }
}
