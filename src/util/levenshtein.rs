//! Edit-distance computation for fuzzy term expansion.

use std::cmp::min;

/// Compute the Levenshtein distance between two strings, counted in
/// characters, not bytes.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row dynamic program.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = min(min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Compute the Levenshtein distance if it does not exceed `max`, `None`
/// otherwise. Bails out as soon as a whole row exceeds the bound, which
/// makes filtering a large term dictionary cheap.
pub fn levenshtein_distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() {
        return Some(b.len());
    }
    if b.is_empty() {
        return Some(a.len());
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = min(min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
            row_min = min(row_min, curr[j + 1]);
        }
        if row_min > max {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= max).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_basic() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        assert_eq!(
            levenshtein_distance("flaw", "lawn"),
            levenshtein_distance("lawn", "flaw")
        );
    }

    #[test]
    fn test_distance_counts_chars_not_bytes() {
        assert_eq!(levenshtein_distance("caf\u{e9}", "cafe"), 1);
    }

    #[test]
    fn test_within_respects_bound() {
        assert_eq!(levenshtein_distance_within("kitten", "sitting", 3), Some(3));
        assert_eq!(levenshtein_distance_within("kitten", "sitting", 2), None);
        assert_eq!(levenshtein_distance_within("abcdefgh", "a", 2), None);
        assert_eq!(levenshtein_distance_within("tree", "tree", 0), Some(0));
    }
}
