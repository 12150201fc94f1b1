//! Levenshtein edit distance.
//!
//! The metric is case-sensitive and locale-free. Callers that want
//! case-insensitive comparison lowercase both sides first (see
//! [`resolve`](super::resolver::resolve)).

/// Minimum number of single-character insertions, deletions, or substitutions
/// needed to turn `a` into `b`.
///
/// Operates on Unicode scalar values, so `"café"` vs `"cafe"` is one edit.
/// Uses a two-row buffer sized to the shorter string.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Keep the row over the shorter string.
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let cost = usize::from(lc != sc);
            curr[j + 1] = (prev[j] + cost) // substitution
                .min(prev[j + 1] + 1) // deletion
                .min(curr[j] + 1); // insertion
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
