//! String normalization and similarity scoring for owner-name matching.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a raw owner name: NFD-decompose, strip combining marks
/// (diacritics), trim, and collapse internal whitespace runs.
///
/// Empty in, empty out; idempotent.
pub fn normalize_owner(raw: &str) -> String {
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity between two strings as a percentage in [0, 100], derived from
/// Levenshtein distance: `(1 - distance / max_len) * 100`.
///
/// Two empty strings are identical, so the degenerate division is guarded
/// and reported as 100.
pub fn similarity(s1: &str, s2: &str) -> f64 {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();
    let max_len = len1.max(len2);
    if max_len == 0 {
        return 100.0;
    }

    let distance = levenshtein_distance(s1, s2);
    (1.0 - distance as f64 / max_len as f64) * 100.0
}

/// Levenshtein distance over chars: insert/delete/substitute at unit cost,
/// full (len1+1) x (len2+1) DP table.
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let chars1: Vec<char> = s1.chars().collect();
    let chars2: Vec<char> = s2.chars().collect();
    let len1 = chars1.len();
    let len2 = chars2.len();

    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=len2 {
        matrix[0][j] = j;
    }

    for i in 1..=len1 {
        for j in 1..=len2 {
            let cost = if chars1[i - 1] == chars2[j - 1] { 0 } else { 1 };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[len1][len2]
}
