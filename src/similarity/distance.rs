/*!
 * Case-insensitive Levenshtein distance.
 *
 * Texts are compared as raw bytes in any encoding, each byte upper-cased
 * with ASCII rules. Multi-byte UTF-8 characters therefore count one edit per
 * differing byte and non-ASCII letters are compared case-sensitively.
 */

/// Levenshtein distance between two text blocks, ignoring ASCII case.
///
/// Substitution, insertion and deletion each cost 1. Uses a single rolling
/// row sized to the shorter input.
pub fn edit_distance(a: impl AsRef<[u8]>, b: impl AsRef<[u8]>) -> usize {
    let (a, b): (&[u8], &[u8]) = (a.as_ref(), b.as_ref());
    // Distance is symmetric, so keep the row on the shorter side
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<usize> = (0..=short.len()).collect();

    for (i, &lc) in long.iter().enumerate() {
        let lc = lc.to_ascii_uppercase();
        // row[j] of the previous iteration, one column to the left
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, &sc) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if lc == sc.to_ascii_uppercase() {
                diagonal
            } else {
                above.min(diagonal).min(row[j]) + 1
            };
            diagonal = above;
        }
    }

    row[short.len()]
}
