//! Edit-distance similarity between two tokens.

/// Levenshtein distance over characters, unit cost for insertion, deletion
/// and substitution.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // (|a|+1) x (|b|+1) grid; grid[i][j] is the distance between a[..i] and b[..j].
    let mut grid = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in grid.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in grid[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = usize::from(a[i - 1] != b[j - 1]);
            grid[i][j] = (grid[i - 1][j] + 1)
                .min(grid[i][j - 1] + 1)
                .min(grid[i - 1][j - 1] + substitution);
        }
    }

    grid[a.len()][b.len()]
}

/// Normalized similarity in [0, 1]: `(maxLen - distance) / maxLen`.
///
/// Two empty strings are identical (1.0); an empty string against a
/// non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("كتاب", "كتب"), 1);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn test_similarity_edges() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
        assert_eq!(similarity("الله", "الله"), 1.0);
    }

    #[test]
    fn test_similarity_one_edit() {
        let score = similarity("كتاب", "كتب");
        assert!((score - 0.75).abs() < 1e-9);
        assert!(score > 0.7);
    }

    #[test]
    fn test_similarity_bounds() {
        let pairs = [("abc", "xyz"), ("a", "abcdef"), ("رحمن", "الرحمن"), ("ciel", "cieux")];
        for (a, b) in pairs {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a}/{b} -> {score}");
            assert_eq!(score, similarity(b, a));
        }
    }
}
