//! String similarity for fuzzy name matching
//!
//! The matcher is a seam: the reconciliation policy (exact match, alias
//! table, threshold) only ever calls [`SimilarityMatcher::best_match`].

/// Picks the registry candidate most similar to a label.
pub trait SimilarityMatcher: Send + Sync {
    /// Best candidate and its score (0-100), or `None` when there are no
    /// candidates. Ties must be broken deterministically.
    fn best_match<'a>(&self, label: &str, candidates: &[&'a str]) -> Option<(&'a str, u8)>;
}

/// Normalized indel similarity: `round(100 * 2 * LCS / (|a| + |b|))`
/// over Unicode scalar values, case-sensitive.
///
/// Ties on the best score go to the lexicographically smallest candidate,
/// independent of the order candidates are supplied in.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelRatio;

impl IndelRatio {
    /// Similarity of two strings in 0..=100. Either side empty scores 0.
    pub fn ratio(a: &str, b: &str) -> u8 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let lcs = lcs_len(&a, &b);
        let total = (a.len() + b.len()) as f64;
        let score = (200.0 * lcs as f64 / total).round();
        score.clamp(0.0, 100.0) as u8
    }
}

impl SimilarityMatcher for IndelRatio {
    fn best_match<'a>(&self, label: &str, candidates: &[&'a str]) -> Option<(&'a str, u8)> {
        let mut best: Option<(&'a str, u8)> = None;
        for &candidate in candidates {
            let score = Self::ratio(label, candidate);
            best = match best {
                None => Some((candidate, score)),
                Some((cur, cur_score)) => {
                    if score > cur_score || (score == cur_score && candidate < cur) {
                        Some((candidate, score))
                    } else {
                        Some((cur, cur_score))
                    }
                }
            };
        }
        best
    }
}

/// Longest common subsequence length, two-row DP.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
