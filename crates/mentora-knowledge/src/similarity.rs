// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cosine similarity and candidate ranking over embedding vectors.

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero norm or the dimensions differ,
/// so degenerate inputs rank below every real candidate instead of
/// producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Ranks candidates by cosine similarity to `query`, descending.
///
/// The sort is stable, so equal-scoring candidates keep their input order.
pub fn rank_by_similarity<'a, T>(
    query: &[f32],
    candidates: impl IntoIterator<Item = (&'a T, &'a [f32])>,
) -> Vec<(&'a T, f32)>
where
    T: ?Sized,
{
    let mut scored: Vec<(&T, f32)> = candidates
        .into_iter()
        .map(|(item, vector)| (item, cosine_similarity(query, vector)))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.3, 0.5, 0.2];
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn zero_norm_vector_scores_zero_not_nan() {
        let score = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn mismatched_dimensions_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn exact_fraction_is_preserved() {
        // 3-4-5 style integer vectors keep the quotient exact in f32.
        let score = cosine_similarity(&[4.0, 0.0, 0.0, 0.0, 0.0], &[3.0, 2.0, 1.0, 1.0, 1.0]);
        assert_eq!(score, 0.75);
    }

    #[test]
    fn rank_orders_descending() {
        let query = [1.0, 0.0];
        let a = [1.0, 0.0];
        let b = [0.5, 0.5];
        let c = [0.0, 1.0];
        let ranked = rank_by_similarity(
            &query,
            [
                ("c", c.as_slice()),
                ("a", a.as_slice()),
                ("b", b.as_slice()),
            ],
        );
        let names: Vec<&&str> = ranked.iter().map(|(n, _)| n).collect();
        assert_eq!(names, [&"a", &"b", &"c"]);
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let query = [1.0, 0.0];
        let same = [1.0, 0.0];
        let ranked = rank_by_similarity(
            &query,
            [("first", same.as_slice()), ("second", same.as_slice())],
        );
        assert_eq!(ranked[0].0, "first");
        assert_eq!(ranked[1].0, "second");
    }
}
