//! Cosine similarity scoring
//!
//! Brute-force ranking of candidate papers against a query vector. Every
//! stored vector is visited once per query; there is no index.

use crate::models::{PaperRecord, ScoredCandidate};

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector has zero norm or the lengths differ, so a
/// fallback zero embedding ranks below every real match instead of failing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let xd = f64::from(*x);
        let yd = f64::from(*y);
        dot += xd * yd;
        norm_a += xd * xd;
        norm_b += yd * yd;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Score every candidate that has an embedding and keep the best `top_k`.
///
/// Papers without an embedding are skipped, not scored as zero. The sort is
/// stable, so equal scores keep their input order.
pub fn score_and_rank<I>(query: &[f32], candidates: I, top_k: usize) -> Vec<ScoredCandidate>
where
    I: IntoIterator<Item = PaperRecord>,
{
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter_map(|paper| {
            let score = cosine_similarity(query, paper.embedding.as_deref()?);
            Some(ScoredCandidate { paper, score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str, embedding: Option<Vec<f32>>) -> PaperRecord {
        let paper = PaperRecord::new(id, format!("Paper {}", id));
        match embedding {
            Some(e) => paper.with_embedding(e),
            None => paper,
        }
    }

    #[test]
    fn test_identical_vectors() {
        let v = vec![0.3, 0.1, 0.7, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_zero_vector() {
        let a = vec![0.5, 0.5, 0.5];
        let zero = vec![0.0; 3];
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &a), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_opposite_vectors() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_orders_descending_and_truncates() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            paper("low", Some(vec![0.1, 1.0])),
            paper("exact", Some(vec![2.0, 0.0])),
            paper("mid", Some(vec![1.0, 1.0])),
        ];

        let ranked = score_and_rank(&query, candidates, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].paper.paper_id, "exact");
        assert_eq!(ranked[1].paper.paper_id, "mid");
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_rank_excludes_missing_embeddings() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            paper("none", None),
            paper("orthogonal", Some(vec![0.0, 1.0])),
        ];

        let ranked = score_and_rank(&query, candidates, 10);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].paper.paper_id, "orthogonal");
    }

    #[test]
    fn test_rank_keeps_zero_norm_candidates_last() {
        let query = vec![1.0, 1.0];
        let candidates = vec![
            paper("zero", Some(vec![0.0, 0.0])),
            paper("match", Some(vec![1.0, 1.0])),
        ];

        let ranked = score_and_rank(&query, candidates, 10);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].paper.paper_id, "match");
        assert_eq!(ranked[1].paper.paper_id, "zero");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            paper("first", Some(vec![1.0, 1.0])),
            paper("second", Some(vec![1.0, 1.0])),
            paper("third", Some(vec![1.0, 1.0])),
        ];

        let ranked = score_and_rank(&query, candidates, 10);
        let ids: Vec<_> = ranked.iter().map(|c| c.paper.paper_id.as_str()).collect();

        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zero_query_scores_everything_zero() {
        let query = vec![0.0; 4];
        let candidates = (0..5).map(|i| paper(&i.to_string(), Some(vec![1.0, 0.5, 0.2, i as f32])));

        let ranked = score_and_rank(&query, candidates, 3);

        assert_eq!(ranked.len(), 3);
        assert!(ranked.iter().all(|c| c.score == 0.0));
        assert_eq!(ranked[0].paper.paper_id, "0");
    }
}
