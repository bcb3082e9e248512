//! Candidate ranking by similarity score.

/// Candidate indices ordered by descending score.
///
/// The sort is stable: candidates with equal scores keep their original
/// relative order. Scores are compared with `f64::total_cmp`, so NaN ranks
/// above every finite score.
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut rank: Vec<usize> = (0..scores.len()).collect();
    rank.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    rank
}
