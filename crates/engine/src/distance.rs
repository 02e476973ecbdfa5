//! Cosine similarity for brute-force ranking.
//!
//! Scores are "higher = more similar", range [-1, 1].
//! Accumulation is done in `f64` so long embeddings do not lose precision.

/// Cosine similarity: dot(a,b) / (||a|| * ||b||)
///
/// Returns 0.0 when either vector has zero norm, when the vectors have
/// different lengths, and when the result is not finite (an embedding
/// holding infinities or NaN). Such pairs are non-comparable rather than
/// an error.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}
