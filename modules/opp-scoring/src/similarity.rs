/// Cosine similarity of two equal-length embedding vectors, rescaled from
/// `[-1, 1]` to `[0, 1]`. A missing or zero-norm vector yields the neutral
/// 0.5 rather than penalizing the pair for lacking an embedding.
pub fn semantic_fit(a: Option<&[f32]>, b: Option<&[f32]>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.len() == b.len() && !a.is_empty() => {
            let sim = cosine_similarity(a, b);
            (sim + 1.0) / 2.0
        }
        _ => 0.5,
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_rescale_to_one() {
        let a = vec![1.0_f32, 0.0, 0.0];
        assert!((semantic_fit(Some(&a), Some(&a)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_rescale_to_half() {
        let a = vec![1.0_f32, 0.0];
        let b = vec![0.0_f32, 1.0];
        assert!((semantic_fit(Some(&a), Some(&b)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn missing_embedding_is_neutral() {
        let a = vec![1.0_f32, 0.0];
        assert_eq!(semantic_fit(Some(&a), None), 0.5);
        assert_eq!(semantic_fit(None, None), 0.5);
    }

    #[test]
    fn zero_norm_vector_does_not_divide_by_zero() {
        let a = vec![0.0_f32, 0.0];
        let b = vec![1.0_f32, 0.0];
        assert_eq!(semantic_fit(Some(&a), Some(&b)), 0.5);
    }
}
