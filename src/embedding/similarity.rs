use anyhow::Result;

/// Calculate cosine similarity directly between two vectors.
///
/// Errors on mismatched dimensions or a near-zero-magnitude vector; a
/// degenerate embedding must be visible to the caller, not folded into a
/// silent 0.0.
pub fn cosine_similarity(vec1: &[f32], vec2: &[f32]) -> Result<f32> {
    if vec1.len() != vec2.len() {
        return Err(anyhow::anyhow!(
            "Vector dimensions don't match: {} vs {}",
            vec1.len(),
            vec2.len()
        ));
    }

    let mag1: f32 = vec1.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag2: f32 = vec2.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag1 < 0.001 || mag2 < 0.001 {
        return Err(anyhow::anyhow!("Zero magnitude vector detected"));
    }

    let dot_product: f32 = vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum();
    Ok(dot_product / (mag1 * mag2))
}

/// Maps a cosine similarity to the 0-100 score shown to the user, rounded
/// to two decimals. Natural-language pairs land in [0, 1]; anything outside
/// is clamped rather than reported as a negative percentage.
pub fn score_percentage(similarity: f32) -> f32 {
    ((similarity * 10_000.0).round() / 100.0).clamp(0.0, 100.0)
}
