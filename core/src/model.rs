//! Model capabilities consumed by the pipeline.
//!
//! The pipeline never loads weights itself; it is handed trait objects.
//! `backend` provides file-backed implementations, tests use stubs.

use crate::{Result, TopicId};

pub trait SentimentModel: Send + Sync {
    /// Class probabilities per text, in input order; index 0 is negative, index 1 is positive.
    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    fn name(&self) -> &str;
}

pub trait TopicModel: Send + Sync {
    /// Assign a topic id to one text, `-1` when the text fits no topic.
    fn transform(&self, text: &str) -> Result<TopicId>;

    /// Embedding of `text` in the same space as the topic centroids.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Stored centroid for `topic_id`, `None` if the model has no such topic.
    fn topic_embedding(&self, topic_id: TopicId) -> Option<&[f32]>;

    fn name(&self) -> &str;
}

/// Cosine similarity of two vectors; 0.0 when either has zero length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_parallel_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
