use crate::model::{cosine_similarity, TopicModel};
use crate::{Result, TopicId, OUTLIER_TOPIC};
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hasher;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    /// Function words that carry no topic signal, plus the passage marker.
    static ref IGNORED: HashSet<&'static str> = {
        let words: &[&str] = &[
            "passage", "ada", "agar", "akan", "atau", "bahkan", "banget", "bisa", "dalam", "dan", "dari",
            "dengan", "di", "harus", "ini", "itu", "jadi", "juga", "ke", "karena", "lagi", "lebih",
            "nya", "pada", "saat", "saja", "sangat", "saya", "sekali", "serta", "sudah", "tapi",
            "tidak", "untuk", "yang",
        ];
        words.iter().copied().collect()
    };
}

/// Bag-of-words embedding with feature hashing, L2 normalized.
///
/// Weights are non-negative, so cosine similarity between two embeddings stays in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingEmbedder {
    pub dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dimensions];
        let lowered = text.to_lowercase();
        for m in WORD_RE.find_iter(&lowered) {
            let word = m.as_str();
            if IGNORED.contains(word) {
                continue;
            }
            let mut h = FxHasher::default();
            h.write(word.as_bytes());
            let slot = (h.finish() % self.dimensions as u64) as usize;
            v[slot] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in v.iter_mut() { *x /= norm; }
        }
        v
    }
}

fn default_dimensions() -> usize { 512 }
fn default_threshold() -> f32 { 0.1 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicKeywords {
    pub id: TopicId,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicArtifact {
    pub name: String,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Best similarity below this makes the text an outlier (-1).
    #[serde(default = "default_threshold")]
    pub outlier_threshold: f32,
    pub topics: Vec<TopicKeywords>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentroidTopicModel {
    name: String,
    embedder: HashingEmbedder,
    outlier_threshold: f32,
    centroids: Vec<(TopicId, Vec<f32>)>, // artifact order
}

impl CentroidTopicModel {
    pub fn from_artifact(artifact: TopicArtifact) -> Self {
        let embedder = HashingEmbedder::new(artifact.dimensions);
        let centroids = artifact
            .topics
            .into_iter()
            .filter(|t| t.id != OUTLIER_TOPIC)
            .map(|t| (t.id, embedder.embed(&t.keywords.join(" "))))
            .collect();
        Self { name: artifact.name, embedder, outlier_threshold: artifact.outlier_threshold, centroids }
    }

    pub fn num_topics(&self) -> usize {
        self.centroids.len()
    }

    /// Best matching topic and its similarity; first topic wins ties.
    fn best_topic(&self, embedding: &[f32]) -> Option<(TopicId, f32)> {
        let mut best: Option<(TopicId, f32)> = None;
        for (id, centroid) in &self.centroids {
            let sim = cosine_similarity(embedding, centroid);
            if best.map_or(true, |(_, s)| sim > s) {
                best = Some((*id, sim));
            }
        }
        best
    }
}

impl TopicModel for CentroidTopicModel {
    fn transform(&self, text: &str) -> Result<TopicId> {
        let embedding = self.embedder.embed(text);
        Ok(match self.best_topic(&embedding) {
            Some((id, sim)) if sim >= self.outlier_threshold => id,
            _ => OUTLIER_TOPIC,
        })
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embedder.embed(text))
    }

    fn topic_embedding(&self, topic_id: TopicId) -> Option<&[f32]> {
        self.centroids.iter().find(|(id, _)| *id == topic_id).map(|(_, c)| c.as_slice())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
