use crate::model::{cosine_similarity, TopicModel};
use crate::router::TopicModelSelector;
use crate::{AnalysisError, Result, TopicId, OUTLIER_TOPIC};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Marker the E5 embedding family expects in front of every document.
pub const PASSAGE_PREFIX: &str = "passage: ";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicAssignment {
    pub topic_id: TopicId,
    /// Raw cosine similarity to the topic centroid. Not a calibrated probability.
    pub confidence: f32,
}

impl TopicAssignment {
    pub fn outlier() -> Self {
        Self { topic_id: OUTLIER_TOPIC, confidence: 0.0 }
    }

    /// Similarity fell outside [0, 1]; kept as-is but should not be trusted.
    pub fn is_anomalous(&self) -> bool {
        !(0.0..=1.0).contains(&self.confidence)
    }
}

#[derive(Clone, Default)]
pub struct TopicModels {
    positive: Option<Arc<dyn TopicModel>>,
    negative: Option<Arc<dyn TopicModel>>,
}

impl TopicModels {
    pub fn new(positive: Arc<dyn TopicModel>, negative: Arc<dyn TopicModel>) -> Self {
        Self { positive: Some(positive), negative: Some(negative) }
    }

    pub fn with_model(mut self, selector: TopicModelSelector, model: Arc<dyn TopicModel>) -> Self {
        match selector {
            TopicModelSelector::Positive => self.positive = Some(model),
            TopicModelSelector::Negative => self.negative = Some(model),
        }
        self
    }

    pub fn get(&self, selector: TopicModelSelector) -> Result<&dyn TopicModel> {
        let slot = match selector {
            TopicModelSelector::Positive => &self.positive,
            TopicModelSelector::Negative => &self.negative,
        };
        slot.as_deref()
            .ok_or_else(|| AnalysisError::model(format!("no {selector:?} topic model registered")))
    }
}

pub fn classify_topic(models: &TopicModels, selector: TopicModelSelector, text: &str) -> Result<TopicAssignment> {
    let model = models.get(selector)?;
    let prefixed = format!("{PASSAGE_PREFIX}{text}");

    let topic_id = model.transform(&prefixed)?;
    if topic_id == OUTLIER_TOPIC {
        return Ok(TopicAssignment::outlier());
    }

    let embedding = model.embed(&prefixed)?;
    let centroid = model.topic_embedding(topic_id).ok_or_else(|| {
        AnalysisError::model(format!("{} assigned topic {topic_id} but has no centroid for it", model.name()))
    })?;
    if embedding.len() != centroid.len() {
        return Err(AnalysisError::model(format!(
            "{} embedding has {} dims, centroid for topic {topic_id} has {}",
            model.name(),
            embedding.len(),
            centroid.len()
        )));
    }

    let assignment = TopicAssignment { topic_id, confidence: cosine_similarity(&embedding, centroid) };
    if assignment.is_anomalous() {
        tracing::warn!(model = model.name(), topic_id, similarity = assignment.confidence, "topic similarity outside [0, 1]");
    }
    Ok(assignment)
}

/// Per-text topic assignment over a batch, in input order. The first failure aborts the batch.
pub fn classify_topics<S: AsRef<str>>(
    models: &TopicModels,
    items: &[(TopicModelSelector, S)],
) -> Result<Vec<TopicAssignment>> {
    items
        .iter()
        .map(|(selector, text)| classify_topic(models, *selector, text.as_ref()))
        .collect()
}
