pub mod aggregate;
pub mod backend;
pub mod error;
pub mod export;
pub mod input;
pub mod labels;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod router;
pub mod sentiment;
pub mod topic;

pub use error::{AnalysisError, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ReviewIndex = usize;
/// Topic identifier as produced by a topic model; `-1` marks an outlier.
pub type TopicId = i64;

pub const OUTLIER_TOPIC: TopicId = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "Negatif", alias = "Negative")]
    Negative,
    #[serde(rename = "Positif", alias = "Positive")]
    Positive,
}

impl Sentiment {
    /// Classifier class index: 0 is negative, 1 is positive.
    pub fn from_class(class: usize) -> Option<Self> {
        match class {
            0 => Some(Sentiment::Negative),
            1 => Some(Sentiment::Positive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "Negatif",
            Sentiment::Positive => "Positif",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positif" | "positive" => Ok(Sentiment::Positive),
            "negatif" | "negative" => Ok(Sentiment::Negative),
            other => Err(AnalysisError::input(format!("unknown sentiment label: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub index: ReviewIndex,
    pub label: Sentiment,
    pub confidence: f32, // arg-max class probability
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopicResult {
    pub index: ReviewIndex,
    pub topic_id: TopicId,
    /// Cosine similarity to the topic centroid, 0.0 for outliers.
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRow {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: Sentiment,
    #[serde(rename = "Confidence")]
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRow {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Topic")]
    pub topic: TopicId,
    #[serde(rename = "Confidence")]
    pub confidence: f32,
}
