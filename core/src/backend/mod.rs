//! File-backed model implementations and artifact loading.

pub mod centroid;
pub mod lexicon;

pub use centroid::{CentroidTopicModel, HashingEmbedder, TopicArtifact, TopicKeywords};
pub use lexicon::{LexiconArtifact, LexiconSentimentModel};

use crate::{AnalysisError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

pub const SENTIMENT_ARTIFACT: &str = "sentiment.json";
pub const POSITIVE_TOPIC_ARTIFACT: &str = "topic_pos.json";
pub const NEGATIVE_TOPIC_ARTIFACT: &str = "topic_neg.json";
pub const COMPILED_TOPICS: &str = "topics.bin";

#[derive(Serialize, Deserialize)]
struct CompiledTopics {
    version: u32,
    positive: CentroidTopicModel,
    negative: CentroidTopicModel,
}

const COMPILED_VERSION: u32 = 1;

pub struct ModelArtifacts {
    pub sentiment: LexiconSentimentModel,
    pub positive: CentroidTopicModel,
    pub negative: CentroidTopicModel,
}

impl ModelArtifacts {
    /// Load from `dir`. Topic centroids come from `topics.bin` when present, otherwise from the JSON artifacts.
    pub fn load(dir: &Path) -> Result<Self> {
        let sentiment = LexiconSentimentModel::from_artifact(read_json(&dir.join(SENTIMENT_ARTIFACT))?);

        let compiled = dir.join(COMPILED_TOPICS);
        let (positive, negative) = if compiled.is_file() {
            let topics = load_compiled(&compiled)?;
            tracing::debug!(path = %compiled.display(), "using compiled topic models");
            (topics.positive, topics.negative)
        } else {
            (
                CentroidTopicModel::from_artifact(read_json(&dir.join(POSITIVE_TOPIC_ARTIFACT))?),
                CentroidTopicModel::from_artifact(read_json(&dir.join(NEGATIVE_TOPIC_ARTIFACT))?),
            )
        };

        tracing::info!(
            dir = %dir.display(),
            positive_topics = positive.num_topics(),
            negative_topics = negative.num_topics(),
            "loaded models"
        );
        Ok(Self { sentiment, positive, negative })
    }

    pub fn compile(dir: &Path) -> Result<PathBuf> {
        let positive = CentroidTopicModel::from_artifact(read_json(&dir.join(POSITIVE_TOPIC_ARTIFACT))?);
        let negative = CentroidTopicModel::from_artifact(read_json(&dir.join(NEGATIVE_TOPIC_ARTIFACT))?);
        let path = dir.join(COMPILED_TOPICS);
        let mut f = File::create(&path)?;
        let bytes = bincode::serialize(&CompiledTopics { version: COMPILED_VERSION, positive, negative })?;
        f.write_all(&bytes)?;
        Ok(path)
    }
}

fn load_compiled(path: &Path) -> Result<CompiledTopics> {
    let mut f = File::open(path).map_err(|e| unavailable(path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let topics: CompiledTopics = bincode::deserialize(&buf).map_err(|e| unavailable(path, e))?;
    if topics.version != COMPILED_VERSION {
        return Err(unavailable(path, format!("unsupported version {}", topics.version)));
    }
    Ok(topics)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).map_err(|e| unavailable(path, e))?;
    serde_json::from_reader(BufReader::new(f)).map_err(|e| unavailable(path, e))
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::model(format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_artifacts(dir: &Path) {
        fs::write(
            dir.join(SENTIMENT_ARTIFACT),
            r#"{"positive": ["bagus"], "negative": ["jelek"], "negations": ["tidak"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join(POSITIVE_TOPIC_ARTIFACT),
            r#"{"name": "pos", "topics": [{"id": 0, "keywords": ["tiket", "mudah"]}]}"#,
        )
        .unwrap();
        fs::write(
            dir.join(NEGATIVE_TOPIC_ARTIFACT),
            r#"{"name": "neg", "topics": [{"id": 0, "keywords": ["server", "error"]}]}"#,
        )
        .unwrap();
    }

    #[test]
    fn missing_artifact_is_model_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelArtifacts::load(dir.path()).err().unwrap();
        assert!(matches!(err, AnalysisError::ModelUnavailable(_)));
    }

    #[test]
    fn compiled_topics_match_json() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let from_json = ModelArtifacts::load(dir.path()).unwrap();
        ModelArtifacts::compile(dir.path()).unwrap();
        let from_bin = ModelArtifacts::load(dir.path()).unwrap();
        assert_eq!(from_json.positive, from_bin.positive);
        assert_eq!(from_json.negative, from_bin.negative);
    }
}
