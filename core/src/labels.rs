use crate::{AnalysisError, Result, Sentiment, TopicId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const POSITIVE_LABELS_FILE: &str = "pos_lab.csv";
pub const NEGATIVE_LABELS_FILE: &str = "neg_lab.csv";

#[derive(Debug, Deserialize)]
struct LabelRecord {
    #[serde(rename = "Topic")]
    topic: TopicId,
    #[serde(rename = "Label")]
    label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicLabelMap(BTreeMap<TopicId, String>);

impl TopicLabelMap {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (TopicId, S)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(id, label)| (id, label.into())).collect())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut map = BTreeMap::new();
        for record in rdr.deserialize() {
            let record: LabelRecord = record?;
            map.insert(record.topic, record.label.trim().to_string());
        }
        Ok(Self(map))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| AnalysisError::from_io(e, path))?;
        Self::from_reader(file)
    }

    /// Missing or unreadable tables degrade to an empty map; topics then show as bare ids.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "topic labels unavailable");
                Self::default()
            }
        }
    }

    pub fn get(&self, topic_id: TopicId) -> Option<&str> {
        self.0.get(&topic_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicLabels {
    pub positive: TopicLabelMap,
    pub negative: TopicLabelMap,
}

impl TopicLabels {
    pub fn load_dir(dir: &Path) -> Self {
        let labels = Self {
            positive: TopicLabelMap::load_or_empty(&dir.join(POSITIVE_LABELS_FILE)),
            negative: TopicLabelMap::load_or_empty(&dir.join(NEGATIVE_LABELS_FILE)),
        };
        tracing::info!(positive = labels.positive.len(), negative = labels.negative.len(), "loaded topic labels");
        labels
    }

    pub fn for_polarity(&self, polarity: Sentiment) -> &TopicLabelMap {
        match polarity {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
        }
    }
}
