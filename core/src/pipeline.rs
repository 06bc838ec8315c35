use crate::aggregate::{self, SentimentMetrics};
use crate::backend::ModelArtifacts;
use crate::export::{self, ExportFile, ExportPaths};
use crate::input;
use crate::labels::TopicLabels;
use crate::model::SentimentModel;
use crate::normalizer::normalize_batch;
use crate::router::route;
use crate::sentiment::classify_sentiment;
use crate::topic::{classify_topics, TopicModels};
use crate::{Result, Sentiment, SentimentResult, SentimentRow, TopicId, TopicResult, TopicRow};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub models_dir: PathBuf,
    pub labels_dir: PathBuf,
}

/// Models and label tables, loaded once and shared by every request.
#[derive(Clone)]
pub struct Analyzer {
    sentiment: Arc<dyn SentimentModel>,
    topics: TopicModels,
    labels: Arc<TopicLabels>,
}

impl Analyzer {
    pub fn new(sentiment: Arc<dyn SentimentModel>, topics: TopicModels, labels: TopicLabels) -> Self {
        Self { sentiment, topics, labels: Arc::new(labels) }
    }

    pub fn load(config: &AnalyzerConfig) -> Result<Self> {
        let artifacts = ModelArtifacts::load(&config.models_dir)?;
        let topics = TopicModels::new(Arc::new(artifacts.positive), Arc::new(artifacts.negative));
        let labels = TopicLabels::load_dir(&config.labels_dir);
        Ok(Self::new(Arc::new(artifacts.sentiment), topics, labels))
    }

    pub fn labels(&self) -> &TopicLabels {
        &self.labels
    }

    /// Run the full pipeline over one batch. Any failure aborts the whole batch.
    pub fn analyze(&self, texts: Vec<String>) -> Result<AnalysisReport> {
        let texts = input::ensure_non_empty(texts)?;
        let cleaned = normalize_batch(&texts);

        let prediction = classify_sentiment(self.sentiment.as_ref(), &cleaned)?;
        let sentiments = prediction.results();

        let routed: Vec<_> = sentiments.iter().map(|s| (route(s.label), cleaned[s.index].as_str())).collect();
        let topics: Vec<TopicResult> = classify_topics(&self.topics, &routed)?
            .into_iter()
            .zip(&sentiments)
            .map(|(a, s)| TopicResult { index: s.index, topic_id: a.topic_id, confidence: a.confidence })
            .collect();

        let report = AnalysisReport { texts, cleaned, sentiments, topics };
        let metrics = report.metrics();
        tracing::info!(
            total = metrics.total,
            positive = metrics.positive_count,
            negative = metrics.negative_count,
            "analysis complete"
        );
        Ok(report)
    }
}

/// Stored output of one run. Metrics and sentences are derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub texts: Vec<String>,
    pub cleaned: Vec<String>,
    pub sentiments: Vec<SentimentResult>,
    pub topics: Vec<TopicResult>,
}

impl AnalysisReport {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn sentiment_rows(&self) -> Vec<SentimentRow> {
        self.sentiments
            .iter()
            .map(|s| SentimentRow { text: self.texts[s.index].clone(), sentiment: s.label, confidence: s.confidence })
            .collect()
    }

    pub fn topic_rows(&self, polarity: Sentiment) -> Vec<TopicRow> {
        self.sentiments
            .iter()
            .zip(self.topics.iter())
            .filter(|(s, _)| s.label == polarity)
            .map(|(s, t)| TopicRow { text: self.texts[s.index].clone(), topic: t.topic_id, confidence: t.confidence })
            .collect()
    }

    pub fn metrics(&self) -> SentimentMetrics {
        aggregate::aggregate(&self.sentiments)
    }

    pub fn summary(&self, labels: &TopicLabels) -> AnalysisSummary {
        AnalysisSummary::from_rows(
            &self.sentiment_rows(),
            &self.topic_rows(Sentiment::Positive),
            &self.topic_rows(Sentiment::Negative),
            labels,
        )
    }

    pub fn export_rows(&self, which: ExportFile) -> Result<Vec<u8>> {
        match which {
            ExportFile::Sentiment => export::to_csv_bytes(&self.sentiment_rows()),
            ExportFile::PositiveTopics => export::to_csv_bytes(&self.topic_rows(Sentiment::Positive)),
            ExportFile::NegativeTopics => export::to_csv_bytes(&self.topic_rows(Sentiment::Negative)),
        }
    }

    pub fn save(&self, paths: &ExportPaths) -> Result<Vec<PathBuf>> {
        let mut written = vec![export::save_sentiment(paths, &self.sentiment_rows())?];
        for (which, polarity) in [(ExportFile::PositiveTopics, Sentiment::Positive), (ExportFile::NegativeTopics, Sentiment::Negative)] {
            if let Some(path) = export::save_topics(paths, which, &self.topic_rows(polarity))? {
                written.push(path);
            }
        }
        Ok(written)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: TopicId,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub counts: Vec<TopicCount>,
    pub dominant: TopicCount,
    pub interpretation: String,
}

/// Everything a dashboard needs to draw, computed from result rows alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub metrics: SentimentMetrics,
    pub positive_share: f32,
    pub negative_share: f32,
    pub sentiment_interpretation: String,
    pub positive_topics: Option<TopicSummary>,
    pub negative_topics: Option<TopicSummary>,
}

impl AnalysisSummary {
    pub fn from_rows(sentiment: &[SentimentRow], positive: &[TopicRow], negative: &[TopicRow], labels: &TopicLabels) -> Self {
        let results: Vec<SentimentResult> = sentiment
            .iter()
            .enumerate()
            .map(|(index, r)| SentimentResult { index, label: r.sentiment, confidence: r.confidence })
            .collect();
        let metrics = aggregate::aggregate(&results);
        Self {
            positive_share: metrics.positive_share(),
            negative_share: metrics.negative_share(),
            sentiment_interpretation: aggregate::interpret_sentiment(&metrics),
            positive_topics: topic_summary(positive, labels, Sentiment::Positive),
            negative_topics: topic_summary(negative, labels, Sentiment::Negative),
            metrics,
        }
    }
}

fn topic_summary(rows: &[TopicRow], labels: &TopicLabels, polarity: Sentiment) -> Option<TopicSummary> {
    let map = labels.for_polarity(polarity);
    let counts = aggregate::topic_counts(rows);
    let (dominant, dominant_count) = aggregate::dominant_topic(&counts)?;
    let interpretation = aggregate::interpret_topic(&counts, map, polarity)?;
    let entry = |topic: TopicId, count: usize| TopicCount { topic, label: aggregate::format_topic_label(topic, map), count };
    Some(TopicSummary {
        counts: counts.iter().map(|(&t, &c)| entry(t, c)).collect(),
        dominant: entry(dominant, dominant_count),
        interpretation,
    })
}
