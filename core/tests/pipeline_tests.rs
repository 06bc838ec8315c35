use review_core::aggregate::{aggregate, interpret_sentiment};
use review_core::export::{load_sentiment, load_topics, ExportFile, ExportPaths};
use review_core::labels::TopicLabels;
use review_core::model::{SentimentModel, TopicModel};
use review_core::pipeline::{AnalysisSummary, Analyzer, AnalyzerConfig};
use review_core::sentiment::classify_sentiment;
use review_core::topic::{TopicModels, PASSAGE_PREFIX};
use review_core::{AnalysisError, Result, Sentiment, SentimentResult, TopicId};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::tempdir;

/// "bagus" anywhere means positive, everything else leans negative.
struct KeywordSentiment;

impl SentimentModel for KeywordSentiment {
    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| if t.contains("bagus") { vec![0.1, 0.9] } else { vec![0.75, 0.25] })
            .collect())
    }
    fn name(&self) -> &str {
        "keyword"
    }
}

struct BrokenSentiment;

impl SentimentModel for BrokenSentiment {
    fn predict_proba(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(AnalysisError::model("weights not loaded"))
    }
    fn name(&self) -> &str {
        "broken"
    }
}

/// Always assigns `topic` with a centroid along the first axis.
struct FixedTopic {
    topic: TopicId,
    centroid: Vec<f32>,
}

impl TopicModel for FixedTopic {
    fn transform(&self, text: &str) -> Result<TopicId> {
        assert!(text.starts_with(PASSAGE_PREFIX));
        Ok(self.topic)
    }
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.6, 0.8])
    }
    fn topic_embedding(&self, topic_id: TopicId) -> Option<&[f32]> {
        (topic_id == self.topic).then_some(self.centroid.as_slice())
    }
    fn name(&self) -> &str {
        "fixed"
    }
}

fn stub_analyzer() -> Analyzer {
    let topics = TopicModels::new(
        Arc::new(FixedTopic { topic: 3, centroid: vec![1.0, 0.0] }),
        Arc::new(FixedTopic { topic: -1, centroid: vec![] }),
    );
    Analyzer::new(Arc::new(KeywordSentiment), topics, TopicLabels::default())
}

fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../assets")
}

#[test]
fn sentiment_batch_has_one_label_per_text() {
    let texts = ["bagus sekali", "jelek banget"];
    let pred = classify_sentiment(&KeywordSentiment, &texts).unwrap();
    assert_eq!(pred.len(), texts.len());
    assert_eq!(pred.labels, vec![Sentiment::Positive, Sentiment::Negative]);
    assert!(pred.confidences.iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
fn six_positive_four_negative() {
    let confidences = [0.9, 0.8, 0.7, 0.95, 0.85, 0.6, 0.55, 0.65, 0.75, 0.5];
    let results: Vec<SentimentResult> = confidences
        .iter()
        .enumerate()
        .map(|(index, &confidence)| SentimentResult {
            index,
            label: if index < 6 { Sentiment::Positive } else { Sentiment::Negative },
            confidence,
        })
        .collect();
    let metrics = aggregate(&results);
    assert_eq!(metrics.total, 10);
    assert_eq!((metrics.positive_count, metrics.negative_count), (6, 4));
    let expected = confidences.iter().sum::<f32>() / 10.0;
    assert!((metrics.mean_confidence - expected).abs() < 1e-6);
    assert!(interpret_sentiment(&metrics).contains("didominasi oleh sentimen positif"));
}

#[test]
fn routes_each_review_to_its_polarity_model() {
    let report = stub_analyzer()
        .analyze(vec!["Aplikasinya bagus".into(), "Servernya down terus".into()])
        .unwrap();
    assert_eq!(report.cleaned[0], "aplikasi nya bagus");

    let pos = report.topic_rows(Sentiment::Positive);
    assert_eq!(pos.len(), 1);
    assert_eq!(pos[0].topic, 3);
    assert!((pos[0].confidence - 0.6).abs() < 1e-6);

    let neg = report.topic_rows(Sentiment::Negative);
    assert_eq!(neg.len(), 1);
    assert_eq!((neg[0].topic, neg[0].confidence), (-1, 0.0));
}

#[test]
fn model_failure_yields_no_report() {
    let analyzer = Analyzer::new(Arc::new(BrokenSentiment), TopicModels::default(), TopicLabels::default());
    let err = analyzer.analyze(vec!["bagus".into()]).unwrap_err();
    assert!(matches!(err, AnalysisError::ModelUnavailable(_)));
}

#[test]
fn missing_topic_model_aborts_batch() {
    let topics = TopicModels::default()
        .with_model(review_core::router::TopicModelSelector::Positive, Arc::new(FixedTopic { topic: 0, centroid: vec![1.0, 0.0] }));
    let analyzer = Analyzer::new(Arc::new(KeywordSentiment), topics, TopicLabels::default());
    let err = analyzer.analyze(vec!["bagus".into(), "jelek".into()]).unwrap_err();
    assert!(matches!(err, AnalysisError::ModelUnavailable(_)));
}

#[test]
fn empty_batch_is_rejected_before_inference() {
    let err = stub_analyzer().analyze(vec!["  ".into()]).unwrap_err();
    assert!(matches!(err, AnalysisError::InputValidation(_)));
}

#[test]
fn end_to_end_with_bundled_models_and_csv_round_trip() {
    let analyzer = Analyzer::load(&AnalyzerConfig {
        models_dir: assets_dir().join("models"),
        labels_dir: assets_dir().join("labels"),
    })
    .unwrap();
    let texts = vec![
        "Aplikasinya bagus bgt, pesan tiket jadi mudah 👍".to_string(),
        "Aplikasinya sering error, saldo terpotong gak balik 😡".to_string(),
    ];
    let report = analyzer.analyze(texts.clone()).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.sentiments[0].label, Sentiment::Positive);
    assert_eq!(report.sentiments[1].label, Sentiment::Negative);
    for t in &report.topics {
        assert!((0.0..=1.0).contains(&t.confidence));
        if t.topic_id == -1 {
            assert_eq!(t.confidence, 0.0);
        }
    }

    let dir = tempdir().unwrap();
    let paths = ExportPaths::new(dir.path());
    let written = report.save(&paths).unwrap();
    assert_eq!(written.len(), 3);

    let reloaded = load_sentiment(&paths).unwrap();
    assert_eq!(reloaded, report.sentiment_rows());
    assert_eq!(reloaded[0].text, texts[0]);

    let pos = load_topics(&paths, ExportFile::PositiveTopics).unwrap();
    let neg = load_topics(&paths, ExportFile::NegativeTopics).unwrap();
    assert_eq!(pos, report.topic_rows(Sentiment::Positive));
    let summary = AnalysisSummary::from_rows(&reloaded, &pos, &neg, analyzer.labels());
    assert_eq!(summary, report.summary(analyzer.labels()));
}

#[test]
fn missing_topic_table_reads_as_empty() {
    let dir = tempdir().unwrap();
    let paths = ExportPaths::new(dir.path());
    assert!(load_topics(&paths, ExportFile::NegativeTopics).unwrap().is_empty());
    assert!(matches!(load_sentiment(&paths), Err(AnalysisError::ResourceNotFound(_))));
}

#[test]
fn elongated_slang_is_classified_like_its_plain_form() {
    let analyzer = Analyzer::load(&AnalyzerConfig {
        models_dir: assets_dir().join("models"),
        labels_dir: assets_dir().join("labels"),
    })
    .unwrap();
    let report = analyzer.analyze(vec!["gaaak bagus".into(), "gak bagus".into()]).unwrap();
    assert_eq!(report.cleaned, vec!["tidak bagus", "tidak bagus"]);
    assert_eq!(report.sentiments[0].label, Sentiment::Negative);
    assert_eq!(report.sentiments[0], SentimentResult { index: 0, ..report.sentiments[1] });
}
