//! Summary statistics and interpretation sentences.
//!
//! Everything here is a pure function of stored results, so a front end can
//! redraw as often as it likes without touching the models.

use crate::labels::TopicLabelMap;
use crate::{Sentiment, SentimentResult, TopicId, TopicRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentMetrics {
    pub total: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub mean_confidence: f32,
    pub counts_by_label: BTreeMap<Sentiment, usize>,
}

impl SentimentMetrics {
    pub fn positive_share(&self) -> f32 {
        share(self.positive_count, self.total)
    }

    pub fn negative_share(&self) -> f32 {
        share(self.negative_count, self.total)
    }
}

fn share(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32
    }
}

pub type TopicCounts = BTreeMap<TopicId, usize>;

pub fn aggregate(results: &[SentimentResult]) -> SentimentMetrics {
    let mut counts_by_label: BTreeMap<Sentiment, usize> = BTreeMap::new();
    let mut conf_sum = 0.0f64;
    for r in results {
        *counts_by_label.entry(r.label).or_insert(0) += 1;
        conf_sum += r.confidence as f64;
    }
    let total = results.len();
    let mean_confidence = if total == 0 { 0.0 } else { (conf_sum / total as f64) as f32 };
    SentimentMetrics {
        total,
        positive_count: counts_by_label.get(&Sentiment::Positive).copied().unwrap_or(0),
        negative_count: counts_by_label.get(&Sentiment::Negative).copied().unwrap_or(0),
        mean_confidence,
        counts_by_label,
    }
}

pub fn interpret_sentiment(metrics: &SentimentMetrics) -> String {
    let summary = if metrics.positive_count > metrics.negative_count {
        "didominasi oleh sentimen positif"
    } else if metrics.negative_count > metrics.positive_count {
        "didominasi oleh sentimen negatif"
    } else {
        "memiliki distribusi sentimen yang relatif seimbang"
    };
    format!(
        "Dari total {} ulasan yang dianalisis, hasil menunjukkan bahwa distribusi sentimen {}. \
         Nilai confidence rata-rata yang relatif tinggi mengindikasikan bahwa model memiliki tingkat \
         keandalan yang baik dalam mengklasifikasikan sentimen ulasan pengguna.",
        metrics.total, summary
    )
}

pub fn topic_counts(rows: &[TopicRow]) -> TopicCounts {
    let mut counts = TopicCounts::new();
    for row in rows {
        *counts.entry(row.topic).or_insert(0) += 1;
    }
    counts
}

/// Topic with the highest count. Ties go to the lowest topic id.
pub fn dominant_topic(counts: &TopicCounts) -> Option<(TopicId, usize)> {
    let mut best: Option<(TopicId, usize)> = None;
    for (&topic, &count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((topic, count)),
        }
    }
    best
}

pub fn format_topic_label(topic_id: TopicId, labels: &TopicLabelMap) -> String {
    match labels.get(topic_id) {
        Some(label) => format!("{topic_id} ({label})"),
        None => topic_id.to_string(),
    }
}

/// Sentence about the dominant topic for one polarity; `None` when there is nothing to describe.
pub fn interpret_topic(counts: &TopicCounts, labels: &TopicLabelMap, polarity: Sentiment) -> Option<String> {
    let (topic, count) = dominant_topic(counts)?;
    let topic_label = format_topic_label(topic, labels);
    let sentence = match polarity {
        Sentiment::Positive => format!(
            "Topik {topic_label} merupakan topik paling dominan pada sentimen positif dengan {count} ulasan. \
             Hal ini menunjukkan aspek layanan tersebut menjadi sumber utama kepuasan pengguna."
        ),
        Sentiment::Negative => format!(
            "Topik {topic_label} merupakan topik paling dominan pada sentimen negatif dengan {count} ulasan. \
             Hal ini menunjukkan permasalahan utama yang menjadi sumber ketidakpuasan pengguna."
        ),
    };
    Some(sentence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(index: usize, label: Sentiment, confidence: f32) -> SentimentResult {
        SentimentResult { index, label, confidence }
    }

    #[test]
    fn balanced_sentence_on_tie() {
        let m = aggregate(&[sent(0, Sentiment::Positive, 0.8), sent(1, Sentiment::Negative, 0.6)]);
        assert_eq!(m.total, 2);
        assert!((m.mean_confidence - 0.7).abs() < 1e-6);
        assert!(interpret_sentiment(&m).contains("relatif seimbang"));
    }

    #[test]
    fn empty_results_are_zeroed() {
        let m = aggregate(&[]);
        assert_eq!(m, SentimentMetrics::default());
        assert_eq!(m.positive_share(), 0.0);
    }

    #[test]
    fn dominant_topic_prefers_lowest_id_on_tie() {
        let counts: TopicCounts = [(4, 2), (1, 2), (-1, 1)].into_iter().collect();
        assert_eq!(dominant_topic(&counts), Some((1, 2)));
        assert_eq!(dominant_topic(&TopicCounts::new()), None);
    }

    #[test]
    fn unmapped_topic_falls_back_to_id() {
        let labels = TopicLabelMap::from_pairs([(0, "Pembayaran")]);
        assert_eq!(format_topic_label(0, &labels), "0 (Pembayaran)");
        assert_eq!(format_topic_label(7, &labels), "7");
    }

    #[test]
    fn topic_sentence_depends_on_polarity() {
        let counts: TopicCounts = [(2, 3)].into_iter().collect();
        let labels = TopicLabelMap::default();
        let pos = interpret_topic(&counts, &labels, Sentiment::Positive).unwrap();
        let neg = interpret_topic(&counts, &labels, Sentiment::Negative).unwrap();
        assert!(pos.contains("kepuasan pengguna") && pos.contains("dengan 3 ulasan"));
        assert!(neg.contains("ketidakpuasan pengguna"));
    }
}
