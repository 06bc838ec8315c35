use crate::model::SentimentModel;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
}

fn default_scale() -> f32 { 1.5 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    /// Words that flip the polarity of the word right after them ("tidak bagus").
    #[serde(default)]
    pub negations: Vec<String>,
    /// Logit per net hit.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Logit offset toward the positive class.
    #[serde(default)]
    pub bias: f32,
}

fn default_name() -> String { "lexicon-sentiment".to_string() }

pub struct LexiconSentimentModel {
    name: String,
    positive: HashSet<String>,
    negative: HashSet<String>,
    negations: HashSet<String>,
    scale: f32,
    bias: f32,
}

impl LexiconSentimentModel {
    pub fn from_artifact(artifact: LexiconArtifact) -> Self {
        let lower = |words: Vec<String>| words.into_iter().map(|w| w.to_lowercase()).collect::<HashSet<_>>();
        Self {
            name: artifact.name,
            positive: lower(artifact.positive),
            negative: lower(artifact.negative),
            negations: lower(artifact.negations),
            scale: artifact.scale,
            bias: artifact.bias,
        }
    }

    /// Net polarity hits: positive words count +1, negative words -1, negated words flip.
    fn net_hits(&self, text: &str) -> i32 {
        let lowered = text.to_lowercase();
        let mut net = 0i32;
        let mut negate = false;
        for m in WORD_RE.find_iter(&lowered) {
            let word = m.as_str();
            if self.negations.contains(word) {
                negate = true;
                continue;
            }
            let polarity = if self.positive.contains(word) {
                1
            } else if self.negative.contains(word) {
                -1
            } else {
                0
            };
            if polarity != 0 {
                net += if negate { -polarity } else { polarity };
            }
            negate = false;
        }
        net
    }

    fn proba(&self, text: &str) -> Vec<f32> {
        let logit = self.net_hits(text) as f32 * self.scale + self.bias;
        // softmax over [0, logit]
        let p_pos = 1.0 / (1.0 + (-logit).exp());
        vec![1.0 - p_pos, p_pos]
    }
}

impl SentimentModel for LexiconSentimentModel {
    fn predict_proba(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.proba(t)).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LexiconSentimentModel {
        LexiconSentimentModel::from_artifact(LexiconArtifact {
            name: "test".into(),
            positive: vec!["bagus".into(), "mudah".into()],
            negative: vec!["jelek".into(), "error".into()],
            negations: vec!["tidak".into()],
            scale: 1.5,
            bias: 0.0,
        })
    }

    #[test]
    fn scores_and_negates() {
        let m = model();
        assert_eq!(m.net_hits("bagus dan mudah"), 2);
        assert_eq!(m.net_hits("jelek banget, sering error"), -2);
        assert_eq!(m.net_hits("tidak bagus"), -1);
    }

    #[test]
    fn rows_are_distributions() {
        let m = model();
        let rows = m.predict_proba(&["bagus", "jelek", "biasa"]).unwrap();
        for row in &rows {
            assert_eq!(row.len(), 2);
            assert!((row[0] + row[1] - 1.0).abs() < 1e-6);
        }
        assert!(rows[0][1] > 0.5);
        assert!(rows[1][0] > 0.5);
        assert_eq!(rows[2], vec![0.5, 0.5]);
    }
}
