use crate::model::SentimentModel;
use crate::{AnalysisError, Result, Sentiment, SentimentResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentimentPrediction {
    pub labels: Vec<Sentiment>,
    pub confidences: Vec<f32>,
}

impl SentimentPrediction {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn results(&self) -> Vec<SentimentResult> {
        self.labels
            .iter()
            .zip(self.confidences.iter())
            .enumerate()
            .map(|(index, (&label, &confidence))| SentimentResult { index, label, confidence })
            .collect()
    }
}

/// Score every text in one call to `model` and keep the arg-max class.
pub fn classify_sentiment<S: AsRef<str>>(model: &dyn SentimentModel, texts: &[S]) -> Result<SentimentPrediction> {
    if texts.is_empty() {
        return Ok(SentimentPrediction::default());
    }
    let refs: Vec<&str> = texts.iter().map(|t| t.as_ref()).collect();
    let probs = model
        .predict_proba(&refs)
        .map_err(|e| AnalysisError::model(format!("{}: {e}", model.name())))?;
    if probs.len() != texts.len() {
        return Err(AnalysisError::model(format!(
            "{} returned {} rows for {} texts",
            model.name(),
            probs.len(),
            texts.len()
        )));
    }

    let mut out = SentimentPrediction {
        labels: Vec::with_capacity(probs.len()),
        confidences: Vec::with_capacity(probs.len()),
    };
    for (row_idx, row) in probs.iter().enumerate() {
        let (label, confidence) = argmax(row).ok_or_else(|| {
            AnalysisError::model(format!("{} returned malformed probabilities {row:?} at row {row_idx}", model.name()))
        })?;
        out.labels.push(label);
        out.confidences.push(confidence);
    }
    tracing::debug!(model = model.name(), n = out.len(), "sentiment batch classified");
    Ok(out)
}

fn argmax(row: &[f32]) -> Option<(Sentiment, f32)> {
    if row.len() != 2 || row.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
        return None;
    }
    // ties go to class 0, as torch.max does
    let class = if row[1] > row[0] { 1 } else { 0 };
    Sentiment::from_class(class).map(|label| (label, row[class]))
}
