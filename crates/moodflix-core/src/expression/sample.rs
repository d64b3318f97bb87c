use super::label::ExpressionLabel;
use crate::error::{MoodflixError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Confidence scores for each expression label, as produced for one face on
/// one detection tick.
///
/// Every stored confidence is a finite number in `[0, 1]`. Serializes as a
/// plain JSON object (`{"happy": 0.92, "sad": 0.05}`), which is also the wire
/// shape the recommendation backend expects under `expressions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<ExpressionLabel, f64>",
    into = "BTreeMap<ExpressionLabel, f64>"
)]
pub struct ExpressionSample {
    scores: BTreeMap<ExpressionLabel, f64>,
}

/// The label with maximal confidence within a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantExpression {
    pub label: ExpressionLabel,
    pub confidence: f64,
}

impl ExpressionSample {
    /// Creates an empty sample.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a sample from `(label, confidence)` pairs.
    ///
    /// A label given twice keeps its last confidence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSample` if any confidence is NaN or outside `[0, 1]`.
    pub fn from_scores<I>(scores: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ExpressionLabel, f64)>,
    {
        let mut sample = Self::new();
        for (label, confidence) in scores {
            sample.set(label, confidence)?;
        }
        Ok(sample)
    }

    /// Sets the confidence for a single label.
    pub fn set(&mut self, label: ExpressionLabel, confidence: f64) -> Result<()> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(MoodflixError::InvalidSample(format!(
                "confidence for '{}' must be within [0, 1], got {}",
                label, confidence
            )));
        }
        self.scores.insert(label, confidence);
        Ok(())
    }

    /// Confidence for `label`, if the sample scored it.
    pub fn get(&self, label: ExpressionLabel) -> Option<f64> {
        self.scores.get(&label).copied()
    }

    /// Iterates scores in canonical label order.
    pub fn iter(&self) -> impl Iterator<Item = (ExpressionLabel, f64)> + '_ {
        self.scores.iter().map(|(label, confidence)| (*label, *confidence))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Returns the dominant expression, or `None` for an empty sample.
    ///
    /// Only a strictly greater confidence replaces the current best, so among
    /// equal maxima the label earliest in canonical order wins.
    pub fn dominant(&self) -> Option<DominantExpression> {
        self.iter().fold(None, |best, (label, confidence)| match best {
            Some(DominantExpression {
                confidence: best_confidence,
                ..
            }) if best_confidence >= confidence => best,
            _ => Some(DominantExpression { label, confidence }),
        })
    }
}

impl TryFrom<BTreeMap<ExpressionLabel, f64>> for ExpressionSample {
    type Error = MoodflixError;

    fn try_from(scores: BTreeMap<ExpressionLabel, f64>) -> Result<Self> {
        Self::from_scores(scores)
    }
}

impl From<ExpressionSample> for BTreeMap<ExpressionLabel, f64> {
    fn from(sample: ExpressionSample) -> Self {
        sample.scores
    }
}
