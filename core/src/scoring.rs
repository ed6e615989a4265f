//! The scoring seam between the feature table and a binary classifier.
//!
//! RULE: The pipeline only ever talks to a `Scorer`. Any model (a fitted
//! logistic model, a remote service, a test double) plugs in here.

use crate::{
    config::ModelConfig,
    error::{PipelineError, PipelineResult},
    table::Table,
    types::Probability,
};
use serde::{Deserialize, Serialize};

/// Positive-class probability a row must exceed to be labelled "default".
pub const DECISION_THRESHOLD: Probability = 0.5;

/// The contract every classifier must fulfil.
pub trait Scorer: Send + Sync {
    /// Stable name for logging.
    fn name(&self) -> &str;

    /// Probability of the positive class (default) for each row of
    /// `features`, in row order.
    fn positive_probabilities(&self, features: &Table) -> PipelineResult<Vec<Probability>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultClass {
    NoDefault = 0,
    Default = 1,
}

impl DefaultClass {
    /// Value written to the `prediction` column of the export.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoDefault => "no default",
            Self::Default => "default",
        }
    }

    /// Leading phrase of the per-customer result line.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::NoDefault => "Not likely",
            Self::Default => "Likely",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: DefaultClass,
    /// Probability of the positive class.
    pub probability: Probability,
}

impl Prediction {
    /// Label as `Default` only when `probability` is strictly above
    /// `DECISION_THRESHOLD`.
    pub fn from_positive_probability(probability: Probability) -> Self {
        let class = if probability > DECISION_THRESHOLD {
            DefaultClass::Default
        } else {
            DefaultClass::NoDefault
        };
        Self { class, probability }
    }

    /// [P(no default), P(default)].
    pub fn probabilities(&self) -> [Probability; 2] {
        [1.0 - self.probability, self.probability]
    }

    /// 100 * max(p0, p1). At the fixed 0.5 cut this is always the
    /// probability of the predicted class.
    pub fn confidence_pct(&self) -> f64 {
        let [p0, p1] = self.probabilities();
        100.0 * p0.max(p1)
    }
}

// ── Logistic scorer ──────────────────────────────────────────────────────────

/// A linear model over named feature columns with a logistic link.
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    config: ModelConfig,
}

impl LogisticScorer {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }
}

impl Scorer for LogisticScorer {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn positive_probabilities(&self, features: &Table) -> PipelineResult<Vec<Probability>> {
        let mut logits = vec![self.config.intercept; features.len()];
        for (column, weight) in &self.config.coefficients {
            let values = features.f64_values(column)?;
            for (logit, x) in logits.iter_mut().zip(values) {
                // Missing feature values contribute nothing.
                if !x.is_nan() {
                    *logit += weight * x;
                }
            }
        }
        Ok(logits.into_iter().map(sigmoid).collect())
    }
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// Score `features` and check the scorer kept its side of the contract.
pub fn predict(scorer: &dyn Scorer, features: &Table) -> PipelineResult<Vec<Prediction>> {
    let probabilities = scorer.positive_probabilities(features)?;
    if probabilities.len() != features.len() {
        return Err(PipelineError::Scoring(format!(
            "scorer '{}' returned {} probabilities for {} rows",
            scorer.name(),
            probabilities.len(),
            features.len()
        )));
    }
    if let Some(bad) = probabilities.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(PipelineError::Scoring(format!(
            "scorer '{}' returned probability {bad} outside [0, 1]",
            scorer.name()
        )));
    }
    Ok(probabilities
        .into_iter()
        .map(Prediction::from_positive_probability)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert_eq!(
            Prediction::from_positive_probability(0.5).class,
            DefaultClass::NoDefault
        );
        assert_eq!(
            Prediction::from_positive_probability(0.5001).class,
            DefaultClass::Default
        );
    }

    #[test]
    fn confidence_tracks_predicted_class() {
        let low = Prediction::from_positive_probability(0.2);
        assert!((low.confidence_pct() - 80.0).abs() < 1e-9);
        let high = Prediction::from_positive_probability(0.9);
        assert!((high.confidence_pct() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn confidence_never_drops_below_half() {
        for p in [0.0, 0.3, 0.4, 0.5, 0.5001, 0.6, 1.0] {
            let prediction = Prediction::from_positive_probability(p);
            let [p0, p1] = prediction.probabilities();
            assert!(prediction.confidence_pct() >= 50.0, "p = {p}");
            assert!((prediction.confidence_pct() - 100.0 * p0.max(p1)).abs() < 1e-9);
        }
        let prediction = Prediction::from_positive_probability(0.4);
        assert_eq!(prediction.class, DefaultClass::NoDefault);
        assert!((prediction.confidence_pct() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(1e6) <= 1.0);
        assert!(sigmoid(-1e6) >= 0.0);
        assert!(sigmoid(-1e6).is_finite());
    }
}
