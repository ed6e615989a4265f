use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smoothing constant added to every ratio denominator.
pub const DEFAULT_EPSILON: f64 = 1e-8;

// ── Feature transform ──────────────────────────────────────────────

/// What to do with a row whose timestamp cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Reject the whole batch with a parse error.
    #[default]
    FailBatch,
    /// Drop the offending row and keep going.
    DropRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default)]
    pub timestamp_policy: TimestampPolicy,
    /// Upper bound applied to the three ratio features. None leaves the
    /// smoothed ratios untouched (a zero balance then yields ~1e10).
    #[serde(default)]
    pub ratio_cap: Option<f64>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            timestamp_policy: TimestampPolicy::FailBatch,
            ratio_cap: None,
        }
    }
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

// ── Scoring model ──────────────────────────────────────────────────

/// The decision cut is fixed at `scoring::DECISION_THRESHOLD`. Unknown keys,
/// a `threshold` among them, are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,
    pub intercept: f64,
    /// Feature column name → weight. Ordered so scoring is deterministic.
    pub coefficients: BTreeMap<String, f64>,
}

// ── Top level ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub transform: TransformConfig,
    pub model: ModelConfig,
}

impl PipelineConfig {
    /// Load from the data/ directory.
    /// In tests, use PipelineConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let transform_path = format!("{data_dir}/transform.json");
        let transform_content = std::fs::read_to_string(&transform_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {transform_path}: {e}"))?;
        let transform: TransformConfig = serde_json::from_str(&transform_content)?;

        let model_path = format!("{data_dir}/model.json");
        let model_content = std::fs::read_to_string(&model_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {model_path}: {e}"))?;
        let model: ModelConfig = serde_json::from_str(&model_content)?;

        let config = Self { transform, model };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.transform.epsilon.is_finite() && self.transform.epsilon > 0.0,
            "epsilon must be a positive finite number, got {}",
            self.transform.epsilon
        );
        if let Some(cap) = self.transform.ratio_cap {
            anyhow::ensure!(cap > 0.0, "ratio_cap must be positive, got {cap}");
        }
        anyhow::ensure!(
            self.model.coefficients.values().all(|w| w.is_finite()),
            "model '{}' has a non-finite coefficient",
            self.model.name
        );
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        let coefficients: BTreeMap<String, f64> = [
            ("date_diff".to_string(), 0.08),
            ("algo_diff".to_string(), 0.0012),
            ("mean_algo_eligible_amount".to_string(), -0.0009),
            ("request_hour".to_string(), 0.015),
        ]
        .into();

        Self {
            transform: TransformConfig::default(),
            model: ModelConfig {
                name: "baseline-logistic".into(),
                intercept: -0.6,
                coefficients,
            },
        }
    }
}
