//! The scoring pipeline: everything the upload collaborator does with a
//! raw table.
//!
//! ORDER (fixed):
//!   1. Validate the upload and capture customer_id for every row.
//!   2. Run the feature transform.
//!   3. Score the feature table.
//!   4. Pair each scored row with the customer it came from.
//!   5. Build the annotated export.

use crate::{
    config::PipelineConfig,
    error::PipelineResult,
    report::{annotate, render_line},
    schema::{self, CUSTOMER_ID},
    scoring::{predict, DefaultClass, LogisticScorer, Prediction, Scorer},
    table::Table,
    transform::FeatureTransform,
    types::{CustomerId, RowIndex},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    pub input_row: RowIndex,
    pub customer_id: CustomerId,
    pub prediction: Prediction,
}

impl ScoredRow {
    pub fn line(&self) -> String {
        render_line(&self.customer_id, &self.prediction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringSummary {
    pub input_rows: usize,
    pub scored_rows: usize,
    pub filtered_rows: usize,
    pub predicted_defaults: usize,
}

#[derive(Debug, Clone)]
pub struct ScoringReport {
    pub rows: Vec<ScoredRow>,
    /// Upload columns of the scored rows plus `prediction` and `confidence`.
    pub export: Table,
    input_rows: usize,
}

impl ScoringReport {
    pub fn lines(&self) -> Vec<String> {
        self.rows.iter().map(ScoredRow::line).collect()
    }

    pub fn summary(&self) -> ScoringSummary {
        ScoringSummary {
            input_rows: self.input_rows,
            scored_rows: self.rows.len(),
            filtered_rows: self.input_rows - self.rows.len(),
            predicted_defaults: self
                .rows
                .iter()
                .filter(|r| r.prediction.class == DefaultClass::Default)
                .count(),
        }
    }
}

pub struct ScoringPipeline<S: Scorer> {
    transform: FeatureTransform,
    scorer: S,
}

impl ScoringPipeline<LogisticScorer> {
    /// Build a pipeline around the configured logistic model.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            FeatureTransform::new(config.transform.clone()),
            LogisticScorer::new(config.model.clone()),
        )
    }
}

impl<S: Scorer> ScoringPipeline<S> {
    pub fn new(transform: FeatureTransform, scorer: S) -> Self {
        Self { transform, scorer }
    }

    pub fn run(&self, raw: &Table) -> PipelineResult<ScoringReport> {
        schema::validate(raw)?;
        let customer_ids = raw.text_values(CUSTOMER_ID)?;

        let batch = self.transform.transform_batch(raw)?;
        let predictions = predict(&self.scorer, &batch.features)?;
        log::info!(
            "Scored {} of {} rows with '{}'",
            predictions.len(),
            raw.len(),
            self.scorer.name()
        );

        let export = annotate(raw, &batch.kept_rows, &predictions)?;
        let rows = batch
            .kept_rows
            .iter()
            .zip(predictions)
            .map(|(&input_row, prediction)| ScoredRow {
                input_row,
                customer_id: customer_ids[input_row].clone(),
                prediction,
            })
            .collect();

        Ok(ScoringReport {
            rows,
            export,
            input_rows: raw.len(),
        })
    }
}
