//! FeatureTransform: raw loan upload → classifier feature table.
//!
//! STEPS (fixed order):
//!   1. Validate the schema.
//!   2. Keep rows with mean_airtime_balance_20_weeks >= 0. Silent; not an error.
//!   3. Parse both timestamps and extract calendar fields plus date_diff.
//!   4. Ratio features (epsilon-smoothed) and eligibility aggregates.
//!   5. Drop the raw timestamps and the identifier columns.
//!
//! RULES:
//!   - The input table is never modified; a new table is returned.
//!   - Rows removed in step 2 are never parsed, so they cannot fail step 3.
//!   - Output row count never exceeds input row count.

use crate::{
    calendar::{parse_timestamp, whole_day_difference, CalendarParts},
    config::{TimestampPolicy, TransformConfig},
    error::{PipelineError, PipelineResult},
    schema::{self, *},
    table::{Column, Table},
    types::RowIndex,
};
use chrono::NaiveDateTime;

/// Output of a transform together with the provenance of each row.
#[derive(Debug, Clone)]
pub struct FeatureBatch {
    pub features: Table,
    /// For each output row, the index of the input row it came from.
    /// Strictly ascending.
    pub kept_rows: Vec<RowIndex>,
}

impl FeatureBatch {
    pub fn len(&self) -> usize {
        self.kept_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept_rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureTransform {
    config: TransformConfig,
}

impl FeatureTransform {
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Produce the feature table for `records`.
    pub fn transform(&self, records: &Table) -> PipelineResult<Table> {
        Ok(self.transform_batch(records)?.features)
    }

    /// Like `transform`, but also reports which input rows survived so
    /// callers can line identifiers up with scored rows.
    pub fn transform_batch(&self, records: &Table) -> PipelineResult<FeatureBatch> {
        schema::validate(records)?;

        // Step 2: airtime filter. NaN compares false and is dropped too.
        let airtime = records.f64_values(MEAN_AIRTIME_BALANCE)?;
        let candidates: Vec<RowIndex> = (0..records.len())
            .filter(|&row| airtime[row] >= 0.0)
            .collect();

        // Step 3a: timestamps.
        let request_raw = records.text_values(REQUEST_DATETIME)?;
        let reimbursement_raw = records.text_values(REIMBURSEMENT_DATE)?;
        let mut kept_rows = Vec::with_capacity(candidates.len());
        let mut stamps: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::with_capacity(candidates.len());
        for row in candidates.iter().copied() {
            let parsed = parse_at(row, REQUEST_DATETIME, &request_raw[row]).and_then(|req| {
                parse_at(row, REIMBURSEMENT_DATE, &reimbursement_raw[row]).map(|reim| (req, reim))
            });
            match parsed {
                Ok(pair) => {
                    kept_rows.push(row);
                    stamps.push(pair);
                }
                Err(e) if self.config.timestamp_policy == TimestampPolicy::DropRow => {
                    log::warn!("Dropping row: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        log::debug!(
            "Feature transform: {} rows in, {} below airtime floor, {} unparseable, {} out",
            records.len(),
            records.len() - candidates.len(),
            candidates.len() - kept_rows.len(),
            kept_rows.len()
        );

        let kept = records.select_rows(&kept_rows);
        let mut features = kept.without_columns(&PRUNED_COLUMNS);

        // Step 3b: calendar fields.
        let request: Vec<CalendarParts> = stamps.iter().map(|(req, _)| CalendarParts::of(req)).collect();
        let reimbursement: Vec<CalendarParts> =
            stamps.iter().map(|(_, reim)| CalendarParts::of(reim)).collect();

        features.push_column(REQUEST_YEAR, calendar_column(&request, |p| p.year))?;
        features.push_column(REQUEST_MONTH, calendar_column(&request, |p| p.month))?;
        features.push_column(REQUEST_DAY, calendar_column(&request, |p| p.day))?;
        features.push_column(REQUEST_HOUR, calendar_column(&request, |p| p.hour))?;
        features.push_column(REQUEST_DAYOFWEEK, calendar_column(&request, |p| p.weekday))?;
        features.push_column(REIMBURSEMENT_YEAR, calendar_column(&reimbursement, |p| p.year))?;
        features.push_column(REIMBURSEMENT_MONTH, calendar_column(&reimbursement, |p| p.month))?;
        features.push_column(REIMBURSEMENT_DAY, calendar_column(&reimbursement, |p| p.day))?;
        features.push_column(REIMBURSEMENT_DAYOFWEEK, calendar_column(&reimbursement, |p| p.weekday))?;
        features.push_column(
            DATE_DIFF,
            Column::Int(
                stamps
                    .iter()
                    .map(|(req, reim)| whole_day_difference(reim, req))
                    .collect(),
            ),
        )?;

        // Step 4: ratios and aggregates.
        let values = |name: &str| kept_values(&kept, &kept_rows, name);
        let airtime = values(MEAN_AIRTIME_BALANCE)?;
        let cashout = values(MEAN_VOLCASHOUT)?;
        let balance = values(MEAN_BALANCE)?;
        let otherout = values(MEAN_VOLOTHEROUT)?;
        let algo1 = values(ALGO1_ELIGIBLE)?;
        let algo2 = values(ALGO2_ELIGIBLE)?;

        features.push_column(CASHOUT_TO_BALANCE_RATIO, self.ratio(&cashout, &balance))?;
        features.push_column(CASHOUT_TO_AIRTIME_RATIO, self.ratio(&cashout, &airtime))?;
        features.push_column(VOLOTHEROUT_TO_BALANCE_RATIO, self.ratio(&otherout, &balance))?;

        features.push_column(ALGO_DIFF, pairwise(&algo1, &algo2, |a, b| (a - b).abs()))?;
        features.push_column(TOTAL_ELIGIBLE, pairwise(&algo1, &algo2, |a, b| a + b))?;
        // min/max/mean skip a missing estimate and use the other one.
        features.push_column(MIN_ALGO_ELIGIBLE, pairwise(&algo1, &algo2, f64::min))?;
        features.push_column(MAX_ALGO_ELIGIBLE, pairwise(&algo1, &algo2, f64::max))?;
        features.push_column(MEAN_ALGO_ELIGIBLE, pairwise(&algo1, &algo2, mean_of_available))?;

        Ok(FeatureBatch {
            features,
            kept_rows,
        })
    }

    /// numerator / (denominator + epsilon), clamped to ±ratio_cap when set.
    fn ratio(&self, numerator: &[f64], denominator: &[f64]) -> Column {
        let epsilon = self.config.epsilon;
        let cap = self.config.ratio_cap;
        Column::Float(
            numerator
                .iter()
                .zip(denominator)
                .map(|(n, d)| {
                    let r = n / (d + epsilon);
                    match cap {
                        Some(cap) if r > cap => cap,
                        Some(cap) if r < -cap => -cap,
                        _ => r,
                    }
                })
                .collect(),
        )
    }
}

/// Transform with the default configuration.
pub fn transform(records: &Table) -> PipelineResult<Table> {
    FeatureTransform::default().transform(records)
}

fn parse_at(row: RowIndex, field: &str, raw: &str) -> PipelineResult<NaiveDateTime> {
    parse_timestamp(raw).ok_or_else(|| PipelineError::parse(row, field, raw))
}

/// Numeric column of the kept table, with parse errors reported against
/// the input row.
fn kept_values(kept: &Table, kept_rows: &[RowIndex], name: &str) -> PipelineResult<Vec<f64>> {
    kept.f64_values(name).map_err(|e| match e {
        PipelineError::Parse { row, field, value } => PipelineError::Parse {
            row: kept_rows[row],
            field,
            value,
        },
        other => other,
    })
}

fn calendar_column(parts: &[CalendarParts], get: fn(&CalendarParts) -> i64) -> Column {
    Column::Int(parts.iter().map(get).collect())
}

fn pairwise(a: &[f64], b: &[f64], f: fn(f64, f64) -> f64) -> Column {
    Column::Float(a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect())
}

fn mean_of_available(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => (a + b) / 2.0,
        (true, false) => b,
        _ => a,
    }
}
