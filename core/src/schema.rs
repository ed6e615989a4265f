//! Column names for the raw loan upload and the derived feature table.
//!
//! RULE: Every column name used anywhere in the crate is a constant here.
//! Schema order matters: validation reports the first missing column
//! in REQUIRED_COLUMNS order.

use crate::{
    error::{PipelineError, PipelineResult},
    table::Table,
};

// ── Identifiers (never features) ─────────────────────────────────────────────

pub const CUSTOMER_ID: &str = "customer_id";
pub const SIMULATION_ID: &str = "simulation_id";
pub const LOAN_ID: &str = "loan_id";

// ── Timestamps ───────────────────────────────────────────────────────────────

pub const REQUEST_DATETIME: &str = "request_datetime";
pub const REIMBURSEMENT_DATE: &str = "reimbursement_date";

// ── Trailing 20-week aggregates ──────────────────────────────────────────────

pub const MEAN_AIRTIME_BALANCE: &str = "mean_airtime_balance_20_weeks";
pub const MEAN_VOLCASHOUT: &str = "mean_volcashout_20_weeks";
pub const MEAN_BALANCE: &str = "mean_balance_20_weeks";
pub const MEAN_VOLOTHEROUT: &str = "mean_volotherout";

// ── Eligibility estimates ────────────────────────────────────────────────────

pub const ALGO1_ELIGIBLE: &str = "algo1_eligible_amount";
pub const ALGO2_ELIGIBLE: &str = "algo2_eligible_amount";

/// Every column a raw upload must carry, in validation order.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    CUSTOMER_ID,
    SIMULATION_ID,
    LOAN_ID,
    REQUEST_DATETIME,
    REIMBURSEMENT_DATE,
    MEAN_AIRTIME_BALANCE,
    MEAN_VOLCASHOUT,
    MEAN_BALANCE,
    MEAN_VOLOTHEROUT,
    ALGO1_ELIGIBLE,
    ALGO2_ELIGIBLE,
];

/// Columns removed from the feature table: superseded timestamps and
/// identifiers that must not leak into the classifier.
pub const PRUNED_COLUMNS: [&str; 5] = [
    REQUEST_DATETIME,
    REIMBURSEMENT_DATE,
    CUSTOMER_ID,
    SIMULATION_ID,
    LOAN_ID,
];

// ── Derived features ─────────────────────────────────────────────────────────

pub const REQUEST_YEAR: &str = "request_year";
pub const REQUEST_MONTH: &str = "request_month";
pub const REQUEST_DAY: &str = "request_day";
pub const REQUEST_HOUR: &str = "request_hour";
pub const REQUEST_DAYOFWEEK: &str = "request_dayofweek";
pub const REIMBURSEMENT_YEAR: &str = "reimbursement_year";
pub const REIMBURSEMENT_MONTH: &str = "reimbursement_month";
pub const REIMBURSEMENT_DAY: &str = "reimbursement_day";
pub const REIMBURSEMENT_DAYOFWEEK: &str = "reimbursement_dayofweek";
pub const DATE_DIFF: &str = "date_diff";

pub const CASHOUT_TO_BALANCE_RATIO: &str = "mean_cashout_to_balance_ratio";
pub const CASHOUT_TO_AIRTIME_RATIO: &str = "mean_cashout_to_airtime_ratio";
pub const VOLOTHEROUT_TO_BALANCE_RATIO: &str = "mean_volotherout_to_balance_ratio";
pub const ALGO_DIFF: &str = "algo_diff";
pub const TOTAL_ELIGIBLE: &str = "total_eligible_amount";
pub const MIN_ALGO_ELIGIBLE: &str = "min_algo_eligible_amount";
pub const MAX_ALGO_ELIGIBLE: &str = "max_algo_eligible_amount";
pub const MEAN_ALGO_ELIGIBLE: &str = "mean_algo_eligible_amount";

/// Calendar fields, in output order.
pub const TEMPORAL_FEATURES: [&str; 10] = [
    REQUEST_YEAR,
    REQUEST_MONTH,
    REQUEST_DAY,
    REQUEST_HOUR,
    REQUEST_DAYOFWEEK,
    REIMBURSEMENT_YEAR,
    REIMBURSEMENT_MONTH,
    REIMBURSEMENT_DAY,
    REIMBURSEMENT_DAYOFWEEK,
    DATE_DIFF,
];

/// Ratio and eligibility aggregates, in output order.
pub const NUMERIC_FEATURES: [&str; 8] = [
    CASHOUT_TO_BALANCE_RATIO,
    CASHOUT_TO_AIRTIME_RATIO,
    VOLOTHEROUT_TO_BALANCE_RATIO,
    ALGO_DIFF,
    TOTAL_ELIGIBLE,
    MIN_ALGO_ELIGIBLE,
    MAX_ALGO_ELIGIBLE,
    MEAN_ALGO_ELIGIBLE,
];

/// Check that every required column is present.
pub fn validate(table: &Table) -> PipelineResult<()> {
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !table.has_column(c)) {
        return Err(PipelineError::Schema {
            column: missing.to_string(),
        });
    }
    for extra in table
        .column_names()
        .iter()
        .filter(|n| !REQUIRED_COLUMNS.contains(&n.as_str()))
    {
        log::debug!("Passing through unrecognised column '{extra}'");
    }
    Ok(())
}
