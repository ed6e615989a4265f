//! Synthetic raw loan uploads for tests, demos, and load checks.
//!
//! The generated tables exercise every branch of the feature transform:
//!   - ~5% of rows carry a negative airtime balance (filtered out)
//!   - ~4% carry a zero mean balance (epsilon-smoothed ratios)
//!   - ~10% are reimbursed before the request date (negative date_diff)

use crate::{
    error::PipelineResult,
    rng::SampleRng,
    schema::*,
    table::{Column, Table},
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use uuid::Builder;

const NEGATIVE_AIRTIME_RATE: f64 = 0.05;
const ZERO_BALANCE_RATE: f64 = 0.04;
const EARLY_REIMBURSEMENT_RATE: f64 = 0.10;
const REQUEST_WINDOW_DAYS: u64 = 365;

pub struct SampleGenerator {
    rng: SampleRng,
    epoch: NaiveDateTime,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        let epoch = NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        Self {
            rng: SampleRng::new(seed),
            epoch,
        }
    }

    /// A raw upload of `rows` records with every required column.
    pub fn generate(mut self, rows: usize) -> PipelineResult<Table> {
        let mut customer_id = Vec::with_capacity(rows);
        let mut simulation_id = Vec::with_capacity(rows);
        let mut loan_id = Vec::with_capacity(rows);
        let mut request = Vec::with_capacity(rows);
        let mut reimbursement = Vec::with_capacity(rows);
        let mut airtime = Vec::with_capacity(rows);
        let mut cashout = Vec::with_capacity(rows);
        let mut balance = Vec::with_capacity(rows);
        let mut otherout = Vec::with_capacity(rows);
        let mut algo1 = Vec::with_capacity(rows);
        let mut algo2 = Vec::with_capacity(rows);

        for i in 0..rows {
            customer_id.push(format!("cust-{i:06}"));
            simulation_id.push(self.uuid());
            loan_id.push(self.uuid());

            let requested_at = self.epoch
                + Duration::days(self.rng.next_u64_below(REQUEST_WINDOW_DAYS) as i64)
                + Duration::seconds(self.rng.next_u64_below(86_400) as i64);
            let term_days = if self.rng.chance(EARLY_REIMBURSEMENT_RATE) {
                -(self.rng.next_u64_below(7) as i64) - 1
            } else {
                self.rng.next_u64_below(45) as i64
            };
            let reimbursed_on = requested_at.date() + Duration::days(term_days);
            request.push(requested_at.format("%Y-%m-%d %H:%M:%S").to_string());
            reimbursement.push(reimbursed_on.format("%Y-%m-%d").to_string());

            airtime.push(if self.rng.chance(NEGATIVE_AIRTIME_RATE) {
                -cents(self.rng.uniform(1.0, 500.0))
            } else {
                cents(self.rng.pareto(50.0, 1.5) - 50.0)
            });
            cashout.push(cents(self.rng.pareto(100.0, 1.6) - 100.0));
            balance.push(if self.rng.chance(ZERO_BALANCE_RATE) {
                0.0
            } else {
                cents(self.rng.pareto(200.0, 1.4))
            });
            otherout.push(cents(self.rng.pareto(20.0, 1.7) - 20.0));

            let a1 = (self.rng.next_u64_below(31) * 50) as f64;
            let a2 = (a1 * self.rng.uniform(0.6, 1.4) / 50.0).round() * 50.0;
            algo1.push(a1);
            algo2.push(a2);
        }

        log::debug!("Generated {rows} synthetic loan records");
        Table::from_columns([
            (CUSTOMER_ID, Column::Text(customer_id)),
            (SIMULATION_ID, Column::Text(simulation_id)),
            (LOAN_ID, Column::Text(loan_id)),
            (REQUEST_DATETIME, Column::Text(request)),
            (REIMBURSEMENT_DATE, Column::Text(reimbursement)),
            (MEAN_AIRTIME_BALANCE, Column::Float(airtime)),
            (MEAN_VOLCASHOUT, Column::Float(cashout)),
            (MEAN_BALANCE, Column::Float(balance)),
            (MEAN_VOLOTHEROUT, Column::Float(otherout)),
            (ALGO1_ELIGIBLE, Column::Float(algo1)),
            (ALGO2_ELIGIBLE, Column::Float(algo2)),
        ])
    }

    fn uuid(&mut self) -> String {
        Builder::from_random_bytes(self.rng.next_bytes16())
            .into_uuid()
            .to_string()
    }
}

fn cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = SampleGenerator::new(42).generate(50).unwrap();
        let b = SampleGenerator::new(42).generate(50).unwrap();
        assert_eq!(a.to_csv_bytes().unwrap(), b.to_csv_bytes().unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let a = SampleGenerator::new(1).generate(20).unwrap();
        let b = SampleGenerator::new(2).generate(20).unwrap();
        assert_ne!(a.to_csv_bytes().unwrap(), b.to_csv_bytes().unwrap());
    }

    #[test]
    fn carries_every_required_column() {
        let t = SampleGenerator::new(3).generate(10).unwrap();
        assert_eq!(t.len(), 10);
        for c in REQUIRED_COLUMNS {
            assert!(t.has_column(c), "missing {c}");
        }
    }
}
