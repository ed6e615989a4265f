//! Result rendering: per-customer lines and the annotated export table.

use crate::{
    error::PipelineResult,
    scoring::Prediction,
    table::{Column, Table},
    types::RowIndex,
};

pub const PREDICTION_COLUMN: &str = "prediction";
pub const CONFIDENCE_COLUMN: &str = "confidence";

/// `<customer_id>: <Not likely|Likely> to default with a confidence of <pct>%`
pub fn render_line(customer_id: &str, prediction: &Prediction) -> String {
    format!(
        "{customer_id}: {} to default with a confidence of {}%",
        prediction.class.phrase(),
        format_percentage(prediction.confidence_pct())
    )
}

/// Round to two decimals, ties to even, and print with at least one
/// decimal place: 90 → "90.0", 87.5 → "87.5", 66.6666 → "66.67",
/// 87.125 → "87.12".
pub fn format_percentage(pct: f64) -> String {
    let rounded = (pct * 100.0).round_ties_even() / 100.0;
    format!("{rounded:?}")
}

/// The uploaded rows that were scored, with `prediction` and `confidence`
/// appended. `kept_rows[i]` is the upload row scored by `predictions[i]`.
pub fn annotate(
    raw: &Table,
    kept_rows: &[RowIndex],
    predictions: &[Prediction],
) -> PipelineResult<Table> {
    let mut out = raw.select_rows(kept_rows);
    out.push_column(
        PREDICTION_COLUMN,
        Column::Text(
            predictions
                .iter()
                .map(|p| p.class.label().to_string())
                .collect(),
        ),
    )?;
    out.push_column(
        CONFIDENCE_COLUMN,
        Column::Float(predictions.iter().map(Prediction::confidence_pct).collect()),
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_keeps_one_decimal_minimum() {
        assert_eq!(format_percentage(90.0), "90.0");
        assert_eq!(format_percentage(87.5), "87.5");
        assert_eq!(format_percentage(200.0 / 3.0), "66.67");
        assert_eq!(format_percentage(99.999), "100.0");
    }

    #[test]
    fn percentage_ties_round_to_even() {
        assert_eq!(format_percentage(87.125), "87.12");
        assert_eq!(format_percentage(87.375), "87.38");
    }

    #[test]
    fn line_uses_predicted_class_confidence() {
        let p = Prediction::from_positive_probability(0.25);
        assert_eq!(
            render_line("cust-7", &p),
            "cust-7: Not likely to default with a confidence of 75.0%"
        );
        let p = Prediction::from_positive_probability(0.8125);
        assert_eq!(
            render_line("cust-8", &p),
            "cust-8: Likely to default with a confidence of 81.25%"
        );
    }
}
