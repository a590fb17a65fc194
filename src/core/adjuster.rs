use chrono::{Local, NaiveDateTime};

use crate::core::table::{format_float, Cell, Table};
use crate::domain::model::{AdjustOutcome, Summary};
use crate::utils::error::{ProcessorError, Result};

/// Column names recognized as the price column, checked in priority order.
/// The Japanese entries are "price" and "selling price".
pub const PRICE_COLUMN_CANDIDATES: [&str; 5] =
    ["price", "Price", "価格", "販売価格", "selling_price"];

pub struct PriceAdjuster;

impl PriceAdjuster {
    /// Applies `reduction_percentage` to the first recognized price column
    /// and returns the re-serialized CSV together with a summary.
    pub fn adjust(csv_text: &str, reduction_percentage: f64) -> Result<AdjustOutcome> {
        Self::adjust_at(csv_text, reduction_percentage, Local::now().naive_local())
    }

    /// Same as [`adjust`](Self::adjust) with an explicit timestamp for the
    /// `updated_at` column. The timestamp is captured once per invocation,
    /// so every row carries the same value.
    pub fn adjust_at(
        csv_text: &str,
        reduction_percentage: f64,
        timestamp: NaiveDateTime,
    ) -> Result<AdjustOutcome> {
        let mut table = Table::parse(csv_text)?;

        let price_column = PRICE_COLUMN_CANDIDATES
            .iter()
            .find_map(|name| table.column(name).map(|c| (*name, c.cells.clone())));

        let summary = match price_column {
            Some((name, price_cells)) => {
                let originals = numeric_values(name, &price_cells)?;
                let row_count = price_cells.len();

                let factor = 1.0 - reduction_percentage / 100.0;
                let new_prices: Vec<i64> = originals
                    .iter()
                    .map(|price| (price * factor).round_ties_even() as i64)
                    .collect();

                table.set_column("original_price", price_cells)?;
                table.set_column("new_price", new_prices.iter().copied().map(Cell::Int).collect())?;

                let rate = format!("{}%", format_float(reduction_percentage));
                table.set_column("reduction_rate", vec![Cell::Str(rate); row_count])?;

                let stamp = timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
                table.set_column("updated_at", vec![Cell::Str(stamp); row_count])?;

                let new_as_f64: Vec<f64> = new_prices.iter().map(|v| *v as f64).collect();
                Summary::Success {
                    total_rows: row_count,
                    reduction_percentage,
                    average_original_price: mean(&originals),
                    average_new_price: mean(&new_as_f64),
                }
            }
            None => Summary::Warning {
                warning: "Price column not found".to_string(),
                available_columns: table.column_names(),
            },
        };

        Ok(AdjustOutcome {
            processed_csv: table.to_csv()?,
            summary,
        })
    }
}

fn numeric_values(column: &str, cells: &[Cell]) -> Result<Vec<f64>> {
    cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            cell.as_f64().ok_or_else(|| {
                ProcessorError::processing(format!(
                    "non-numeric value '{}' in column '{}' at row {}",
                    cell,
                    column,
                    row + 1
                ))
            })
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
