use serde::{Deserialize, Serialize};

/// Aggregate result of one adjustment: either statistics over the adjusted
/// price column, or a warning when no candidate column was present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Summary {
    Success {
        total_rows: usize,
        reduction_percentage: f64,
        average_original_price: f64,
        average_new_price: f64,
    },
    Warning {
        warning: String,
        available_columns: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct AdjustOutcome {
    pub processed_csv: String,
    pub summary: Summary,
}
