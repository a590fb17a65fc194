use crate::utils::error::{ProcessorError, Result};
use std::collections::HashMap;
use std::fmt;

/// Renders a float the way the CSV output and the reduction-rate label
/// expect it: whole numbers keep one decimal place ("100.0"), everything
/// else uses the shortest representation.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Float(v) => Some(*v),
            Cell::Str(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", format_float(*v)),
            Cell::Str(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Ordered named columns parsed from CSV text, with a name lookup built
/// once at parse time. Every column holds the same number of cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn parse(csv_text: &str) -> Result<Table> {
        if csv_text.trim().is_empty() {
            return Err(ProcessorError::parse("no columns to parse from empty input"));
        }

        let mut reader = csv::ReaderBuilder::new().from_reader(csv_text.as_bytes());
        let headers = reader.headers()?.clone();

        let mut index = HashMap::new();
        for (i, name) in headers.iter().enumerate() {
            if index.insert(name.to_string(), i).is_some() {
                return Err(ProcessorError::parse(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
        }

        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            // Strict reader: a ragged row surfaces here as an error.
            let record = record?;
            for (i, field) in record.iter().enumerate() {
                raw_columns[i].push(field.to_string());
            }
        }

        let columns = headers
            .iter()
            .zip(raw_columns)
            .map(|(name, raw)| Column {
                name: name.to_string(),
                cells: infer_cells(raw),
            })
            .collect();

        Ok(Table { columns, index })
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// Replaces an existing column's values in place (keeping its position)
    /// or appends a new column at the end.
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) -> Result<()> {
        if !self.columns.is_empty() && cells.len() != self.row_count() {
            return Err(ProcessorError::processing(format!(
                "column '{}' has {} values, expected {}",
                name,
                cells.len(),
                self.row_count()
            )));
        }

        match self.index.get(name) {
            Some(&i) => self.columns[i].cells = cells,
            None => {
                self.index.insert(name.to_string(), self.columns.len());
                self.columns.push(Column {
                    name: name.to_string(),
                    cells,
                });
            }
        }
        Ok(())
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;

        for row in 0..self.row_count() {
            writer.write_record(self.columns.iter().map(|c| c.cells[row].to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ProcessorError::processing(format!("CSV write failed: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ProcessorError::processing(format!("CSV output is not UTF-8: {}", e)))
    }
}

/// Per-column type inference: a column is integer if every non-empty cell
/// parses as i64, float if every non-empty cell parses as f64, otherwise
/// the raw strings are kept. Cells are trimmed before the numeric parse so
/// padded values like " 100" still count; empty and whitespace-only cells
/// stay as-is in any column.
fn infer_cells(raw: Vec<String>) -> Vec<Cell> {
    let all_int = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .all(|s| s.parse::<i64>().is_ok());
    let all_float = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .all(|s| s.parse::<f64>().is_ok());

    raw.into_iter()
        .map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Cell::Str(s);
            }
            if all_int {
                if let Ok(v) = trimmed.parse::<i64>() {
                    return Cell::Int(v);
                }
            } else if all_float {
                if let Ok(v) = trimmed.parse::<f64>() {
                    return Cell::Float(v);
                }
            }
            Cell::Str(s)
        })
        .collect()
}
