//! Table assembly
//!
//! Turns merged rows into a [`Dataset`]: one column per field in a fixed
//! order, numeric coercion on the pollutant and index columns, and every other
//! column passed through as received.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::models::{COLUMNS, MergedRow};

/// Columns coerced to numbers; anything unparseable becomes [`Cell::Missing`]
pub const NUMERIC_COLUMNS: [&str; 7] = ["pm25", "pm10", "o3", "no2", "so2", "co", "aqi"];

/// A single table value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Missing => Ok(()),
        }
    }
}

/// Convert a raw value to a finite number, or [`Cell::Missing`].
#[must_use]
pub fn coerce_numeric(value: &Value) -> Cell {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite()).map_or(Cell::Missing, Cell::Number)
}

fn passthrough(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Number(n) => n.as_f64().map_or(Cell::Missing, Cell::Number),
        Value::String(s) => Cell::Text(s),
        other => Cell::Text(other.to_string()),
    }
}

/// Ordered table of collected rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` in column `name`
    #[must_use]
    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let column = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// All cells of one column, in row order
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let column = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[column]).collect())
    }

    /// Render the first `n` rows as an aligned text table with a row index.
    #[must_use]
    pub fn preview(&self, n: usize) -> String {
        let shown = &self.rows[..n.min(self.rows.len())];
        let rendered: Vec<Vec<String>> = shown
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Missing => "NaN".to_string(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect();

        let index_width = shown.len().saturating_sub(1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                rendered
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = format!("{:index_width$}", "");
        for (name, width) in self.columns.iter().zip(widths.iter().copied()) {
            out.push_str(&format!("  {name:>width$}"));
        }
        for (i, row) in rendered.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{i:<index_width$}"));
            for (value, width) in row.iter().zip(widths.iter().copied()) {
                out.push_str(&format!("  {value:>width$}"));
            }
        }
        out
    }
}

/// Builds a [`Dataset`] from merged rows
pub struct TableAssembler;

impl TableAssembler {
    /// Assemble rows into a table. Never fails; an empty input yields an
    /// empty table that still carries the full column set.
    #[must_use]
    pub fn assemble(rows: &[MergedRow]) -> Dataset {
        let columns: Vec<String> = COLUMNS.iter().map(ToString::to_string).collect();
        let rows = rows
            .iter()
            .map(|row| {
                COLUMNS
                    .iter()
                    .map(|column| {
                        let value = row.value(column);
                        if NUMERIC_COLUMNS.contains(column) {
                            coerce_numeric(&value)
                        } else {
                            passthrough(value)
                        }
                    })
                    .collect()
            })
            .collect();

        Dataset { columns, rows }
    }
}
