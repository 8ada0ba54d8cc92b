//! Excel ingestion - first worksheet of an `.xlsx`/`.xls` workbook
//!
//! Cells are rendered to strings and handed to the same normalization and
//! coercion pipeline as CSV input, so both formats end up under one logical
//! schema.

use crate::error::{InsightError, Result};
use crate::loader::normalize::deduplicate_columns;
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::path::Path;

/// Read the first worksheet into an all-string DataFrame. The first row is
/// the header row; repeated raw headers are suffixed so the frame can be
/// constructed (the loader re-runs full deduplication later).
pub fn read_excel(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| InsightError::Load(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InsightError::Load("Workbook has no worksheets".to_string()))?
        .map_err(|e| InsightError::Load(format!("Failed to read worksheet: {}", e)))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| InsightError::Load("Worksheet is empty".to_string()))?;

    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            cell_to_string(cell).unwrap_or_else(|| format!("unnamed_{}", idx))
        })
        .collect();
    let headers = deduplicate_columns(&headers);

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (idx, values) in columns.iter_mut().enumerate() {
            values.push(row.get(idx).and_then(cell_to_string));
        }
    }

    let series: Vec<Series> = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect();

    DataFrame::new(series).map_err(Into::into)
}

fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            // Excel stores integers as floats; render them without the
            // trailing `.0` so numeric parsing sees clean text.
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.format("%Y-%m-%d %H:%M:%S").to_string()),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
        Data::Error(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_render_to_clean_text() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(
            cell_to_string(&Data::String("  Kurta  ".to_string())),
            Some("Kurta".to_string())
        );
        assert_eq!(cell_to_string(&Data::Int(42)), Some("42".to_string()));
        assert_eq!(cell_to_string(&Data::Float(376.0)), Some("376".to_string()));
        assert_eq!(
            cell_to_string(&Data::Float(376.5)),
            Some("376.5".to_string())
        );
        assert_eq!(cell_to_string(&Data::Bool(true)), Some("true".to_string()));
    }
}
