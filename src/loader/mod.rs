//! Dataset loading and normalization
//!
//! Turns an uploaded CSV/Excel file into one coerced, canonically-named
//! DataFrame ready to be sealed into the execution engine. The header
//! pipeline runs as pure string transforms first and renames the frame once
//! at the end: normalize, classify, alias (sales only), expense remap, junk
//! removal, deduplicate, coerce.

pub mod classify;
pub mod coerce;
pub mod excel;
pub mod normalize;

pub use classify::DatasetKind;

use crate::error::{InsightError, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// A sealed upload: the coerced frame plus its detected type label.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub frame: DataFrame,
    pub kind: DatasetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    Csv,
    Excel,
}

fn detect_format(path: &Path) -> Result<SourceFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(SourceFormat::Csv),
        "xlsx" | "xls" => Ok(SourceFormat::Excel),
        other => Err(InsightError::UnsupportedFileType(other.to_string())),
    }
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    let frame = LazyCsvReader::new(path)
        .with_has_header(true)
        .finish()
        .map_err(|e| InsightError::Load(format!("Failed to read CSV: {}", e)))?
        .collect()
        .map_err(|e| InsightError::Load(format!("Failed to read CSV: {}", e)))?;
    Ok(frame)
}

/// Load a dataset file and run the full normalization pipeline.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset> {
    let format = detect_format(path)?;
    let frame = match format {
        SourceFormat::Csv => read_csv(path)?,
        SourceFormat::Excel => excel::read_excel(path)?,
    };

    let dataset = prepare_frame(frame)?;
    info!(
        "Loaded dataset: {} rows, {} columns, kind {}",
        dataset.frame.height(),
        dataset.frame.width(),
        dataset.kind
    );
    Ok(dataset)
}

/// Normalize headers, classify, alias, drop junk, deduplicate, and coerce an
/// in-memory frame. Exposed separately so the pipeline is testable without
/// touching the filesystem.
pub fn prepare_frame(frame: DataFrame) -> Result<LoadedDataset> {
    let raw: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let normalized = normalize::normalize_columns(&raw);

    // Detect the dataset type before aliasing: the signal set contains the
    // pre-alias spellings.
    let kind = classify::detect_dataset_kind(&normalized);

    let mut names = match kind {
        DatasetKind::Sales => classify::apply_canonical_aliases(&normalized),
        DatasetKind::Generic => normalized,
    };

    // Expense-sheet remap: the amount lives in an unnamed column next to the
    // expense label. Applied before junk removal so the amount survives it.
    // Headers like "Unnamed 3" and "Unnamed: 3" normalize to different
    // spellings; accept both.
    let is_unnamed_amount = |n: &str| n == "unnamed_3" || n == "unnamed__3";
    if names.iter().any(|n| n == "expance")
        && names.iter().any(|n| is_unnamed_amount(n))
        && !names.iter().any(|n| n == "expense_amount")
    {
        for name in names.iter_mut() {
            if is_unnamed_amount(name) {
                *name = "expense_amount".to_string();
            }
        }
    }

    // Drop unnamed junk columns, then disambiguate what remains.
    let keep: Vec<bool> = names.iter().map(|n| !n.starts_with("unnamed")).collect();
    let kept_names: Vec<String> = names
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(n, _)| n.clone())
        .collect();
    let final_names = normalize::deduplicate_columns(&kept_names);

    let mut columns: Vec<Series> = Vec::with_capacity(final_names.len());
    let mut name_iter = final_names.iter();
    for (series, keep) in frame.get_columns().iter().zip(&keep) {
        if !*keep {
            continue;
        }
        let name = name_iter.next().expect("one final name per kept column");
        let mut series = series.clone();
        series.rename(name);
        columns.push(series);
    }

    let renamed = DataFrame::new(columns)?;
    let coerced = coerce::coerce_columns(renamed)?;

    Ok(LoadedDataset {
        frame: coerced,
        kind,
    })
}
