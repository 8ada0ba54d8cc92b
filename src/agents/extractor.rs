//! Data Extraction Agent - runs one statement against the execution engine

use crate::engine::SqlEngine;
use crate::error::Result;
use polars::prelude::DataFrame;

/// Executes a SQL string and returns the tabular result, or propagates the
/// engine's [`crate::error::InsightError::Execution`] with its diagnostic
/// verbatim; that message is the sole input to the refinement prompt.
#[derive(Debug, Clone, Default)]
pub struct DataExtractionAgent;

impl DataExtractionAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, sql: &str, engine: &mut SqlEngine) -> Result<DataFrame> {
        engine.execute(sql)
    }
}
