//! Execution engine - in-memory SQL over the sealed dataset
//!
//! Wraps a Polars SQLContext with one logical table named `sales` per
//! session, regardless of dataset type or content. Also the schema
//! introspector: the listing embedded in every prompt is read from here so
//! the language model only ever sees names the engine will accept.

use crate::error::{InsightError, Result};
use itertools::Itertools;
use polars::prelude::*;
use polars::sql::SQLContext;
use tracing::info;

/// Fixed logical table name.
pub const TABLE_NAME: &str = "sales";

pub struct SqlEngine {
    ctx: SQLContext,
    table: DataFrame,
}

impl SqlEngine {
    /// Seal a coerced frame into the engine. Re-uploading builds a new
    /// engine; nothing is merged.
    pub fn new(frame: DataFrame) -> Self {
        let mut ctx = SQLContext::new();
        ctx.register(TABLE_NAME, frame.clone().lazy());
        Self { ctx, table: frame }
    }

    /// Ordered `name type` pairs exactly as the engine reports them for the
    /// registered table, one pair per line.
    pub fn schema_listing(&self) -> String {
        self.table
            .schema()
            .iter_fields()
            .map(|field| format!("{} {:?}", field.name(), field.data_type()))
            .join("\n")
    }

    /// Execute one SQL statement, returning the result table or the engine's
    /// diagnostic verbatim as [`InsightError::Execution`].
    pub fn execute(&mut self, sql: &str) -> Result<DataFrame> {
        info!("Executing SQL: {}", sql);
        self.ctx
            .execute(sql)
            .and_then(|lazy| lazy.collect())
            .map_err(|e| InsightError::Execution(e.to_string()))
    }
}
