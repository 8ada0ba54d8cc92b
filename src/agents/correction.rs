//! Self-Correction Loop - bounded retry around query execution
//!
//! Exactly one refinement attempt per question: a failed first execution
//! feeds the failing SQL and the engine's error text back to the resolver;
//! a second execution failure is terminal. The bound is structural - the
//! attempt counter lives in the loop, not in call-site discipline.

use crate::agents::extractor::DataExtractionAgent;
use crate::agents::resolver::QueryResolutionAgent;
use crate::engine::SqlEngine;
use crate::error::{InsightError, Result};
use crate::safety::SafetyGuard;
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::warn;

/// One resolution plus at most one refinement.
pub const MAX_ATTEMPTS: u8 = 2;

/// Ephemeral record of a single attempt; exists only while one question is
/// being resolved.
#[derive(Debug, Clone, Serialize)]
pub struct QueryAttempt {
    pub sql: String,
    pub attempt: u8,
    pub source_error: Option<String>,
}

#[derive(Debug)]
pub struct ResolvedQuery {
    pub sql: String,
    pub table: DataFrame,
    pub attempts: u8,
}

pub struct CorrectionLoop {
    guard: SafetyGuard,
    extractor: DataExtractionAgent,
}

impl CorrectionLoop {
    pub fn new() -> Self {
        Self {
            guard: SafetyGuard::new(),
            extractor: DataExtractionAgent::new(),
        }
    }

    /// Resolve, screen, execute; on the first execution failure refine once
    /// and try again. Every attempt - including the refined one - passes the
    /// safety guard before execution, and a blocked statement terminates the
    /// loop immediately.
    pub async fn run(
        &self,
        resolver: &QueryResolutionAgent,
        engine: &mut SqlEngine,
        question: &str,
        schema_listing: &str,
        memory_window: &str,
    ) -> Result<ResolvedQuery> {
        let mut failed: Option<QueryAttempt> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let sql = match &failed {
                None => {
                    resolver
                        .resolve(question, schema_listing, memory_window)
                        .await?
                }
                Some(previous) => {
                    let error_text = previous.source_error.as_deref().unwrap_or_default();
                    resolver
                        .refine(question, schema_listing, error_text, &previous.sql)
                        .await?
                }
            };

            self.guard.check(&sql)?;

            match self.extractor.extract(&sql, engine) {
                Ok(table) => {
                    return Ok(ResolvedQuery {
                        sql,
                        table,
                        attempts: attempt,
                    })
                }
                Err(InsightError::Execution(message)) if attempt < MAX_ATTEMPTS => {
                    warn!("SQL attempt {} failed, self-correcting: {}", attempt, message);
                    failed = Some(QueryAttempt {
                        sql,
                        attempt,
                        source_error: Some(message),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Err(InsightError::Execution(format!(
            "Max attempts ({}) exceeded",
            MAX_ATTEMPTS
        )))
    }
}

impl Default for CorrectionLoop {
    fn default() -> Self {
        Self::new()
    }
}
