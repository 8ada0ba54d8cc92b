//! Safety Guard - blocks mutating SQL before it reaches the execution engine
//!
//! A substring scan, not a SQL parser. It can over-block read-only SQL that
//! happens to contain one of the keywords in a string literal; the entire
//! surface is read-only analytics, so over-blocking is the accepted side.

use crate::error::{InsightError, Result};
use tracing::warn;

/// Tokens that mark a statement as mutating.
const MUTATING_KEYWORDS: &[&str] = &["drop", "delete", "update", "insert", "alter"];

#[derive(Debug, Clone, Default)]
pub struct SafetyGuard;

impl SafetyGuard {
    pub fn new() -> Self {
        Self
    }

    /// Case-insensitive scan over the whole statement. Any hit blocks
    /// execution with [`InsightError::UnsafeQuery`].
    pub fn check(&self, sql: &str) -> Result<()> {
        let lowered = sql.to_lowercase();
        for keyword in MUTATING_KEYWORDS {
            if lowered.contains(keyword) {
                warn!("Blocked unsafe SQL (keyword '{}'): {}", keyword, sql);
                return Err(InsightError::UnsafeQuery(format!(
                    "statement contains '{}'",
                    keyword
                )));
            }
        }
        Ok(())
    }
}
