//! Query Resolution Agent - natural language to a single SQL statement

use crate::error::Result;
use crate::llm::LanguageModel;
use crate::prompts;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::info;

lazy_static! {
    static ref SQL_FENCE: Regex = Regex::new(r"(?i)```sql").unwrap();
}

/// Post-process a raw model reply into a single trimmed SQL statement:
/// markdown fences and surrounding backticks are stripped, and everything
/// after the first statement terminator is discarded.
pub fn clean_sql(raw: &str) -> String {
    let sql = SQL_FENCE.replace_all(raw, "");
    let sql = sql.replace("```", "");
    let sql = sql.trim().trim_matches('`').trim();

    match sql.find(';') {
        Some(idx) => sql[..=idx].trim().to_string(),
        None => sql.to_string(),
    }
}

pub struct QueryResolutionAgent {
    llm: Arc<dyn LanguageModel>,
}

impl QueryResolutionAgent {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// First attempt: rules + schema listing + memory window + question.
    pub async fn resolve(
        &self,
        question: &str,
        schema_listing: &str,
        memory_window: &str,
    ) -> Result<String> {
        let prompt = prompts::sql_prompt(schema_listing, memory_window, question);
        let raw = self.llm.generate(&prompt).await?;
        let sql = clean_sql(&raw);
        info!("Resolved SQL: {}", sql);
        Ok(sql)
    }

    /// Correction attempt: presents the failed statement and the engine's
    /// literal error text against the same schema.
    pub async fn refine(
        &self,
        question: &str,
        schema_listing: &str,
        error_text: &str,
        failed_sql: &str,
    ) -> Result<String> {
        let prompt = prompts::refine_prompt(question, schema_listing, error_text, failed_sql);
        let raw = self.llm.generate(&prompt).await?;
        let sql = clean_sql(&raw);
        info!("Refined SQL: {}", sql);
        Ok(sql)
    }
}
