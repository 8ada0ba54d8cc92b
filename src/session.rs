//! Session - one upload, one engine, one conversation
//!
//! The presentation layer constructs and holds a `Session`; the core only
//! reads and appends through its methods. Per question the flow is:
//! append user turn, introspect schema, window memory, resolve/execute with
//! self-correction, validate, interpret. Every failure is converted to a
//! user-facing message and appended to memory as an assistant turn, so it is
//! visible in later prompt windows.

use crate::agents::{CorrectionLoop, QueryResolutionAgent, ValidationAgent, ValidationOutcome};
use crate::engine::SqlEngine;
use crate::error::Result;
use crate::llm::LanguageModel;
use crate::loader::{DatasetKind, LoadedDataset};
use crate::memory::ConversationMemory;
use crate::prompts;
use polars::prelude::DataFrame;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Rows of a result table rendered into interpretation prompts.
const INTERPRETED_ROWS: usize = 20;

/// A fixed aggregate block offered by the summary pass.
#[derive(Debug, Clone, Copy)]
pub struct SummaryBlock {
    pub title: &'static str,
    pub sql: &'static str,
}

/// Aggregate blocks for sales datasets. Generic datasets offer none; the
/// block set is selected by the dataset label, never by per-call input.
pub const SALES_SUMMARY_BLOCKS: &[SummaryBlock] = &[
    SummaryBlock {
        title: "Top Categories",
        sql: "SELECT category, SUM(revenue) AS total_revenue \
              FROM sales \
              WHERE revenue IS NOT NULL \
              GROUP BY category \
              ORDER BY total_revenue DESC \
              LIMIT 10",
    },
    SummaryBlock {
        title: "Top States",
        sql: "SELECT state, SUM(revenue) AS total_revenue \
              FROM sales \
              WHERE revenue IS NOT NULL AND state IS NOT NULL \
              GROUP BY state \
              ORDER BY total_revenue DESC \
              LIMIT 10",
    },
    SummaryBlock {
        title: "Order Status Split",
        sql: "SELECT status, COUNT(*) AS orders, SUM(revenue) AS total_revenue \
              FROM sales \
              GROUP BY status \
              ORDER BY orders DESC",
    },
];

pub fn summary_blocks(kind: DatasetKind) -> &'static [SummaryBlock] {
    match kind {
        DatasetKind::Sales => SALES_SUMMARY_BLOCKS,
        DatasetKind::Generic => &[],
    }
}

/// Render a result table as plain text for prompts and terminals.
pub fn render_table(table: &DataFrame) -> String {
    format!("{}", table.head(Some(INTERPRETED_ROWS)))
}

/// Outcome of one question, ready for rendering.
#[derive(Debug, Clone)]
pub enum ChatOutcome {
    /// Validated result plus its business-readable interpretation.
    Answer {
        sql: String,
        table: DataFrame,
        insight: String,
        /// Set when the result was cut to the row cap.
        truncated_from: Option<usize>,
        attempts: u8,
    },
    /// Soft validation outcome; the conversation continues.
    Warning { sql: String, message: String },
    /// Terminal failure for this question only.
    Failure { message: String },
}

pub struct Session {
    engine: SqlEngine,
    memory: ConversationMemory,
    kind: DatasetKind,
    llm: Arc<dyn LanguageModel>,
    resolver: QueryResolutionAgent,
    validator: ValidationAgent,
    correction: CorrectionLoop,
}

impl Session {
    /// Seal an upload into a fresh session. Re-uploading means building a
    /// new session; nothing is merged.
    pub fn new(dataset: LoadedDataset, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            engine: SqlEngine::new(dataset.frame),
            memory: ConversationMemory::new(),
            kind: dataset.kind,
            resolver: QueryResolutionAgent::new(llm.clone()),
            validator: ValidationAgent::new(),
            correction: CorrectionLoop::new(),
            llm,
        }
    }

    pub fn dataset_kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn schema_listing(&self) -> String {
        self.engine.schema_listing()
    }

    /// Answer one question. Never returns an error: failures become a
    /// [`ChatOutcome::Failure`] message, and whatever text the user would see
    /// is appended to memory as the assistant turn.
    pub async fn ask(&mut self, question: &str) -> ChatOutcome {
        let question_id = Uuid::new_v4();
        info!("[{}] Question: {}", question_id, question);

        self.memory.push_user(question);

        let outcome = match self.answer(question).await {
            Ok(outcome) => outcome,
            Err(err) => ChatOutcome::Failure {
                message: format!("Error occurred while answering: {}", err),
            },
        };

        let assistant_text = match &outcome {
            ChatOutcome::Answer { insight, .. } => insight.clone(),
            ChatOutcome::Warning { message, .. } => message.clone(),
            ChatOutcome::Failure { message } => message.clone(),
        };
        self.memory.push_assistant(assistant_text);

        outcome
    }

    async fn answer(&mut self, question: &str) -> Result<ChatOutcome> {
        let schema_listing = self.engine.schema_listing();
        let memory_window = self.memory.window();

        let resolved = self
            .correction
            .run(
                &self.resolver,
                &mut self.engine,
                question,
                &schema_listing,
                &memory_window,
            )
            .await?;

        match self.validator.validate(resolved.table) {
            ValidationOutcome::Valid(table) => {
                let insight = self.interpret(question, &table).await?;
                Ok(ChatOutcome::Answer {
                    sql: resolved.sql,
                    table,
                    insight,
                    truncated_from: None,
                    attempts: resolved.attempts,
                })
            }
            ValidationOutcome::Truncated {
                table,
                original_rows,
            } => {
                let insight = self.interpret(question, &table).await?;
                Ok(ChatOutcome::Answer {
                    sql: resolved.sql,
                    table,
                    insight,
                    truncated_from: Some(original_rows),
                    attempts: resolved.attempts,
                })
            }
            outcome @ (ValidationOutcome::Empty | ValidationOutcome::AllNull) => {
                let message = outcome.warning().unwrap_or_default();
                Ok(ChatOutcome::Warning {
                    sql: resolved.sql,
                    message,
                })
            }
        }
    }

    /// Phrase a validated table as a short business-friendly answer.
    async fn interpret(&self, question: &str, table: &DataFrame) -> Result<String> {
        let prompt = prompts::interpretation_prompt(question, &render_table(table));
        self.llm.generate(&prompt).await
    }

    /// Run the dataset's summary blocks and phrase them as an executive
    /// summary. `None` when the dataset label offers no blocks.
    pub async fn summarize(&mut self) -> Result<Option<String>> {
        let blocks = summary_blocks(self.kind);
        if blocks.is_empty() {
            return Ok(None);
        }

        let mut rendered = Vec::with_capacity(blocks.len());
        for block in blocks {
            let table = self.engine.execute(block.sql)?;
            rendered.push(format!("{}:\n{}", block.title, render_table(&table)));
        }

        let prompt = prompts::summary_prompt(&rendered.join("\n\n"));
        let summary = self.llm.generate(&prompt).await?;
        Ok(Some(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::prepare_frame;
    use async_trait::async_trait;
    use polars::prelude::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<VecDeque<String>>,
        calls: Mutex<usize>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|s| s.to_string()).collect()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> crate::error::Result<String> {
            *self.calls.lock().unwrap() += 1;
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra LLM call"))
        }
    }

    fn sales_session(llm: Arc<dyn LanguageModel>) -> Session {
        let frame = df![
            "Category" => ["Kurta", "Top", "Kurta"],
            "Amount" => ["100", "250", "50"],
            "ship-state" => ["MAHARASHTRA", "KARNATAKA", "MAHARASHTRA"],
            "Status" => ["Shipped", "Shipped", "Cancelled"],
        ]
        .unwrap();
        let dataset = prepare_frame(frame).unwrap();
        assert_eq!(dataset.kind, DatasetKind::Sales);
        Session::new(dataset, llm)
    }

    #[tokio::test]
    async fn answer_flows_through_validation_and_interpretation() {
        let model = ScriptedModel::new(&[
            "SELECT category, SUM(revenue) AS total_revenue FROM sales GROUP BY category",
            "Kurtas lead revenue.",
        ]);
        let mut session = sales_session(model.clone());

        match session.ask("total revenue by category").await {
            ChatOutcome::Answer {
                table,
                insight,
                truncated_from,
                attempts,
                ..
            } => {
                assert_eq!(table.height(), 2);
                assert_eq!(insight, "Kurtas lead revenue.");
                assert_eq!(truncated_from, None);
                assert_eq!(attempts, 1);
            }
            other => panic!("expected answer, got {:?}", other),
        }

        // User turn plus the interpretation as the assistant turn.
        assert_eq!(session.memory().len(), 2);
        assert!(session.memory().window().contains("Kurtas lead revenue."));
    }

    #[tokio::test]
    async fn blocked_query_becomes_failure_message_in_memory() {
        let model = ScriptedModel::new(&["DROP TABLE sales"]);
        let mut session = sales_session(model.clone());

        match session.ask("drop the table").await {
            ChatOutcome::Failure { message } => {
                assert!(message.contains("blocked"));
            }
            other => panic!("expected failure, got {:?}", other),
        }

        // The failure text is part of later prompt context.
        assert!(session.memory().window().contains("blocked"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn empty_result_is_a_soft_warning_without_interpretation() {
        let model = ScriptedModel::new(&["SELECT * FROM sales WHERE 1=0"]);
        let mut session = sales_session(model.clone());

        match session.ask("something unanswerable").await {
            ChatOutcome::Warning { message, .. } => {
                assert!(message.contains("No rows"));
            }
            other => panic!("expected warning, got {:?}", other),
        }

        // No interpretation pass for soft outcomes.
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn summary_runs_sales_blocks_through_the_model() {
        let model = ScriptedModel::new(&["An executive summary."]);
        let mut session = sales_session(model.clone());

        let summary = session.summarize().await.unwrap();
        assert_eq!(summary.as_deref(), Some("An executive summary."));
    }

    #[test]
    fn generic_datasets_offer_no_summary_blocks() {
        assert!(summary_blocks(DatasetKind::Generic).is_empty());
        assert_eq!(summary_blocks(DatasetKind::Sales).len(), 3);
    }
}
