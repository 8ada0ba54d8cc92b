//! Prompt assembly for SQL generation, refinement, summaries and insights
//!
//! Every SQL prompt embeds, verbatim, the schema listing reported by the
//! execution engine, the bounded memory window, and the user question.

/// Fixed rule block for NL-to-SQL generation against the `sales` table.
pub const SQL_RULES: &str = r#"You are a senior data analyst.

Your task is to convert the user's question into a valid SQL query.

Context:
- Table name: sales
- The table schema will be provided as SCHEMA.
- The dataset may represent sales, inventory, expenses, pricing, or other business data.

STRICT RULES (must follow):
- Return ONLY the SQL query text.
- DO NOT include Markdown, backticks, comments, or explanations.
- Return exactly ONE statement.
- Use ONLY column names explicitly listed in SCHEMA.
- NEVER invent column names.
- NEVER use DROP, DELETE, UPDATE, INSERT, ALTER, or TRUNCATE.
- Use aggregate functions ONLY on columns that are clearly numeric in SCHEMA.
- DO NOT cast text columns to numeric types.
- If the question requires a numeric aggregation but no suitable numeric column exists,
  return:
  SELECT * FROM sales WHERE 1=0

GUIDELINES:
- For totals, use SUM on an existing numeric column.
- For counts, use COUNT(*) unless a specific identifier column exists.
- For top-N questions, use ORDER BY with LIMIT.
- For grouping, include only columns present in SCHEMA.
- Prefer simple, readable SQL."#;

/// Fixed rule block for the executive summary pass.
pub const SUMMARY_RULES: &str = r#"You are an executive business analyst.

You will be given aggregated outputs derived from business datasets.
Your task is to produce a concise, executive-level summary.

Rules:
- Base insights strictly on the provided data.
- Do NOT assume missing information.
- Do NOT hallucinate trends, growth, or causation.
- Clearly call out data limitations when present.
- Highlight key patterns, concentrations, and risks.
- Provide 2-4 actionable recommendations only when supported by data.

Tone:
- Professional
- Business-focused
- Non-technical"#;

/// First-attempt SQL generation prompt.
pub fn sql_prompt(schema_listing: &str, memory_window: &str, question: &str) -> String {
    format!(
        r#"{rules}

SCHEMA:
{schema}

Conversation Context (optional):
{memory}

USER QUESTION:
{question}

Return ONLY SQL."#,
        rules = SQL_RULES,
        schema = schema_listing,
        memory = memory_window,
        question = question,
    )
}

/// Refinement prompt: presents the failed statement and the engine's literal
/// error text, asks for one corrected statement against the same schema.
pub fn refine_prompt(
    question: &str,
    schema_listing: &str,
    error_text: &str,
    failed_sql: &str,
) -> String {
    format!(
        r#"The SQL query failed.

FAILED SQL:
{failed}

ERROR:
{error}

Fix the SQL for the user question:
{question}

Use ONLY this schema:
{schema}

Return ONLY corrected SQL."#,
        failed = failed_sql,
        error = error_text,
        question = question,
        schema = schema_listing,
    )
}

/// Interpretation prompt: phrase a validated result table as a short
/// business-friendly answer.
pub fn interpretation_prompt(question: &str, table_text: &str) -> String {
    format!(
        r#"Convert the following table into a short business-friendly answer:

Question: {question}
Result table:
{table}"#,
        question = question,
        table = table_text,
    )
}

/// Executive summary prompt over pre-rendered aggregate blocks.
pub fn summary_prompt(rendered_blocks: &str) -> String {
    format!("{}\n\n{}", SUMMARY_RULES, rendered_blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_prompt_embeds_all_parts_verbatim() {
        let schema = "category String\nrevenue Float64";
        let memory = "user: total revenue by category";
        let question = "and by state?";
        let prompt = sql_prompt(schema, memory, question);

        assert!(prompt.contains(schema));
        assert!(prompt.contains(memory));
        assert!(prompt.contains(question));
        assert!(prompt.contains("SELECT * FROM sales WHERE 1=0"));
    }

    #[test]
    fn refine_prompt_carries_error_and_failed_sql() {
        let prompt = refine_prompt(
            "total revenue",
            "revenue Float64",
            "column foo not found",
            "SELECT foo FROM sales",
        );
        assert!(prompt.contains("column foo not found"));
        assert!(prompt.contains("SELECT foo FROM sales"));
    }
}
