//! Validation Agent - classifies a result table and applies the row cap

use polars::prelude::*;
use tracing::warn;

/// Results larger than this are truncated for reporting.
pub const MAX_RESULT_ROWS: usize = 10_000;
/// Rows kept when a result is truncated.
pub const TRUNCATED_ROWS: usize = 1_000;

/// Classified result. `Empty` and `AllNull` are soft outcomes surfaced as
/// warnings; the conversation continues.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    Valid(DataFrame),
    Empty,
    AllNull,
    Truncated {
        table: DataFrame,
        original_rows: usize,
    },
}

impl ValidationOutcome {
    /// Warning text for the soft outcomes.
    pub fn warning(&self) -> Option<String> {
        match self {
            ValidationOutcome::Empty => {
                Some("No rows returned for this request.".to_string())
            }
            ValidationOutcome::AllNull => {
                Some("The result contains only missing values.".to_string())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationAgent;

impl ValidationAgent {
    pub fn new() -> Self {
        Self
    }

    /// Decision order, first match wins: zero rows, all cells null, row cap
    /// exceeded, valid.
    pub fn validate(&self, table: DataFrame) -> ValidationOutcome {
        if table.height() == 0 {
            warn!("Validation: no rows returned");
            return ValidationOutcome::Empty;
        }

        let all_null = table.width() > 0
            && table
                .get_columns()
                .iter()
                .all(|series| series.null_count() == series.len());
        if all_null {
            warn!("Validation: result is entirely null");
            return ValidationOutcome::AllNull;
        }

        let original_rows = table.height();
        if original_rows > MAX_RESULT_ROWS {
            warn!(
                "Validation: {} rows exceeds cap, truncating to {}",
                original_rows, TRUNCATED_ROWS
            );
            return ValidationOutcome::Truncated {
                table: table.head(Some(TRUNCATED_ROWS)),
                original_rows,
            };
        }

        ValidationOutcome::Valid(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_row_table_is_empty() {
        let agent = ValidationAgent::new();
        let table = df!["revenue" => Vec::<f64>::new()].unwrap();
        assert!(matches!(agent.validate(table), ValidationOutcome::Empty));
    }

    #[test]
    fn entirely_null_table_is_all_null() {
        let agent = ValidationAgent::new();
        let table = df![
            "a" => [None::<f64>, None::<f64>],
            "b" => [None::<&str>, None::<&str>],
        ]
        .unwrap();
        assert!(matches!(agent.validate(table), ValidationOutcome::AllNull));
    }

    #[test]
    fn partially_null_table_is_valid() {
        let agent = ValidationAgent::new();
        let table = df!["a" => [Some(1.0), None::<f64>]].unwrap();
        assert!(matches!(agent.validate(table), ValidationOutcome::Valid(_)));
    }

    #[test]
    fn oversized_table_is_truncated_with_original_count() {
        let agent = ValidationAgent::new();
        let values: Vec<i64> = (0..11_000).collect();
        let table = df!["n" => values].unwrap();

        match agent.validate(table) {
            ValidationOutcome::Truncated {
                table,
                original_rows,
            } => {
                assert_eq!(original_rows, 11_000);
                assert_eq!(table.height(), TRUNCATED_ROWS);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn small_clean_table_is_returned_unchanged() {
        let agent = ValidationAgent::new();
        let table = df!["n" => [1i64, 2, 3, 4, 5]].unwrap();
        match agent.validate(table.clone()) {
            ValidationOutcome::Valid(validated) => {
                assert_eq!(validated.height(), 5);
                assert_eq!(validated.get_column_names(), table.get_column_names());
            }
            other => panic!("expected valid, got {:?}", other),
        }
    }
}
