use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Unsupported file type: {0}. Upload CSV or Excel.")]
    UnsupportedFileType(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Unsafe SQL detected. Query blocked: {0}")]
    UnsafeQuery(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Polars error: {0}")]
    Polars(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for InsightError {
    fn from(err: polars::error::PolarsError) -> Self {
        InsightError::Polars(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
