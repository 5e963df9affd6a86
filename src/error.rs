use thiserror::Error;

/// Error type for source retrieval, table parsing, and aggregation failures.
///
/// Any loader error aborts the whole dataset build; the caller keeps its
/// previous results rather than rendering a partially merged dataset.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source '{section}' is unavailable: {reason}")]
    SourceUnavailable { section: String, reason: String },
    #[error("source '{section}' row {row}: date '{value}' does not match DD/MM/YYYY")]
    MalformedDate {
        section: String,
        row: usize,
        value: String,
    },
    #[error("source '{section}' returned an unreadable table: {source}")]
    TableParse { section: String, source: csv::Error },
    #[error("dataset contains no records")]
    EmptyDataset,
}

pub type Result<T> = std::result::Result<T, PipelineError>;
