use thiserror::Error;

/// Errors raised by the record store. Schema and palette problems carry
/// user-facing repair hints; the CLI prints them verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(
        "{table} format is incorrect. Missing columns: {}. Expected format: {expected}",
        .missing.join(", ")
    )]
    Schema {
        table: &'static str,
        missing: Vec<String>,
        expected: String,
    },

    #[error("categories.json format is incorrect. {0}")]
    Palette(String),

    #[error("period overlaps an existing activity, nothing was saved")]
    Overlap,

    #[error("period needs a category and must end after it starts")]
    InvalidPeriod,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
