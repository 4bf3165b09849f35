use thiserror::Error;

pub type BenchlensResult<T> = std::result::Result<T, BenchlensError>;

/// Errors benchlens can have
#[derive(Debug, Error)]
pub enum BenchlensError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Line {line}: expected 3 cache miss counts, found {found}")]
    NotEnoughCounts { line: usize, found: usize },

    #[error("Line {line}: '{token}' is not a valid miss count")]
    BadCount { line: usize, token: String },

    #[error("x axis has {index_len} values but the input has {sample_count} samples")]
    DimensionMismatch {
        index_len: usize,
        sample_count: usize,
    },

    #[error("Record {record}: {found} fields under a {expected} column header")]
    InconsistentColumns {
        record: u64,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
