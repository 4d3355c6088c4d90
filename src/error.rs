
use ndarray_npy::{ReadNpyError, WriteNpyError};

#[derive(Debug, thiserror::Error)]
pub enum AnchorError {
    #[error("k must be at least 2, got {k}")]
    InvalidK { k: usize },
    #[error("only {found} candidate rows pass the document threshold, {required} anchors requested")]
    InsufficientCandidates { found: usize, required: usize },
    #[error("candidate row {row} has a zero or non-finite row sum and cannot be normalized")]
    DegenerateRow { row: usize },
    #[error("type id {id} has no row in a matrix with {rows} rows")]
    TypeOutOfRange { id: usize, rows: usize },
    #[error("non-finite distance while searching for anchor {anchor}")]
    NonFiniteDistance { anchor: usize },
    #[error("cannot project onto {target_dim} dimensions")]
    InvalidProjection { target_dim: usize },
    #[error("token '{0}' is not in the vocabulary")]
    UnknownToken(String),
    #[error("anchor {anchor} has no tokens")]
    EmptyAnchor { anchor: usize },
    #[error("line {line}: '{token}' is not a type id")]
    InvalidDocument { line: usize, token: String },
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    ReadNpy(#[from] ReadNpyError),
    #[error(transparent)]
    WriteNpy(#[from] WriteNpyError),
}

pub type Result<T> = std::result::Result<T, AnchorError>;
