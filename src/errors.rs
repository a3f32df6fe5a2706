use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a combination run. Recoverable conditions (a merged
/// range straddling a copy window, a document with nothing left after the
/// skip rows) are handled in place and never surface here.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error("cannot read source workbook '{path}': {reason}")]
    Input { path: PathBuf, reason: String },

    #[error("first document '{name}' has no rows in the header window")]
    EmptyFirstDocument { name: String },

    #[error("cannot write combined workbook '{path}': {reason}")]
    Persist { path: PathBuf, reason: String },
}
