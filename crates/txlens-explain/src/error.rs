//! Error type of the explanation pipeline.

use thiserror::Error;

/// The only condition the pipeline reports outward. Malformed or unrecognized
/// data inside a transaction never produces an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplainError {
    #[error("transaction {id} not found")]
    NotFound { id: String },
}
