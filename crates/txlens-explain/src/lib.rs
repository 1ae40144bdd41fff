//! txlens-explain crate
//!
//! Turns decoded transfers into semantic actions and sentences: action
//! classification, explanation rendering, flow aggregation and the
//! per-transaction pipeline.

pub mod classify;
pub mod error;
pub mod flows;
pub mod pipeline;
pub mod render;

pub use error::ExplainError;
pub use pipeline::{explain, explain_transaction};
