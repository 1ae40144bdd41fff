//! txlens-data crate
//!
//! Raw ledger records, decoded output types, injectable lookup tables and
//! adapters from chain-reader JSON into [`RawTransaction`].

pub mod ingest;
pub mod lookups;
pub mod types;

pub use ingest::ChainRecord;
pub use lookups::{LedgerProfile, Lookups};
pub use types::{
    Action, ActionType, ExecutionStatus, ExplanationResult, FeeBreakdown, LedgerFamily,
    LedgerRecord, RawEvent, RawObjectChange, RawTransaction, Transfer, TransferKind,
};
