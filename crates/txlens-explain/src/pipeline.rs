//! Per-transaction pipeline: decode, classify, render, price.
//!
//! Both entry points are synchronous and side-effect free apart from tracing.
//! The only failure is a missing transaction.

use txlens_data::lookups::Lookups;
use txlens_data::types::{ExplanationResult, LedgerRecord, RawTransaction};
use txlens_decode::{count_created, decode_transfers, resolve_fees};

use crate::classify::classify;
use crate::error::ExplainError;
use crate::render::{render_all, render_fee};

/// Explains the transaction fetched for `id`.
///
/// `raw` is whatever the chain reader returned; `None` means the ledger has
/// no such transaction.
#[tracing::instrument(skip_all, fields(id = %id))]
pub fn explain(
    id: &str,
    raw: Option<&RawTransaction>,
    lookups: &Lookups,
) -> Result<ExplanationResult, ExplainError> {
    let Some(tx) = raw else {
        tracing::debug!("transaction not found");
        return Err(ExplainError::NotFound { id: id.to_string() });
    };
    Ok(explain_transaction(tx, lookups))
}

/// Runs every stage over a transaction that is known to exist.
pub fn explain_transaction(tx: &RawTransaction, lookups: &Lookups) -> ExplanationResult {
    let family = tx.family();
    let profile = lookups.profile(family);

    let transfers = decode_transfers(tx);
    let created = match &tx.record {
        LedgerRecord::Effects(effects) => count_created(&effects.changes),
        LedgerRecord::Receipt(_) => 0,
    };
    let actions = classify(tx, &transfers, created);
    let explanations = render_all(&actions, lookups, profile);
    let fee_breakdown = resolve_fees(&tx.record);
    let fee_summary = render_fee(&fee_breakdown, profile);

    tracing::debug!(
        id = %tx.id,
        family = ?family,
        transfers = transfers.len(),
        actions = actions.len(),
        created,
        total_fee = %fee_breakdown.total,
        "explained transaction"
    );

    ExplanationResult {
        id: tx.id.clone(),
        family,
        status: tx.status,
        sender: tx.sender.clone(),
        timestamp_ms: tx.timestamp_ms,
        transfers,
        actions,
        fee_breakdown,
        fee_summary,
        explanations,
    }
}
