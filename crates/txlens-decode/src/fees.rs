//! Fee resolution for both ledger fee models.
//!
//! Gas-price model:
//! - `execution = gas_used * effective_price`, where the price is the receipt's
//!   effective price, else the fee cap, else the legacy gas price, else zero
//! - `secondary` (rollup settlement fee) is the reported L1 fee, else
//!   `l1_gas_price * l1_gas_used` when both are present, else zero
//! - `total = execution + secondary`
//!
//! Resource-accounting model:
//! - `total = computation + storage - rebate`, kept signed: a rebate larger
//!   than the charged cost yields a negative total.

use alloy::primitives::{I256, U256};
use txlens_data::types::{FeeBreakdown, GasFees, LedgerRecord, ResourceFees};

use crate::units::{parse_integer_or_zero, parse_present};

pub fn resolve_fees(record: &LedgerRecord) -> FeeBreakdown {
    match record {
        LedgerRecord::Receipt(receipt) => resolve_gas_fees(&receipt.fees),
        LedgerRecord::Effects(effects) => resolve_resource_fees(&effects.fees),
    }
}

/// Price per gas unit, by field priority.
pub fn effective_gas_price(fees: &GasFees) -> U256 {
    parse_present(fees.effective_gas_price.as_deref())
        .or_else(|| parse_present(fees.max_fee_per_gas.as_deref()))
        .or_else(|| parse_present(fees.gas_price.as_deref()))
        .unwrap_or(U256::ZERO)
}

/// Settlement cost paid outside the execution layer; `None` when no field reports one.
pub fn settlement_cost(fees: &GasFees) -> Option<U256> {
    if let Some(reported) = parse_present(fees.l1_fee.as_deref()) {
        return Some(reported);
    }
    let price = parse_present(fees.l1_gas_price.as_deref());
    let used = parse_present(fees.l1_gas_used.as_deref());
    match (price, used) {
        (Some(price), Some(used)) => Some(price.saturating_mul(used)),
        (None, None) => None,
        _ => Some(U256::ZERO),
    }
}

pub fn resolve_gas_fees(fees: &GasFees) -> FeeBreakdown {
    let gas_used = parse_integer_or_zero(fees.gas_used.as_deref().unwrap_or_default());
    let execution_cost = gas_used.saturating_mul(effective_gas_price(fees));
    let data_or_storage_cost = settlement_cost(fees);
    let total = execution_cost.saturating_add(data_or_storage_cost.unwrap_or(U256::ZERO));

    FeeBreakdown {
        execution_cost,
        data_or_storage_cost,
        rebate: None,
        total: to_signed(total),
    }
}

pub fn resolve_resource_fees(fees: &ResourceFees) -> FeeBreakdown {
    let computation = parse_integer_or_zero(fees.computation_cost.as_deref().unwrap_or_default());
    let storage = parse_integer_or_zero(fees.storage_cost.as_deref().unwrap_or_default());
    let rebate = parse_integer_or_zero(fees.storage_rebate.as_deref().unwrap_or_default());

    let total = to_signed(computation)
        .saturating_add(to_signed(storage))
        .saturating_sub(to_signed(rebate));

    FeeBreakdown {
        execution_cost: computation,
        data_or_storage_cost: Some(storage),
        rebate: Some(rebate),
        total,
    }
}

/// Converts to signed, saturating at `I256::MAX` for values above 2^255.
fn to_signed(value: U256) -> I256 {
    I256::try_from(value).unwrap_or(I256::MAX)
}
