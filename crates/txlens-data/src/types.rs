//! Type definitions for raw ledger records and decoded explanation output.
//!
//! Numeric fields on the raw side stay as text exactly as the chain reader
//! returned them; they are parsed (and clamped to zero when malformed) by the
//! decode crate. Decoded amounts are `U256` minor units.

use alloy::primitives::{I256, U256};
use serde::{Deserialize, Serialize};

/// Token id carried by batch multi-token transfers, whose id arrays are not decoded.
pub const BATCH_TOKEN_ID: &str = "batch";

/// Amount literal carried by batch transfer actions.
pub const BATCH_AMOUNT: &str = "multiple";

/// Execution outcome reported by the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Transaction executed successfully.
    Success,
    /// Transaction reverted or aborted.
    Failed,
    /// Outcome not reported (e.g. pending, or receipt missing).
    #[default]
    Unknown,
}

impl ExecutionStatus {
    /// Maps receipt status words (`0x1`/`0x0`) and effects status words
    /// (`success`/`failure`) onto a status.
    pub fn from_raw(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "0x1" | "1" | "success" => Self::Success,
            "0x0" | "0" | "failure" | "failed" | "reverted" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

/// Fee-model family of the ledger that produced a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerFamily {
    /// Byte-oriented ledger: event logs with topics, gas-price fee model.
    Receipt,
    /// Object-model ledger: object changes, resource-accounting fee model.
    Effects,
}

/// Ledger-agnostic transaction envelope handed over by the chain reader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction hash or digest.
    pub id: String,
    /// Sender address.
    pub sender: String,
    /// Call target (None for contract creation or plain object transactions).
    #[serde(default)]
    pub target: Option<String>,
    /// Opaque call data: hex input on receipt ledgers, `module::function` on
    /// object ledgers.
    #[serde(default)]
    pub call_data: Option<String>,
    /// Native value attached to the call, in minor units (decimal or hex text).
    #[serde(default)]
    pub value: Option<String>,
    /// Execution outcome.
    #[serde(default)]
    pub status: ExecutionStatus,
    /// Inclusion time in unix milliseconds, when known.
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
    /// Ledger-specific execution record.
    pub record: LedgerRecord,
}

impl RawTransaction {
    pub fn family(&self) -> LedgerFamily {
        self.record.family()
    }
}

/// Execution result in the shape of one of the two ledger families.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum LedgerRecord {
    Receipt(ReceiptRecord),
    Effects(EffectsRecord),
}

impl LedgerRecord {
    pub fn family(&self) -> LedgerFamily {
        match self {
            Self::Receipt(_) => LedgerFamily::Receipt,
            Self::Effects(_) => LedgerFamily::Effects,
        }
    }
}

/// Receipt of a byte-oriented ledger transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    #[serde(default)]
    pub fees: GasFees,
    #[serde(default)]
    pub logs: Vec<RawEvent>,
}

/// Raw gas-price fee inputs (hex or decimal text, as reported).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFees {
    pub gas_used: Option<String>,
    /// Effective gas price from the receipt.
    pub effective_gas_price: Option<String>,
    /// EIP-1559 fee cap from the transaction.
    pub max_fee_per_gas: Option<String>,
    /// Legacy gas price from the transaction.
    pub gas_price: Option<String>,
    /// Settlement (L1 data) fee reported directly by a rollup receipt.
    pub l1_fee: Option<String>,
    pub l1_gas_price: Option<String>,
    pub l1_gas_used: Option<String>,
}

/// Event log entry emitted by a byte-oriented ledger transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Address of the contract that emitted the log.
    pub emitter: String,
    /// Indexed topics (hex with 0x); the first is the event signature.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Non-indexed log data (hex with 0x prefix).
    #[serde(default)]
    pub payload: String,
}

/// Effects of an object-model ledger transaction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectsRecord {
    #[serde(default)]
    pub fees: ResourceFees,
    #[serde(default)]
    pub events: Vec<ObjectEvent>,
    #[serde(default)]
    pub changes: Vec<RawObjectChange>,
}

/// Raw resource-accounting fee inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFees {
    pub computation_cost: Option<String>,
    pub storage_cost: Option<String>,
    pub storage_rebate: Option<String>,
}

/// Domain event emitted by an object-model transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectEvent {
    /// Fully qualified event type (`package::module::Name`).
    pub event_type: String,
    /// Emitting account; stands in for a payload without a sender field.
    #[serde(default)]
    pub sender: Option<String>,
    /// Parsed event fields.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Kind of an object change record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectChangeKind {
    Created,
    Transferred,
    Mutated,
    #[serde(other)]
    Other,
}

/// One object change of an object-model transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObjectChange {
    pub kind: ObjectChangeKind,
    #[serde(default)]
    pub sender: Option<String>,
    /// New owner (created/mutated) or recipient (transferred).
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub object_type: String,
    #[serde(default)]
    pub object_id: String,
}

/// Kind tag of a decoded [`Transfer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferKind {
    Native,
    FungibleToken,
    NonFungible,
    BatchNonFungible,
}

/// Normalized movement of value or objects extracted from execution data.
///
/// Each kind carries only the fields it can have: token ids exist only on
/// the non-fungible kinds, and batch transfers carry no amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transfer {
    Native {
        from: Option<String>,
        to: Option<String>,
        #[serde(serialize_with = "decimal::serialize")]
        amount: U256,
    },
    FungibleToken {
        from: Option<String>,
        to: Option<String>,
        asset_id: String,
        #[serde(serialize_with = "decimal::serialize")]
        amount: U256,
    },
    NonFungible {
        from: Option<String>,
        to: Option<String>,
        asset_id: String,
        token_id: String,
        #[serde(serialize_with = "decimal::serialize")]
        amount: U256,
    },
    BatchNonFungible {
        from: Option<String>,
        to: Option<String>,
        asset_id: String,
        token_id: String,
    },
}

impl Transfer {
    pub fn kind(&self) -> TransferKind {
        match self {
            Self::Native { .. } => TransferKind::Native,
            Self::FungibleToken { .. } => TransferKind::FungibleToken,
            Self::NonFungible { .. } => TransferKind::NonFungible,
            Self::BatchNonFungible { .. } => TransferKind::BatchNonFungible,
        }
    }

    pub fn from(&self) -> Option<&str> {
        match self {
            Self::Native { from, .. }
            | Self::FungibleToken { from, .. }
            | Self::NonFungible { from, .. }
            | Self::BatchNonFungible { from, .. } => from.as_deref(),
        }
    }

    pub fn to(&self) -> Option<&str> {
        match self {
            Self::Native { to, .. }
            | Self::FungibleToken { to, .. }
            | Self::NonFungible { to, .. }
            | Self::BatchNonFungible { to, .. } => to.as_deref(),
        }
    }

    /// Asset identifier; empty for the native asset.
    pub fn asset_id(&self) -> &str {
        match self {
            Self::Native { .. } => "",
            Self::FungibleToken { asset_id, .. }
            | Self::NonFungible { asset_id, .. }
            | Self::BatchNonFungible { asset_id, .. } => asset_id,
        }
    }

    pub fn amount(&self) -> Option<U256> {
        match self {
            Self::Native { amount, .. }
            | Self::FungibleToken { amount, .. }
            | Self::NonFungible { amount, .. } => Some(*amount),
            Self::BatchNonFungible { .. } => None,
        }
    }

    pub fn token_id(&self) -> Option<&str> {
        match self {
            Self::NonFungible { token_id, .. } | Self::BatchNonFungible { token_id, .. } => {
                Some(token_id)
            }
            Self::Native { .. } | Self::FungibleToken { .. } => None,
        }
    }
}

/// Semantic action type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    FungibleTransfer,
    NonFungibleTransfer,
    BatchNonFungibleTransfer,
    CreationSummary,
    CallInteraction,
    /// Any type name this crate does not know (only produced by deserialization).
    #[serde(other)]
    Unrecognized,
}

impl ActionType {
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Self::FungibleTransfer | Self::NonFungibleTransfer | Self::BatchNonFungibleTransfer
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FungibleTransfer => "Transfer",
            Self::NonFungibleTransfer => "NFT transfer",
            Self::BatchNonFungibleTransfer => "Batch NFT transfer",
            Self::CreationSummary => "Objects created",
            Self::CallInteraction => "Contract call",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

/// User-facing classification of one transfer or interaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub token_id: Option<String>,
    /// Minor-unit amount in base 10, a created-object count, or
    /// [`BATCH_AMOUNT`] for batch transfers.
    #[serde(default)]
    pub amount: Option<String>,
    /// Call selector (`0x` + 8 hex) or `module::function` for call interactions.
    #[serde(default)]
    pub method: Option<String>,
    /// Machine-generated, ledger-agnostic description.
    #[serde(default)]
    pub description: String,
}

/// Fee/cost breakdown in native minor units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    #[serde(serialize_with = "decimal::serialize")]
    pub execution_cost: U256,
    #[serde(serialize_with = "decimal::serialize_opt")]
    pub data_or_storage_cost: Option<U256>,
    #[serde(serialize_with = "decimal::serialize_opt")]
    pub rebate: Option<U256>,
    /// Net cost; negative when a storage rebate exceeds the charged cost.
    #[serde(serialize_with = "decimal::serialize_signed")]
    pub total: I256,
}

/// Immutable output of one pipeline invocation.
///
/// `explanations[i]` describes `actions[i]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplanationResult {
    pub id: String,
    pub family: LedgerFamily,
    pub status: ExecutionStatus,
    pub sender: String,
    pub timestamp_ms: Option<u64>,
    pub transfers: Vec<Transfer>,
    pub actions: Vec<Action>,
    pub fee_breakdown: FeeBreakdown,
    pub fee_summary: String,
    pub explanations: Vec<String>,
}

/// Serializes big integers as base-10 strings so JSON consumers never lose precision.
mod decimal {
    use alloy::primitives::{I256, U256};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn serialize_opt<S: Serializer>(
        value: &Option<U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.collect_str(value),
            None => serializer.serialize_none(),
        }
    }

    pub fn serialize_signed<S: Serializer>(
        value: &I256,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_receipt_and_effects_words() {
        assert_eq!(ExecutionStatus::from_raw("0x1"), ExecutionStatus::Success);
        assert_eq!(ExecutionStatus::from_raw("0x0"), ExecutionStatus::Failed);
        assert_eq!(ExecutionStatus::from_raw("success"), ExecutionStatus::Success);
        assert_eq!(ExecutionStatus::from_raw("failure"), ExecutionStatus::Failed);
        assert_eq!(ExecutionStatus::from_raw("pending"), ExecutionStatus::Unknown);
    }

    #[test]
    fn token_id_only_on_non_fungible_kinds() {
        let fungible = Transfer::FungibleToken {
            from: Some("0x01".into()),
            to: Some("0x02".into()),
            asset_id: "0xff".into(),
            amount: U256::from(5),
        };
        let batch = Transfer::BatchNonFungible {
            from: None,
            to: None,
            asset_id: "0xff".into(),
            token_id: BATCH_TOKEN_ID.into(),
        };

        assert_eq!(fungible.token_id(), None);
        assert_eq!(fungible.amount(), Some(U256::from(5)));
        assert_eq!(batch.token_id(), Some("batch"));
        assert_eq!(batch.amount(), None);
        assert_eq!(batch.kind(), TransferKind::BatchNonFungible);
    }

    #[test]
    fn transfer_serializes_amount_as_decimal_string() {
        let transfer = Transfer::Native {
            from: Some("0x01".into()),
            to: Some("0x02".into()),
            amount: U256::from(1_000_000_000_000_000_000u128),
        };
        let json = serde_json::to_value(&transfer).unwrap();
        assert_eq!(json["kind"], "native");
        assert_eq!(json["amount"], "1000000000000000000");
    }

    #[test]
    fn unknown_action_type_deserializes_as_unrecognized() {
        let action: Action = serde_json::from_str(
            r#"{"action_type":"StakeDelegation","from":"0x01","description":"stake"}"#,
        )
        .unwrap();
        assert_eq!(action.action_type, ActionType::Unrecognized);
    }
}
