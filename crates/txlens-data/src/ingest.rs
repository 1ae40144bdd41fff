//! Chain-reader JSON adapters.
//!
//! Maps the JSON shapes returned by ledger nodes onto [`RawTransaction`]:
//! `eth_getTransactionByHash` + `eth_getTransactionReceipt` for receipt
//! ledgers and `sui_getTransactionBlock` (with effects, events, object changes
//! and input shown) for object ledgers. No transport happens here; callers pass
//! the already-fetched documents.
//!
//! Structs are lenient: every numeric field is optional text, and shape
//! details the pipeline does not need are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::types::{
    EffectsRecord, ExecutionStatus, GasFees, LedgerRecord, ObjectChangeKind, ObjectEvent,
    RawEvent, RawObjectChange, RawTransaction, ReceiptRecord, ResourceFees,
};

/// Transaction object from `eth_getTransactionByHash`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthTransaction {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub from: String,
    pub to: Option<String>,
    pub input: Option<String>,
    pub value: Option<String>,
    pub gas_price: Option<String>,
    pub max_fee_per_gas: Option<String>,
}

/// Receipt object from `eth_getTransactionReceipt`, including rollup L1 fee fields.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthReceipt {
    pub status: Option<String>,
    pub gas_used: Option<String>,
    pub effective_gas_price: Option<String>,
    #[serde(default)]
    pub logs: Vec<EthLog>,
    pub l1_fee: Option<String>,
    pub l1_gas_price: Option<String>,
    pub l1_gas_used: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EthLog {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}

/// Response of `sui_getTransactionBlock`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiTransactionBlock {
    #[serde(default)]
    pub digest: String,
    pub transaction: Option<SuiTransactionEnvelope>,
    pub effects: Option<SuiEffects>,
    #[serde(default)]
    pub events: Vec<SuiEvent>,
    #[serde(default)]
    pub object_changes: Vec<SuiObjectChange>,
    pub timestamp_ms: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SuiTransactionEnvelope {
    pub data: Option<SuiTransactionData>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SuiTransactionData {
    #[serde(default)]
    pub sender: String,
    /// Transaction kind; programmable transactions list their commands here.
    #[serde(default)]
    pub transaction: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEffects {
    pub status: Option<SuiStatus>,
    pub gas_used: Option<SuiGasCost>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SuiStatus {
    #[serde(default)]
    pub status: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiGasCost {
    pub computation_cost: Option<String>,
    pub storage_cost: Option<String>,
    pub storage_rebate: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    pub sender: Option<String>,
    #[serde(default)]
    pub parsed_json: Value,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectChange {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub sender: Option<String>,
    #[serde(default)]
    pub owner: Value,
    #[serde(default)]
    pub recipient: Value,
    #[serde(default)]
    pub object_type: String,
    #[serde(default)]
    pub object_id: String,
}

/// One fetched chain record, tagged by ledger.
///
/// A `null` transaction/block means the chain reader found nothing.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "ledger", rename_all = "snake_case")]
pub enum ChainRecord {
    Evm {
        /// Identifier the caller asked for.
        #[serde(default)]
        id: String,
        transaction: Option<EthTransaction>,
        #[serde(default)]
        receipt: Option<EthReceipt>,
        /// Block timestamp in unix seconds, when the reader fetched the block.
        #[serde(default)]
        block_timestamp: Option<u64>,
    },
    Sui {
        #[serde(default)]
        id: String,
        block: Option<SuiTransactionBlock>,
    },
}

impl ChainRecord {
    /// Identifier of the requested transaction, for not-found reporting.
    pub fn requested_id(&self) -> &str {
        match self {
            Self::Evm {
                id, transaction, ..
            } => match transaction {
                Some(tx) if id.is_empty() => &tx.hash,
                _ => id,
            },
            Self::Sui { id, block } => match block {
                Some(block) if id.is_empty() => &block.digest,
                _ => id,
            },
        }
    }

    /// Converts into a raw transaction; `None` when the reader found nothing.
    pub fn into_raw(self) -> Option<RawTransaction> {
        match self {
            Self::Evm {
                transaction,
                receipt,
                block_timestamp,
                ..
            } => transaction.map(|tx| {
                let mut raw = from_eth_rpc(&tx, receipt.as_ref());
                raw.timestamp_ms = block_timestamp.map(|secs| secs.saturating_mul(1000));
                raw
            }),
            Self::Sui { block, .. } => block.map(|block| from_sui_rpc(&block)),
        }
    }
}

/// Builds a receipt-ledger transaction from a transaction and (optional) receipt.
///
/// Without a receipt the status is unknown, no logs are known and, with no
/// gas used, the execution cost is zero.
pub fn from_eth_rpc(tx: &EthTransaction, receipt: Option<&EthReceipt>) -> RawTransaction {
    let default_receipt = EthReceipt::default();
    let receipt = receipt.unwrap_or(&default_receipt);

    let fees = GasFees {
        gas_used: receipt.gas_used.clone(),
        effective_gas_price: receipt.effective_gas_price.clone(),
        max_fee_per_gas: tx.max_fee_per_gas.clone(),
        gas_price: tx.gas_price.clone(),
        l1_fee: receipt.l1_fee.clone(),
        l1_gas_price: receipt.l1_gas_price.clone(),
        l1_gas_used: receipt.l1_gas_used.clone(),
    };

    let logs = receipt
        .logs
        .iter()
        .map(|log| RawEvent {
            emitter: log.address.to_lowercase(),
            topics: log.topics.clone(),
            payload: log.data.clone(),
        })
        .collect();

    RawTransaction {
        id: tx.hash.clone(),
        sender: tx.from.to_lowercase(),
        target: tx.to.as_ref().map(|to| to.to_lowercase()),
        call_data: tx.input.clone(),
        value: tx.value.clone(),
        status: receipt
            .status
            .as_deref()
            .map(ExecutionStatus::from_raw)
            .unwrap_or_default(),
        timestamp_ms: None,
        record: LedgerRecord::Receipt(ReceiptRecord { fees, logs }),
    }
}

/// Builds an object-ledger transaction from a transaction block response.
pub fn from_sui_rpc(block: &SuiTransactionBlock) -> RawTransaction {
    let data = block
        .transaction
        .as_ref()
        .and_then(|envelope| envelope.data.as_ref());
    let sender = data.map(|data| data.sender.clone()).unwrap_or_default();
    let move_call = data.and_then(|data| first_move_call(&data.transaction));

    let (status, fees) = match &block.effects {
        Some(effects) => (
            effects
                .status
                .as_ref()
                .map(|status| ExecutionStatus::from_raw(&status.status))
                .unwrap_or_default(),
            effects
                .gas_used
                .as_ref()
                .map(|gas| ResourceFees {
                    computation_cost: gas.computation_cost.clone(),
                    storage_cost: gas.storage_cost.clone(),
                    storage_rebate: gas.storage_rebate.clone(),
                })
                .unwrap_or_default(),
        ),
        None => (ExecutionStatus::Unknown, ResourceFees::default()),
    };

    let events = block
        .events
        .iter()
        .map(|event| ObjectEvent {
            event_type: event.event_type.clone(),
            sender: event.sender.clone(),
            payload: event.parsed_json.clone(),
        })
        .collect();

    let changes = block.object_changes.iter().map(object_change).collect();

    RawTransaction {
        id: block.digest.clone(),
        sender,
        target: move_call.as_ref().map(|(package, _)| package.clone()),
        call_data: move_call.map(|(_, function)| function),
        value: None,
        status,
        timestamp_ms: block
            .timestamp_ms
            .as_deref()
            .and_then(|ms| ms.trim().parse().ok()),
        record: LedgerRecord::Effects(EffectsRecord {
            fees,
            events,
            changes,
        }),
    }
}

/// First `MoveCall` command of a programmable transaction as
/// `(package, "module::function")`.
fn first_move_call(kind: &Value) -> Option<(String, String)> {
    kind.get("transactions")?
        .as_array()?
        .iter()
        .find_map(|command| command.get("MoveCall"))
        .and_then(|call| {
            let package = call.get("package")?.as_str()?;
            let module = call.get("module")?.as_str()?;
            let function = call.get("function")?.as_str()?;
            Some((package.to_string(), format!("{module}::{function}")))
        })
}

fn object_change(change: &SuiObjectChange) -> RawObjectChange {
    let kind = match change.kind.as_str() {
        "created" => ObjectChangeKind::Created,
        "transferred" => ObjectChangeKind::Transferred,
        "mutated" => ObjectChangeKind::Mutated,
        _ => ObjectChangeKind::Other,
    };
    let owner = match kind {
        ObjectChangeKind::Transferred => owner_address(&change.recipient),
        _ => owner_address(&change.owner),
    };

    RawObjectChange {
        kind,
        sender: change.sender.clone(),
        owner,
        object_type: change.object_type.clone(),
        object_id: change.object_id.clone(),
    }
}

/// Address of an `AddressOwner`/`ObjectOwner`; shared and immutable owners have none.
fn owner_address(owner: &Value) -> Option<String> {
    owner
        .get("AddressOwner")
        .or_else(|| owner.get("ObjectOwner"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
