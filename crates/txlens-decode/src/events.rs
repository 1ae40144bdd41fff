//! Transfer extraction from receipt logs and object-ledger effects.
//!
//! ## Topic-count disambiguation
//!
//! ERC-20 and ERC-721 share the `Transfer(address,address,uint256)` signature.
//! They differ only in whether the third argument is indexed: fungible
//! transfers carry 3 topics and put the amount in the payload, non-fungible
//! transfers carry 4 topics with the token id in the last one. The topic count
//! is therefore the only discriminator, and each match yields a distinct
//! [`Transfer`] variant.

use alloy::primitives::U256;
use serde_json::{Map, Value};
use tracing::trace;
use txlens_data::types::{
    EffectsRecord, LedgerRecord, ObjectChangeKind, ObjectEvent, RawEvent, RawObjectChange,
    RawTransaction, Transfer, BATCH_TOKEN_ID,
};

use crate::units::{parse_integer_or_zero, try_parse_integer};

/// `keccak256("Transfer(address,address,uint256)")`, shared by ERC-20 and ERC-721.
pub const TRANSFER_TOPIC0: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// `keccak256("TransferSingle(address,address,address,uint256,uint256)")` (ERC-1155).
pub const TRANSFER_SINGLE_TOPIC0: &str =
    "0xc3d58168c5ae7397731d063d5bbf3d657854427343f4c083240f7aacaa2d0f62";

/// `keccak256("TransferBatch(address,address,address,uint256[],uint256[])")` (ERC-1155).
pub const TRANSFER_BATCH_TOPIC0: &str =
    "0x4a39dc06d4c0dbc64b70af90fd698a233a518aa5d07e595d983b8c0526c8f7fb";

/// Hex characters in one 32-byte ABI word.
const WORD_HEX_LEN: usize = 64;

/// Hex characters in a 20-byte address.
const ADDRESS_HEX_LEN: usize = 40;

/// Decodes every transfer of a transaction, in emission order.
pub fn decode_transfers(tx: &RawTransaction) -> Vec<Transfer> {
    match &tx.record {
        LedgerRecord::Receipt(receipt) => {
            let mut transfers: Vec<Transfer> = native_transfer(tx).into_iter().collect();
            transfers.extend(decode_logs(&receipt.logs));
            transfers
        }
        LedgerRecord::Effects(effects) => decode_effects(effects, &tx.sender),
    }
}

/// Native value attached to a call: sender -> target, when non-zero.
pub fn native_transfer(tx: &RawTransaction) -> Option<Transfer> {
    let amount = parse_integer_or_zero(tx.value.as_deref()?);
    let to = tx.target.clone()?;
    if amount.is_zero() {
        return None;
    }
    Some(Transfer::Native {
        from: Some(tx.sender.clone()),
        to: Some(to),
        amount,
    })
}

pub fn decode_logs(logs: &[RawEvent]) -> Vec<Transfer> {
    logs.iter().filter_map(decode_log).collect()
}

/// Decodes one log into a transfer; `None` for any other event or shape.
pub fn decode_log(log: &RawEvent) -> Option<Transfer> {
    let signature = log.topics.first()?;
    let topics = log.topics.len();
    let asset_id = log.emitter.to_lowercase();

    if signature.eq_ignore_ascii_case(TRANSFER_TOPIC0) {
        return match topics {
            3 => Some(Transfer::FungibleToken {
                from: Some(topic_address(&log.topics[1])),
                to: Some(topic_address(&log.topics[2])),
                asset_id,
                amount: payload_word(&log.payload, 0),
            }),
            4 => Some(Transfer::NonFungible {
                from: Some(topic_address(&log.topics[1])),
                to: Some(topic_address(&log.topics[2])),
                asset_id,
                token_id: topic_word(&log.topics[3]).to_string(),
                amount: U256::from(1u8),
            }),
            _ => {
                trace!(topics, emitter = %log.emitter, "skipping Transfer log with unexpected topic count");
                None
            }
        };
    }

    // ERC-1155 topics: [signature, operator, from, to]
    if topics == 4 && signature.eq_ignore_ascii_case(TRANSFER_SINGLE_TOPIC0) {
        return Some(Transfer::NonFungible {
            from: Some(topic_address(&log.topics[2])),
            to: Some(topic_address(&log.topics[3])),
            asset_id,
            token_id: payload_word(&log.payload, 0).to_string(),
            amount: payload_word(&log.payload, 1),
        });
    }

    // Id/value arrays are not decoded; one synthetic transfer stands for the batch.
    if topics == 4 && signature.eq_ignore_ascii_case(TRANSFER_BATCH_TOPIC0) {
        return Some(Transfer::BatchNonFungible {
            from: Some(topic_address(&log.topics[2])),
            to: Some(topic_address(&log.topics[3])),
            asset_id,
            token_id: BATCH_TOKEN_ID.to_string(),
        });
    }

    trace!(signature = %signature, topics, "ignoring unrecognized log");
    None
}

/// Address held in the low 20 bytes of a 32-byte topic word.
pub fn topic_address(topic: &str) -> String {
    let hex = topic.strip_prefix("0x").unwrap_or(topic);
    let low = hex
        .get(hex.len().saturating_sub(ADDRESS_HEX_LEN)..)
        .unwrap_or(hex);
    format!("0x{:0>40}", low.to_lowercase())
}

/// Integer held in a topic word, read as hex with or without the `0x` prefix.
pub fn topic_word(topic: &str) -> U256 {
    payload_word(topic, 0)
}

/// Big-endian 32-byte word `index` of a hex payload; zero when absent or malformed.
pub fn payload_word(payload: &str, index: usize) -> U256 {
    let hex = payload.strip_prefix("0x").unwrap_or(payload);
    let start = index * WORD_HEX_LEN;
    if start >= hex.len() {
        return U256::ZERO;
    }
    let end = hex.len().min(start + WORD_HEX_LEN);
    match hex.get(start..end) {
        Some(word) => parse_integer_or_zero(&format!("0x{word}")),
        None => U256::ZERO,
    }
}

/// Transfers of an object-ledger transaction: transfer-shaped events first,
/// then non-coin objects handed to a new owner.
pub fn decode_effects(effects: &EffectsRecord, sender: &str) -> Vec<Transfer> {
    let mut transfers: Vec<Transfer> = effects
        .events
        .iter()
        .filter_map(decode_object_event)
        .collect();
    transfers.extend(
        effects
            .changes
            .iter()
            .filter_map(|change| transferred_object(change, sender)),
    );
    transfers
}

/// Reads a transfer-shaped event, defaulting any missing field.
///
/// An event qualifies when its payload carries both an amount and a
/// recipient, or when its type name mentions a transfer and the payload has
/// at least one of the two. A missing sender falls back to the event's own
/// sender, a missing asset type means the native coin, a missing amount is zero.
pub fn decode_object_event(event: &ObjectEvent) -> Option<Transfer> {
    let empty = Map::new();
    let fields = event.payload.as_object().unwrap_or(&empty);
    let type_name = event
        .event_type
        .split('<')
        .next()
        .and_then(|path| path.rsplit("::").next())
        .unwrap_or_default();
    let has_amount = fields.contains_key("amount");
    let recipient = string_field(fields, &["recipient", "to"]);
    let named_transfer = type_name.to_ascii_lowercase().contains("transfer");

    let qualifies = (has_amount && recipient.is_some())
        || (named_transfer && (has_amount || recipient.is_some()));
    if !qualifies {
        trace!(event_type = %event.event_type, "ignoring non-transfer event");
        return None;
    }

    Some(Transfer::FungibleToken {
        from: string_field(fields, &["sender", "from"]).or_else(|| event.sender.clone()),
        to: recipient,
        asset_id: string_field(fields, &["coin_type", "coinType", "asset_type"]).unwrap_or_default(),
        amount: fields.get("amount").map(json_integer).unwrap_or(U256::ZERO),
    })
}

/// A non-coin object moved to a recipient becomes a non-fungible transfer.
fn transferred_object(change: &RawObjectChange, sender: &str) -> Option<Transfer> {
    if change.kind != ObjectChangeKind::Transferred || is_coin_type(&change.object_type) {
        return None;
    }
    Some(Transfer::NonFungible {
        from: Some(change.sender.clone().unwrap_or_else(|| sender.to_string())),
        to: change.owner.clone(),
        asset_id: change.object_type.clone(),
        token_id: change.object_id.clone(),
        amount: U256::from(1u8),
    })
}

/// Number of objects created by the transaction.
pub fn count_created(changes: &[RawObjectChange]) -> usize {
    changes
        .iter()
        .filter(|change| change.kind == ObjectChangeKind::Created)
        .count()
}

fn is_coin_type(object_type: &str) -> bool {
    object_type.contains("::coin::Coin<")
}

fn string_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn json_integer(value: &Value) -> U256 {
    match value {
        Value::String(text) => parse_integer_or_zero(text),
        Value::Number(number) => number
            .as_u64()
            .map(U256::from)
            .or_else(|| try_parse_integer(&number.to_string()))
            .or_else(|| {
                // Integers past u64 arrive as floats; exact up to 2^53.
                number
                    .as_f64()
                    .filter(|value| *value >= 0.0 && value.fract() == 0.0)
                    .map(|value| U256::from(value as u128))
            })
            .unwrap_or(U256::ZERO),
        _ => U256::ZERO,
    }
}
