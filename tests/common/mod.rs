//! Shared test helpers and utilities.
//!
//! Provides factory functions for raw ledger transactions and fixture
//! records with sensible defaults.

#![allow(dead_code)]

use txlens_data::lookups::{AssetRegistry, Lookups, MethodRegistry, NameRegistry};
use txlens_data::types::{
    EffectsRecord, ExecutionStatus, GasFees, LedgerRecord, RawEvent, RawTransaction,
    ReceiptRecord, ResourceFees,
};
use txlens_data::ChainRecord;
use txlens_decode::events::{TRANSFER_BATCH_TOPIC0, TRANSFER_SINGLE_TOPIC0, TRANSFER_TOPIC0};

pub const ALICE: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
pub const BOB: &str = "0x70997970c51812e339d9b73b0245ad59e15ebbf9";
pub const OPERATOR: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";
pub const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
pub const NFT: &str = "0xbc4ca0eda7647a8ab7c2061c2e118a18a936f13d";

pub const EVM_SWAP_JSON: &str = include_str!("../fixtures/evm_swap.json");
pub const SUI_MINT_JSON: &str = include_str!("../fixtures/sui_mint.json");
pub const EVM_MISSING_JSON: &str = include_str!("../fixtures/evm_missing.json");
pub const LOOKUPS_JSON: &str = include_str!("../fixtures/lookups.json");

/// Left-pads an address into a 32-byte topic word.
pub fn topic(address: &str) -> String {
    format!("0x{:0>64}", address.trim_start_matches("0x"))
}

/// Encodes values as consecutive 32-byte ABI words.
pub fn words(values: &[u128]) -> String {
    let body: String = values.iter().map(|v| format!("{v:064x}")).collect();
    format!("0x{body}")
}

/// ERC-20 `Transfer` log (three topics, amount in data).
pub fn erc20_log(token: &str, from: &str, to: &str, amount: u128) -> RawEvent {
    RawEvent {
        emitter: token.to_string(),
        topics: vec![TRANSFER_TOPIC0.to_string(), topic(from), topic(to)],
        payload: words(&[amount]),
    }
}

/// ERC-721 `Transfer` log (four topics, token id indexed).
pub fn erc721_log(collection: &str, from: &str, to: &str, token_id: u128) -> RawEvent {
    RawEvent {
        emitter: collection.to_string(),
        topics: vec![
            TRANSFER_TOPIC0.to_string(),
            topic(from),
            topic(to),
            format!("0x{token_id:064x}"),
        ],
        payload: "0x".to_string(),
    }
}

/// ERC-1155 `TransferSingle` log.
pub fn erc1155_single_log(
    collection: &str,
    from: &str,
    to: &str,
    id: u128,
    value: u128,
) -> RawEvent {
    RawEvent {
        emitter: collection.to_string(),
        topics: vec![
            TRANSFER_SINGLE_TOPIC0.to_string(),
            topic(OPERATOR),
            topic(from),
            topic(to),
        ],
        payload: words(&[id, value]),
    }
}

/// ERC-1155 `TransferBatch` log; the arrays are not inspected by the decoder.
pub fn erc1155_batch_log(collection: &str, from: &str, to: &str) -> RawEvent {
    RawEvent {
        emitter: collection.to_string(),
        topics: vec![
            TRANSFER_BATCH_TOPIC0.to_string(),
            topic(OPERATOR),
            topic(from),
            topic(to),
        ],
        payload: words(&[0x40, 0xa0, 1, 7, 1, 3]),
    }
}

/// Receipt-ledger transaction with the given logs and a 21000 x 1 gwei fee.
pub fn receipt_tx(logs: Vec<RawEvent>) -> RawTransaction {
    RawTransaction {
        id: "0x9f2c".to_string(),
        sender: ALICE.to_string(),
        target: Some(USDC.to_string()),
        call_data: Some("0xa9059cbb".to_string()),
        value: Some("0x0".to_string()),
        status: ExecutionStatus::Success,
        timestamp_ms: Some(1_708_617_600_000), // 2024-02-22T16:00:00Z
        record: LedgerRecord::Receipt(ReceiptRecord {
            fees: GasFees {
                gas_used: Some("21000".to_string()),
                effective_gas_price: Some("1000000000".to_string()),
                ..Default::default()
            },
            logs,
        }),
    }
}

/// Object-ledger transaction with the given effects record.
pub fn effects_tx(effects: EffectsRecord) -> RawTransaction {
    RawTransaction {
        id: "HZ4pVq1aZ3b".to_string(),
        sender: ALICE.to_string(),
        target: None,
        call_data: None,
        value: None,
        status: ExecutionStatus::Success,
        timestamp_ms: None,
        record: LedgerRecord::Effects(effects),
    }
}

pub fn resource_fees(computation: &str, storage: &str, rebate: &str) -> ResourceFees {
    ResourceFees {
        computation_cost: Some(computation.to_string()),
        storage_cost: Some(storage.to_string()),
        storage_rebate: Some(rebate.to_string()),
    }
}

/// Lookups with USDC at 6 decimals and the `transfer` selector.
pub fn test_lookups() -> Lookups {
    Lookups::new(
        AssetRegistry::new().with(USDC, "USDC", 6),
        NameRegistry::new(),
        MethodRegistry::new().with("0xa9059cbb", "transfer"),
    )
}

/// Parses a fixture chain record.
///
/// # Panics
/// Panics if the fixture is not a valid chain record.
pub fn chain_record(json: &str) -> ChainRecord {
    serde_json::from_str(json).expect("fixture should be a valid chain record")
}
