//! Action classification.
//!
//! Order of the produced actions is fixed and consumers rely on it, since
//! explanations are zipped with actions by index:
//! 1. one action per decoded transfer, in decode order
//! 2. one creation summary when objects were created (object ledgers only)
//! 3. one call interaction when the transaction called a target with data

use txlens_data::types::{
    Action, ActionType, LedgerFamily, RawTransaction, Transfer, BATCH_AMOUNT,
};

/// Hex characters of a 4-byte call selector.
const SELECTOR_HEX_LEN: usize = 8;

/// Builds the ordered action list of one transaction.
pub fn classify(tx: &RawTransaction, transfers: &[Transfer], created: usize) -> Vec<Action> {
    let mut actions: Vec<Action> = transfers.iter().map(action_for_transfer).collect();
    actions.extend(creation_summary(&tx.sender, created));
    actions.extend(call_interaction(tx));
    actions
}

/// Maps a transfer 1:1 onto an action; native value counts as a fungible transfer.
pub fn action_for_transfer(transfer: &Transfer) -> Action {
    let (action_type, amount, description) = match transfer {
        Transfer::Native { amount, .. } => (
            ActionType::FungibleTransfer,
            amount.to_string(),
            "native value transfer".to_string(),
        ),
        Transfer::FungibleToken { amount, .. } => (
            ActionType::FungibleTransfer,
            amount.to_string(),
            "fungible token transfer".to_string(),
        ),
        Transfer::NonFungible { amount, .. } => (
            ActionType::NonFungibleTransfer,
            amount.to_string(),
            "non-fungible token transfer".to_string(),
        ),
        Transfer::BatchNonFungible { .. } => (
            ActionType::BatchNonFungibleTransfer,
            BATCH_AMOUNT.to_string(),
            "batch non-fungible token transfer".to_string(),
        ),
    };

    let asset_id = transfer.asset_id();
    Action {
        action_type,
        from: transfer.from().map(str::to_string),
        to: transfer.to().map(str::to_string),
        asset_id: (!asset_id.is_empty()).then(|| asset_id.to_string()),
        token_id: transfer.token_id().map(str::to_string),
        amount: Some(amount),
        method: None,
        description,
    }
}

/// One summary action for `count` created objects; none when nothing was created.
pub fn creation_summary(sender: &str, count: usize) -> Option<Action> {
    if count == 0 {
        return None;
    }
    let noun = if count == 1 { "object" } else { "objects" };
    Some(Action {
        action_type: ActionType::CreationSummary,
        from: Some(sender.to_string()),
        to: None,
        asset_id: None,
        token_id: None,
        amount: Some(count.to_string()),
        method: None,
        description: format!("created {count} {noun}"),
    })
}

/// Contract/package call with non-empty call data; none for plain value moves.
pub fn call_interaction(tx: &RawTransaction) -> Option<Action> {
    let target = tx.target.as_ref()?;
    let call_data = tx.call_data.as_deref().filter(|data| has_call_data(data))?;

    Some(Action {
        action_type: ActionType::CallInteraction,
        from: Some(tx.sender.clone()),
        to: Some(target.clone()),
        asset_id: None,
        token_id: None,
        amount: None,
        method: call_method(tx.family(), call_data),
        description: "contract call".to_string(),
    })
}

fn has_call_data(data: &str) -> bool {
    let trimmed = data.trim();
    !trimmed.strip_prefix("0x").unwrap_or(trimmed).is_empty()
}

/// Selector (`0x` + 8 lowercase hex) on receipt ledgers, the
/// `module::function` name on object ledgers.
fn call_method(family: LedgerFamily, call_data: &str) -> Option<String> {
    match family {
        LedgerFamily::Receipt => {
            let hex = call_data.trim().strip_prefix("0x")?;
            let selector = hex.get(..SELECTOR_HEX_LEN)?;
            selector
                .chars()
                .all(|c| c.is_ascii_hexdigit())
                .then(|| format!("0x{}", selector.to_lowercase()))
        }
        LedgerFamily::Effects => Some(call_data.trim().to_string()),
    }
}
