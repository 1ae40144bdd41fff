//! Natural-language rendering of actions and fees.
//!
//! Rendering is total: absent parties read as `unknown`, unlisted assets fall
//! back to the ledger profile's generic symbol and decimals, and action types
//! this module does not know render as a fixed literal.

use alloy::primitives::U256;
use txlens_data::lookups::{LedgerProfile, Lookups};
use txlens_data::types::{Action, ActionType, FeeBreakdown};
use txlens_decode::units::{
    format_signed_units, format_units, format_units_str, try_parse_integer,
};

pub const UNKNOWN_PARTY: &str = "unknown";
pub const UNRECOGNIZED_ACTION: &str = "Unrecognized action";
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Identifiers at most this long are shown in full.
const SHORT_FORM_MAX: usize = 13;

/// `0x1234...abcd` form of a long identifier.
pub fn shorten_address(address: &str) -> String {
    if address.len() <= SHORT_FORM_MAX || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Resolved name, else shortened address, else `unknown`.
pub fn display_name(address: Option<&str>, lookups: &Lookups) -> String {
    match address.map(str::trim).filter(|a| !a.is_empty()) {
        Some(address) => lookups
            .resolve_name(address)
            .unwrap_or_else(|| shorten_address(address)),
        None => UNKNOWN_PARTY.to_string(),
    }
}

/// Symbol and decimals of an asset; an empty or absent id is the native asset.
pub fn asset_units(
    asset_id: Option<&str>,
    lookups: &Lookups,
    profile: &LedgerProfile,
) -> (String, u8) {
    match asset_id.filter(|id| !id.is_empty()) {
        None => (profile.native_symbol.clone(), profile.native_decimals),
        Some(id) => lookups
            .assets
            .get(id)
            .map(|asset| (asset.symbol.clone(), asset.decimals))
            .unwrap_or_else(|| (profile.unlisted_symbol.clone(), profile.unlisted_decimals)),
    }
}

/// Collection label of a non-fungible asset: a known name, a listed symbol,
/// the `module::Type` part of an object type, or a shortened address.
fn collection_name(asset_id: Option<&str>, lookups: &Lookups) -> String {
    let Some(id) = asset_id.filter(|id| !id.is_empty()) else {
        return "an unknown collection".to_string();
    };
    if let Some(name) = lookups.resolve_name(id) {
        return name;
    }
    if let Some(asset) = lookups.assets.get(id) {
        return asset.symbol.clone();
    }
    if id.contains("::") {
        let base = id.split('<').next().unwrap_or(id);
        return base.splitn(2, "::").nth(1).unwrap_or(base).to_string();
    }
    shorten_address(id)
}

fn token_label(token_id: Option<&str>) -> String {
    match token_id {
        Some(id) if id.starts_with("0x") => format!("#{}", shorten_address(id)),
        Some(id) => format!("#{id}"),
        None => "#?".to_string(),
    }
}

fn is_zero_address(address: Option<&str>) -> bool {
    address.is_some_and(|a| a.eq_ignore_ascii_case(ZERO_ADDRESS))
}

/// Renders one action as a sentence.
pub fn render(action: &Action, lookups: &Lookups, profile: &LedgerProfile) -> String {
    let from = display_name(action.from.as_deref(), lookups);
    let to = display_name(action.to.as_deref(), lookups);

    match action.action_type {
        ActionType::FungibleTransfer => {
            let (symbol, decimals) = asset_units(action.asset_id.as_deref(), lookups, profile);
            let amount = action
                .amount
                .as_deref()
                .map(|raw| format_units_str(raw, decimals))
                .unwrap_or_else(|| "some".to_string());

            if is_zero_address(action.from.as_deref()) {
                format!("Minted {amount} {symbol} to {to}")
            } else if is_zero_address(action.to.as_deref()) {
                format!("{from} burned {amount} {symbol}")
            } else {
                format!("{from} sent {amount} {symbol} to {to}")
            }
        }
        ActionType::NonFungibleTransfer => {
            let collection = collection_name(action.asset_id.as_deref(), lookups);
            let token = token_label(action.token_id.as_deref());
            let quantity = match action.amount.as_deref() {
                Some(raw) if try_parse_integer(raw).is_some_and(|n| n > U256::from(1u8)) => {
                    format!("{} of ", format_units_str(raw, 0))
                }
                _ => String::new(),
            };

            if is_zero_address(action.from.as_deref()) {
                format!("Minted {quantity}{collection} {token} to {to}")
            } else {
                format!("{from} transferred {quantity}{collection} {token} to {to}")
            }
        }
        ActionType::BatchNonFungibleTransfer => {
            let collection = collection_name(action.asset_id.as_deref(), lookups);
            format!("{from} transferred multiple {collection} tokens to {to}")
        }
        ActionType::CreationSummary => {
            let count = action.amount.as_deref().unwrap_or("0");
            let noun = if count == "1" { "object" } else { "objects" };
            format!("{from} created {count} new {noun}")
        }
        ActionType::CallInteraction => match action.method.as_deref() {
            Some(method) => {
                let name = lookups.methods.get(method).unwrap_or(method);
                format!("{from} called {name} on {to}")
            }
            None => format!("{from} interacted with {to}"),
        },
        ActionType::Unrecognized => UNRECOGNIZED_ACTION.to_string(),
    }
}

/// One sentence per action, same order.
pub fn render_all(
    actions: &[Action],
    lookups: &Lookups,
    profile: &LedgerProfile,
) -> Vec<String> {
    actions
        .iter()
        .map(|action| render(action, lookups, profile))
        .collect()
}

/// Fee sentence in the native asset, with the breakdown the ledger reports.
pub fn render_fee(fee: &FeeBreakdown, profile: &LedgerProfile) -> String {
    let decimals = profile.native_decimals;
    let symbol = &profile.native_symbol;
    let total = format_signed_units(fee.total, decimals);
    let units = |value: U256| format_units(value, decimals);

    match (fee.data_or_storage_cost, fee.rebate) {
        (Some(storage), Some(rebate)) => format!(
            "Fee: {total} {symbol} (computation {}, storage {}, rebate {})",
            units(fee.execution_cost),
            units(storage),
            units(rebate)
        ),
        (Some(settlement), None) => format!(
            "Fee: {total} {symbol} (execution {}, settlement {})",
            units(fee.execution_cost),
            units(settlement)
        ),
        _ => format!("Fee: {total} {symbol}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::I256;
    use txlens_data::lookups::{AssetRegistry, MethodRegistry, NameRegistry};

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";
    const TOKEN: &str = "0x00000000000000000000000000000000000000ff";

    fn lookups() -> Lookups {
        Lookups::new(
            AssetRegistry::new().with(TOKEN, "USDC", 6),
            NameRegistry::new().with(BOB, "Treasury"),
            MethodRegistry::new().with("0xa9059cbb", "transfer"),
        )
    }

    fn action(action_type: ActionType) -> Action {
        Action {
            action_type,
            from: Some(ALICE.into()),
            to: Some(BOB.into()),
            asset_id: None,
            token_id: None,
            amount: None,
            method: None,
            description: String::new(),
        }
    }

    #[test]
    fn shortens_long_identifiers_only() {
        assert_eq!(shorten_address(ALICE), "0x1111...1111");
        assert_eq!(shorten_address("0xabc"), "0xabc");
    }

    #[test]
    fn absent_party_renders_unknown() {
        assert_eq!(display_name(None, &lookups()), "unknown");
        assert_eq!(display_name(Some(""), &lookups()), "unknown");
        assert_eq!(display_name(Some(BOB), &lookups()), "Treasury");
    }

    #[test]
    fn fungible_transfer_uses_symbol_and_decimals() {
        let mut transfer = action(ActionType::FungibleTransfer);
        transfer.asset_id = Some(TOKEN.to_uppercase().replacen("0X", "0x", 1));
        transfer.amount = Some("1500000".into());

        let sentence = render(&transfer, &lookups(), &LedgerProfile::receipt());
        assert_eq!(sentence, "0x1111...1111 sent 1.5 USDC to Treasury");
    }

    #[test]
    fn unlisted_and_native_assets_use_profile_defaults() {
        let mut unlisted = action(ActionType::FungibleTransfer);
        unlisted.asset_id = Some("0x00000000000000000000000000000000000000aa".into());
        unlisted.amount = Some("2000000000000000000".into());
        assert_eq!(
            render(&unlisted, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 sent 2 tokens to Treasury"
        );
        assert_eq!(
            render(&unlisted, &lookups(), &LedgerProfile::effects()),
            "0x1111...1111 sent 2,000,000,000 coins to Treasury"
        );

        let mut native = action(ActionType::FungibleTransfer);
        native.amount = Some("250000000000000000".into());
        assert_eq!(
            render(&native, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 sent 0.25 ETH to Treasury"
        );
    }

    #[test]
    fn long_form_coin_type_renders_listed_symbol() {
        let mut transfer = action(ActionType::FungibleTransfer);
        transfer.asset_id = Some(format!("0x{:0>64}::sui::SUI", "2"));
        transfer.amount = Some("2500000000".into());
        assert_eq!(
            render(&transfer, &Lookups::mainnet(), &LedgerProfile::effects()),
            "0x1111...1111 sent 2.5 SUI to 0x2222...2222"
        );
    }

    #[test]
    fn malformed_amount_passes_through() {
        let mut transfer = action(ActionType::FungibleTransfer);
        transfer.amount = Some("lots".into());
        assert_eq!(
            render(&transfer, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 sent lots ETH to Treasury"
        );
    }

    #[test]
    fn mint_and_burn_wording() {
        let mut mint = action(ActionType::FungibleTransfer);
        mint.from = Some(ZERO_ADDRESS.into());
        mint.asset_id = Some(TOKEN.into());
        mint.amount = Some("1000000".into());
        assert_eq!(
            render(&mint, &lookups(), &LedgerProfile::receipt()),
            "Minted 1 USDC to Treasury"
        );

        let mut burn = mint.clone();
        burn.from = Some(ALICE.into());
        burn.to = Some(ZERO_ADDRESS.into());
        assert_eq!(
            render(&burn, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 burned 1 USDC"
        );
    }

    #[test]
    fn non_fungible_variants() {
        let mut nft = action(ActionType::NonFungibleTransfer);
        nft.asset_id = Some("0x00000000000000000000000000000000000000aa".into());
        nft.token_id = Some("42".into());
        nft.amount = Some("1".into());
        assert_eq!(
            render(&nft, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 transferred 0x0000...00aa #42 to Treasury"
        );

        nft.amount = Some("5".into());
        assert_eq!(
            render(&nft, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 transferred 5 of 0x0000...00aa #42 to Treasury"
        );

        let mut object = action(ActionType::NonFungibleTransfer);
        object.asset_id = Some("0xbeef::hero::Sword".into());
        object.token_id = Some("0x5a5a5a5a5a5a5a5a5a5a".into());
        object.amount = Some("1".into());
        assert_eq!(
            render(&object, &lookups(), &LedgerProfile::effects()),
            "0x1111...1111 transferred hero::Sword #0x5a5a...5a5a to Treasury"
        );

        let mut batch = action(ActionType::BatchNonFungibleTransfer);
        batch.asset_id = Some(TOKEN.into());
        batch.amount = Some("multiple".into());
        assert_eq!(
            render(&batch, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 transferred multiple USDC tokens to Treasury"
        );
    }

    #[test]
    fn creation_and_call_sentences() {
        let mut created = action(ActionType::CreationSummary);
        created.to = None;
        created.amount = Some("1".into());
        assert_eq!(
            render(&created, &lookups(), &LedgerProfile::effects()),
            "0x1111...1111 created 1 new object"
        );
        created.amount = Some("3".into());
        assert_eq!(
            render(&created, &lookups(), &LedgerProfile::effects()),
            "0x1111...1111 created 3 new objects"
        );

        let mut call = action(ActionType::CallInteraction);
        call.method = Some("0xa9059cbb".into());
        assert_eq!(
            render(&call, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 called transfer on Treasury"
        );
        call.method = Some("0xdeadbeef".into());
        assert_eq!(
            render(&call, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 called 0xdeadbeef on Treasury"
        );
        call.method = None;
        assert_eq!(
            render(&call, &lookups(), &LedgerProfile::receipt()),
            "0x1111...1111 interacted with Treasury"
        );
    }

    #[test]
    fn unrecognized_action_renders_fixed_literal() {
        let unknown = action(ActionType::Unrecognized);
        assert_eq!(
            render(&unknown, &lookups(), &LedgerProfile::receipt()),
            "Unrecognized action"
        );
    }

    #[test]
    fn fee_sentences() {
        let gas = FeeBreakdown {
            execution_cost: U256::from(21_000_000_000_000u64),
            data_or_storage_cost: None,
            rebate: None,
            total: "21000000000000".parse::<I256>().unwrap(),
        };
        assert_eq!(render_fee(&gas, &LedgerProfile::receipt()), "Fee: 0.000021 ETH");

        let resource = FeeBreakdown {
            execution_cost: U256::from(10u64),
            data_or_storage_cost: Some(U256::ZERO),
            rebate: Some(U256::from(50u64)),
            total: "-40".parse::<I256>().unwrap(),
        };
        assert_eq!(
            render_fee(&resource, &LedgerProfile::effects()),
            "Fee: -0.00000004 SUI (computation 0.00000001, storage 0, rebate 0.00000005)"
        );
    }
}
