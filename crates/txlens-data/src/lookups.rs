//! Injectable, read-only lookup tables.
//!
//! Asset symbols/decimals, display names and method names are static data
//! owned by the caller. Tables are built once, never mutated by the pipeline,
//! and shared across concurrent explanations. All keys are lowercased on
//! insert and on lookup.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use alloy::primitives::hex;
use alloy::sol_types::SolCall;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::LedgerFamily;

/// Ethereum mainnet contract addresses (compile-time constants).
pub mod addresses {
    use alloy::primitives::Address;

    /// Uniswap V2 Router02
    pub const UNISWAP_V2_ROUTER: Address =
        alloy::primitives::address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

    /// Uniswap V3 SwapRouter
    pub const UNISWAP_V3_ROUTER: Address =
        alloy::primitives::address!("E592427A0AEce92De3Edee1F18E0157C05861564");

    pub const WETH: Address =
        alloy::primitives::address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

    pub const USDC: Address =
        alloy::primitives::address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");

    pub const USDT: Address =
        alloy::primitives::address!("dAC17F958D2ee523a2206206994597C13D831ec7");

    pub const DAI: Address =
        alloy::primitives::address!("6B175474E89094C44Da98b954EedeAC495271d0F");

    pub const WBTC: Address =
        alloy::primitives::address!("2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");

    /// Native coin type of the Sui object ledger.
    pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";
}

/// Well-known call signatures whose selectors seed [`MethodRegistry::mainnet`].
mod signatures {
    use alloy::sol;

    sol! {
        interface Erc20 {
            function transfer(address to, uint256 amount) external returns (bool);
            function approve(address spender, uint256 amount) external returns (bool);
            function transferFrom(address from, address to, uint256 amount) external returns (bool);
        }

        interface Erc721 {
            function safeTransferFrom(address from, address to, uint256 tokenId) external;
        }

        interface Weth {
            function deposit() external payable;
            function withdraw(uint256 amount) external;
        }

        interface UniswapV2Router02 {
            function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
            function swapTokensForExactTokens(uint256 amountOut, uint256 amountInMax, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
            function swapExactETHForTokens(uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
            function swapETHForExactTokens(uint256 amountOut, address[] calldata path, address to, uint256 deadline) external payable returns (uint256[] memory amounts);
            function swapTokensForExactETH(uint256 amountOut, uint256 amountInMax, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
            function swapExactTokensForETH(uint256 amountIn, uint256 amountOutMin, address[] calldata path, address to, uint256 deadline) external returns (uint256[] memory amounts);
        }

        interface SwapRouter {
            struct ExactInputSingleParams {
                address tokenIn;
                address tokenOut;
                uint24 fee;
                address recipient;
                uint256 deadline;
                uint256 amountIn;
                uint256 amountOutMinimum;
                uint160 sqrtPriceLimitX96;
            }

            struct ExactInputParams {
                bytes path;
                address recipient;
                uint256 deadline;
                uint256 amountIn;
                uint256 amountOutMinimum;
            }

            function exactInputSingle(ExactInputSingleParams calldata params) external payable returns (uint256 amountOut);
            function exactInput(ExactInputParams calldata params) external payable returns (uint256 amountOut);
        }
    }
}

/// Symbol and decimal count of one asset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub symbol: String,
    pub decimals: u8,
}

/// Asset symbol/decimals keyed by contract address or coin type.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    entries: HashMap<String, AssetInfo>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, asset_id: &str, symbol: &str, decimals: u8) -> Self {
        self.insert(
            asset_id,
            AssetInfo {
                symbol: symbol.to_string(),
                decimals,
            },
        );
        self
    }

    pub fn insert(&mut self, asset_id: &str, info: AssetInfo) {
        self.entries.insert(asset_key(asset_id), info);
    }

    pub fn get(&self, asset_id: &str) -> Option<&AssetInfo> {
        self.entries.get(&asset_key(asset_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Major mainnet tokens plus the object ledger's native coin.
    pub fn mainnet() -> Self {
        Self::new()
            .with(&lower(addresses::WETH), "WETH", 18)
            .with(&lower(addresses::USDC), "USDC", 6)
            .with(&lower(addresses::USDT), "USDT", 6)
            .with(&lower(addresses::DAI), "DAI", 18)
            .with(&lower(addresses::WBTC), "WBTC", 8)
            .with(addresses::SUI_COIN_TYPE, "SUI", 9)
    }
}

/// Lowercased asset id; Move type paths also drop leading zeros from every
/// address segment, so `0x000...0002::sui::SUI` and `0x2::sui::SUI` share a key.
fn asset_key(asset_id: &str) -> String {
    let lowered = asset_id.to_lowercase();
    if !lowered.contains("::") {
        return lowered;
    }

    let mut key = String::with_capacity(lowered.len());
    let mut rest = lowered.as_str();
    while let Some(start) = rest.find("0x") {
        let (head, tail) = rest.split_at(start + 2);
        key.push_str(head);
        let digits = tail
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(tail.len());
        let inside_identifier = head[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
        let (address, remainder) = tail.split_at(digits);
        if inside_identifier {
            key.push_str(address);
        } else {
            let trimmed = address.trim_start_matches('0');
            key.push_str(if trimmed.is_empty() && !address.is_empty() { "0" } else { trimmed });
        }
        rest = remainder;
    }
    key.push_str(rest);
    key
}

/// Display names keyed by lowercase key (contract address, package id or selector).
#[derive(Clone, Debug, Default)]
pub struct NameRegistry {
    entries: HashMap<String, String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, name: &str) -> Self {
        self.insert(key, name);
        self
    }

    pub fn insert(&mut self, key: &str, name: &str) {
        self.entries.insert(key.to_lowercase(), name.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Router and token contract names on mainnet.
    pub fn mainnet() -> Self {
        Self::new()
            .with(&lower(addresses::UNISWAP_V2_ROUTER), "Uniswap V2 Router")
            .with(&lower(addresses::UNISWAP_V3_ROUTER), "Uniswap V3 Router")
            .with(&lower(addresses::WETH), "WETH")
            .with(&lower(addresses::USDC), "USDC")
            .with(&lower(addresses::USDT), "USDT")
            .with(&lower(addresses::DAI), "DAI")
            .with(&lower(addresses::WBTC), "WBTC")
    }
}

/// Method names keyed by 4-byte selector (`0x` + 8 hex).
pub type MethodRegistry = NameRegistry;

fn selector_entry<C: SolCall>() -> (String, String) {
    let name = C::SIGNATURE.split('(').next().unwrap_or(C::SIGNATURE);
    (format!("0x{}", hex::encode(C::SELECTOR)), name.to_string())
}

/// Selector names of common token and router calls.
pub fn mainnet_methods() -> MethodRegistry {
    use signatures::{Erc20, Erc721, SwapRouter, UniswapV2Router02, Weth};

    [
        selector_entry::<Erc20::transferCall>(),
        selector_entry::<Erc20::approveCall>(),
        selector_entry::<Erc20::transferFromCall>(),
        selector_entry::<Erc721::safeTransferFromCall>(),
        selector_entry::<Weth::depositCall>(),
        selector_entry::<Weth::withdrawCall>(),
        selector_entry::<UniswapV2Router02::swapExactTokensForTokensCall>(),
        selector_entry::<UniswapV2Router02::swapTokensForExactTokensCall>(),
        selector_entry::<UniswapV2Router02::swapExactETHForTokensCall>(),
        selector_entry::<UniswapV2Router02::swapETHForExactTokensCall>(),
        selector_entry::<UniswapV2Router02::swapTokensForExactETHCall>(),
        selector_entry::<UniswapV2Router02::swapExactTokensForETHCall>(),
        selector_entry::<SwapRouter::exactInputSingleCall>(),
        selector_entry::<SwapRouter::exactInputCall>(),
    ]
    .iter()
    .fold(MethodRegistry::new(), |registry, (selector, name)| {
        registry.with(selector, name)
    })
}

fn lower(address: alloy::primitives::Address) -> String {
    address.to_string().to_lowercase()
}

/// Resolves an address to a human name (e.g. a name service).
pub trait NameResolver: Send + Sync + std::fmt::Debug {
    fn resolve(&self, address: &str) -> Option<String>;
}

/// Resolver stub that never resolves; name-service lookups are not performed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResolution;

impl NameResolver for NoResolution {
    fn resolve(&self, _address: &str) -> Option<String> {
        None
    }
}

/// Display defaults for one ledger family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerProfile {
    /// Symbol of the native asset (fees, value transfers).
    pub native_symbol: String,
    pub native_decimals: u8,
    /// Symbol shown for assets missing from the asset table.
    pub unlisted_symbol: String,
    pub unlisted_decimals: u8,
}

impl LedgerProfile {
    pub fn receipt() -> Self {
        Self {
            native_symbol: "ETH".to_string(),
            native_decimals: 18,
            unlisted_symbol: "tokens".to_string(),
            unlisted_decimals: 18,
        }
    }

    pub fn effects() -> Self {
        Self {
            native_symbol: "SUI".to_string(),
            native_decimals: 9,
            unlisted_symbol: "coins".to_string(),
            unlisted_decimals: 9,
        }
    }
}

/// On-disk JSON shape of a lookups file.
///
/// ```json
/// { "assets": { "0xa0b8...": { "symbol": "USDC", "decimals": 6 } },
///   "names": { "0x7a25...": "Uniswap V2 Router" },
///   "methods": { "0xa9059cbb": "transfer" },
///   "native_symbol": "POL" }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LookupsFile {
    #[serde(default)]
    pub assets: HashMap<String, AssetInfo>,
    #[serde(default)]
    pub names: HashMap<String, String>,
    #[serde(default)]
    pub methods: HashMap<String, String>,
    /// Overrides the receipt-ledger native symbol (for EVM chains other than Ethereum).
    #[serde(default)]
    pub native_symbol: Option<String>,
}

/// All static data the renderer consults.
#[derive(Clone, Debug)]
pub struct Lookups {
    pub assets: AssetRegistry,
    pub names: NameRegistry,
    pub methods: MethodRegistry,
    resolver: Arc<dyn NameResolver>,
    receipt_profile: LedgerProfile,
    effects_profile: LedgerProfile,
}

impl Default for Lookups {
    fn default() -> Self {
        Self::new(
            AssetRegistry::new(),
            NameRegistry::new(),
            MethodRegistry::new(),
        )
    }
}

impl Lookups {
    pub fn new(assets: AssetRegistry, names: NameRegistry, methods: MethodRegistry) -> Self {
        Self {
            assets,
            names,
            methods,
            resolver: Arc::new(NoResolution),
            receipt_profile: LedgerProfile::receipt(),
            effects_profile: LedgerProfile::effects(),
        }
    }

    /// Built-in mainnet tables.
    pub fn mainnet() -> Self {
        Self::new(
            AssetRegistry::mainnet(),
            NameRegistry::mainnet(),
            mainnet_methods(),
        )
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn NameResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_native_symbol(mut self, family: LedgerFamily, symbol: &str) -> Self {
        match family {
            LedgerFamily::Receipt => self.receipt_profile.native_symbol = symbol.to_string(),
            LedgerFamily::Effects => self.effects_profile.native_symbol = symbol.to_string(),
        }
        self
    }

    pub fn profile(&self, family: LedgerFamily) -> &LedgerProfile {
        match family {
            LedgerFamily::Receipt => &self.receipt_profile,
            LedgerFamily::Effects => &self.effects_profile,
        }
    }

    /// Name table first, then the resolver.
    pub fn resolve_name(&self, address: &str) -> Option<String> {
        self.names
            .get(address)
            .map(str::to_string)
            .or_else(|| self.resolver.resolve(address))
    }

    /// Layers a lookups file over the current tables.
    pub fn merge(mut self, file: LookupsFile) -> Self {
        for (asset_id, info) in file.assets {
            self.assets.insert(&asset_id, info);
        }
        for (key, name) in file.names {
            self.names.insert(&key, &name);
        }
        for (selector, name) in file.methods {
            self.methods.insert(&selector, &name);
        }
        match file.native_symbol {
            Some(symbol) => self.with_native_symbol(LedgerFamily::Receipt, &symbol),
            None => self,
        }
    }

    /// Parses a lookups JSON document and layers it over the mainnet defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: LookupsFile =
            serde_json::from_str(json).wrap_err("failed to parse lookups JSON")?;
        tracing::debug!(
            assets = file.assets.len(),
            names = file.names.len(),
            methods = file.methods.len(),
            "loaded lookups file"
        );
        Ok(Self::mainnet().merge(file))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read lookups file {}", path.display()))?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn addresses_are_valid() {
        assert_eq!(
            addresses::UNISWAP_V2_ROUTER.to_checksum(None),
            "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D"
        );
    }

    #[test]
    fn asset_lookup_is_case_insensitive() {
        let assets = AssetRegistry::mainnet();
        let usdc = assets
            .get("0xA0B86991C6218B36C1D19D4A2E9EB0CE3606EB48")
            .expect("USDC is listed");
        assert_eq!(usdc.symbol, "USDC");
        assert_eq!(usdc.decimals, 6);
        assert_eq!(assets.get("0x2::SUI::sui").map(|a| a.decimals), Some(9));
    }

    #[test]
    fn long_form_move_types_share_the_short_key() {
        let assets = AssetRegistry::mainnet();
        let long = format!("0x{:0>64}::sui::SUI", "2");
        let sui = assets.get(&long).expect("SUI is listed");
        assert_eq!(sui.symbol, "SUI");
        assert_eq!(sui.decimals, 9);

        let assets = AssetRegistry::new().with(
            "0x00000000000000000000000000000000000000000000000000000000000000aB::pool::LP<0x2::sui::SUI>",
            "LP",
            6,
        );
        assert!(assets.get("0xab::pool::LP<0x0002::sui::SUI>").is_some());
        assert!(assets.get("0xab::pool::LP<0x3::sui::SUI>").is_none());
    }

    #[test]
    fn asset_key_normalization() {
        assert_eq!(asset_key("0xA0B8"), "0xa0b8");
        assert_eq!(
            asset_key("0x0000000000000000000000000000000000000001"),
            "0x0000000000000000000000000000000000000001"
        );
        assert_eq!(asset_key("0x000::m::T"), "0x0::m::t");
        assert_eq!(asset_key("0x0c::a0x01::T"), "0xc::a0x01::t");
    }

    #[test]
    fn mainnet_methods_use_canonical_selectors() {
        let methods = mainnet_methods();
        assert_eq!(methods.get("0xa9059cbb"), Some("transfer"));
        assert_eq!(methods.get("0x38ED1739"), Some("swapExactTokensForTokens"));
        assert_eq!(methods.get("0x7ff36ab5"), Some("swapExactETHForTokens"));
        assert_eq!(methods.get("0x414bf389"), Some("exactInputSingle"));
        assert_eq!(methods.get("0xc04b8d59"), Some("exactInput"));
    }

    #[test]
    fn stub_resolver_never_resolves() {
        let lookups = Lookups::default();
        assert_eq!(
            lookups.resolve_name("0x1111111111111111111111111111111111111111"),
            None
        );
    }

    #[derive(Debug)]
    struct FixedResolver;

    impl NameResolver for FixedResolver {
        fn resolve(&self, _address: &str) -> Option<String> {
            Some("vitalik.eth".to_string())
        }
    }

    #[test]
    fn name_table_wins_over_resolver() {
        let lookups = Lookups::mainnet().with_resolver(Arc::new(FixedResolver));
        assert_eq!(
            lookups
                .resolve_name("0x7a250d5630b4cf539739df2c5dacb4c659f2488d")
                .as_deref(),
            Some("Uniswap V2 Router")
        );
        assert_eq!(
            lookups.resolve_name("0x01").as_deref(),
            Some("vitalik.eth")
        );
    }

    #[test]
    fn lookups_file_layers_over_mainnet() {
        let lookups = Lookups::from_json_str(
            r#"{
                "assets": { "0xABCDEF0000000000000000000000000000000001": { "symbol": "TST", "decimals": 2 } },
                "names": { "0xABCDEF0000000000000000000000000000000002": "Test Vault" },
                "native_symbol": "POL"
            }"#,
        )
        .unwrap();

        assert_eq!(
            lookups
                .assets
                .get("0xabcdef0000000000000000000000000000000001")
                .map(|a| a.symbol.as_str()),
            Some("TST")
        );
        assert_eq!(
            lookups.names.get("0xabcdef0000000000000000000000000000000002"),
            Some("Test Vault")
        );
        assert!(lookups.assets.get(&lower(addresses::USDC)).is_some());
        assert_eq!(lookups.profile(LedgerFamily::Receipt).native_symbol, "POL");
        assert_eq!(lookups.profile(LedgerFamily::Effects).native_symbol, "SUI");
    }

    #[test]
    fn lookups_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "names": {{ "0x0000000000000000000000000000000000000abc": "Vault" }} }}"#)
            .unwrap();

        let lookups = Lookups::from_path(file.path()).unwrap();
        assert_eq!(
            lookups.names.get("0x0000000000000000000000000000000000000ABC"),
            Some("Vault")
        );
    }

    #[test]
    fn malformed_lookups_file_is_an_error() {
        assert!(Lookups::from_json_str("{ not json").is_err());
    }
}
