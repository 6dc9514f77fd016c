//! Centralized constants for the marketplace client.
//!
//! Contract module and function names are fixed by the deployed Move package.

// =============================================================================
// State File Names
// =============================================================================

pub const STATE_FILE_MARKET: &str = "widget_market.env";

/// Default log file for the terminal UI (stdout belongs to the screen)
pub const DEFAULT_LOG_FILE: &str = "widget_market.log";

// =============================================================================
// Network Settings
// =============================================================================

pub const DEVNET_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";
pub const TESTNET_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
pub const MAINNET_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";
pub const LOCALNET_RPC_URL: &str = "http://127.0.0.1:9000";

/// Local wallet bridge that signs and submits on the user's behalf
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:5173";

// =============================================================================
// Contract Layout
// =============================================================================

pub const WIDGET_MODULE: &str = "widget";
pub const WIDGET_STRUCT: &str = "Widget";
pub const MARKETPLACE_MODULE: &str = "marketplace";

pub const FN_MINT: &str = "mint";
pub const FN_LIST: &str = "list";
pub const FN_BUY_AND_TAKE: &str = "buy_and_take";
pub const FN_TAKE_PROFITS_AND_KEEP: &str = "take_profits_and_keep";

/// Coin type listings are priced in
pub const COIN_TYPE: &str = "0x2::sui::SUI";

// =============================================================================
// Client Settings
// =============================================================================

/// Maximum number of object detail fetches in flight per query
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// How long a success toast stays on screen
pub const DEFAULT_TOAST_MS: u64 = 3000;

/// Page size requested from paginated RPC methods (None lets the node decide)
pub const RPC_PAGE_LIMIT: Option<u32> = None;
