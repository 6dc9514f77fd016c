pub mod config;
pub mod dashboard;
pub mod json;
pub mod market;
pub mod rpc;
pub mod state;
pub mod transaction;
pub mod tui;
pub mod types;
pub mod wallet;

pub use dashboard::{App, MarketActions, Outcome};
pub use market::MarketReader;
pub use rpc::{ChainReader, SuiRpcClient};
pub use transaction::{MarketCalls, TransactionRequest};
pub use types::{ListingRow, MarketplaceRef, ObjectId, SuiAddress};
pub use wallet::{HttpWallet, WalletSession};
