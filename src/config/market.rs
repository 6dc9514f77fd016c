use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fmt;

use crate::config::consts::{
    DEFAULT_WALLET_URL, DEVNET_RPC_URL, LOCALNET_RPC_URL, MAINNET_RPC_URL, STATE_FILE_MARKET,
    TESTNET_RPC_URL,
};
use crate::config::settings::{load_settings_from_path, Settings};
use crate::state::StateFile;
use crate::types::{MarketplaceRef, ObjectId};
use tracing::info;

/// Sui network presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
    Mainnet,
    Localnet,
}

impl Network {
    /// Full node JSON-RPC endpoint for this network
    pub fn fullnode_url(&self) -> &'static str {
        match self {
            Network::Devnet => DEVNET_RPC_URL,
            Network::Testnet => TESTNET_RPC_URL,
            Network::Mainnet => MAINNET_RPC_URL,
            Network::Localnet => LOCALNET_RPC_URL,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        <Network as ValueEnum>::from_str(s, true).map_err(|e| anyhow::anyhow!(e))
    }
}

/// Connection arguments shared by the terminal UI and the CLI
#[derive(Args, Debug, Clone, Default)]
pub struct MarketArgs {
    /// Sui network to use when no RPC URL is given
    #[arg(long, env = "NETWORK", value_enum)]
    pub network: Option<Network>,

    /// Sui full node JSON-RPC endpoint (overrides --network)
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Wallet bridge endpoint used for account lookup and signing
    #[arg(long, env = "WALLET_URL")]
    pub wallet_url: Option<String>,

    /// Published package ID of the marketplace contract
    #[arg(long, env = "PACKAGE_ID")]
    pub package_id: Option<String>,

    /// Shared marketplace object ID
    #[arg(long, env = "MARKETPLACE_ID")]
    pub marketplace_id: Option<String>,

    /// Maximum object detail fetches in flight per query
    #[arg(long, env = "FETCH_CONCURRENCY")]
    pub fetch_concurrency: Option<usize>,

    /// Path to a TOML settings file
    #[arg(long, env = "CONFIG_PATH")]
    pub config_path: Option<String>,
}

/// Client configuration with all required values resolved
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub network: Network,
    pub rpc_url: String,
    pub wallet_url: String,
    pub package_id: Option<String>,
    pub marketplace_id: Option<String>,
    pub settings: Settings,
}

impl MarketConfig {
    /// Load configuration with priority: CLI/env -> state file -> defaults
    pub fn load(args: MarketArgs) -> Result<Self> {
        Self::load_with_state(args, &StateFile::new(STATE_FILE_MARKET))
    }

    pub fn load_with_state(args: MarketArgs, state_file: &StateFile) -> Result<Self> {
        let network = match args.network {
            Some(network) => network,
            None => match state_file.load_value("NETWORK") {
                Some(name) => name
                    .parse::<Network>()
                    .with_context(|| format!("Invalid NETWORK in state file: {name}"))?,
                None => Network::default(),
            },
        };

        let rpc_url = args
            .rpc_url
            .or_else(|| state_file.load_value("RPC_URL"))
            .unwrap_or_else(|| network.fullnode_url().to_string());

        let wallet_url = args
            .wallet_url
            .or_else(|| state_file.load_value("WALLET_URL"))
            .unwrap_or_else(|| DEFAULT_WALLET_URL.to_string());

        let package_id = args
            .package_id
            .or_else(|| state_file.load_value("PACKAGE_ID"));
        let marketplace_id = args
            .marketplace_id
            .or_else(|| state_file.load_value("MARKETPLACE_ID"));

        let mut settings = match args
            .config_path
            .or_else(|| state_file.load_value("CONFIG_PATH"))
        {
            Some(path) => load_settings_from_path(&path)
                .with_context(|| format!("Failed to load settings from {path}"))?,
            None => Settings::default(),
        };

        if let Some(limit) = args.fetch_concurrency.or_else(|| {
            state_file
                .load_value("FETCH_CONCURRENCY")
                .and_then(|s| s.parse::<usize>().ok())
        }) {
            settings.fetch_concurrency = limit;
        }
        settings.fetch_concurrency = settings.fetch_concurrency.max(1);

        info!(
            "Loaded MarketConfig: network={network}, rpc_url={rpc_url}, wallet_url={wallet_url}, fetch_concurrency={}",
            settings.fetch_concurrency
        );

        Ok(MarketConfig {
            network,
            rpc_url,
            wallet_url,
            package_id,
            marketplace_id,
            settings,
        })
    }

    /// Marketplace reference when both IDs were supplied up front.
    pub fn marketplace(&self) -> Option<MarketplaceRef> {
        let package_id = self.package_id.as_deref().map(str::trim)?;
        let marketplace_id = self.marketplace_id.as_deref().map(str::trim)?;
        if package_id.is_empty() || marketplace_id.is_empty() {
            return None;
        }
        Some(MarketplaceRef::new(
            ObjectId::from(package_id),
            ObjectId::from(marketplace_id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_state_file() {
        let state = StateFile::new("nonexistent_market.env");
        let config = MarketConfig::load_with_state(MarketArgs::default(), &state).unwrap();

        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.rpc_url, DEVNET_RPC_URL);
        assert_eq!(config.wallet_url, DEFAULT_WALLET_URL);
        assert_eq!(config.settings, Settings::default());
        assert!(config.marketplace().is_none());
    }

    #[test]
    fn test_network_selects_rpc_url() {
        let state = StateFile::new("nonexistent_market.env");
        let args = MarketArgs {
            network: Some(Network::Testnet),
            ..Default::default()
        };
        let config = MarketConfig::load_with_state(args, &state).unwrap();
        assert_eq!(config.rpc_url, TESTNET_RPC_URL);
    }

    #[test]
    fn test_cli_overrides_state_file() {
        let temp_file = "test_market_state_1.env";
        fs::write(
            temp_file,
            "RPC_URL=http://state:9000\nPACKAGE_ID=0xP\nMARKETPLACE_ID=0xM\nNETWORK=localnet\n",
        )
        .unwrap();
        let state = StateFile::new(temp_file);

        let args = MarketArgs {
            rpc_url: Some("http://cli:9000".to_string()),
            ..Default::default()
        };
        let config = MarketConfig::load_with_state(args, &state).unwrap();

        assert_eq!(config.rpc_url, "http://cli:9000");
        assert_eq!(config.network, Network::Localnet);
        let market = config.marketplace().unwrap();
        assert_eq!(market.package_id.as_str(), "0xP");
        assert_eq!(market.marketplace_id.as_str(), "0xM");

        fs::remove_file(temp_file).unwrap();
    }

    #[test]
    fn test_blank_ids_are_not_a_marketplace() {
        let state = StateFile::new("nonexistent_market.env");
        let args = MarketArgs {
            package_id: Some("0xP".to_string()),
            marketplace_id: Some("   ".to_string()),
            ..Default::default()
        };
        let config = MarketConfig::load_with_state(args, &state).unwrap();
        assert!(config.marketplace().is_none());
    }

    #[test]
    fn test_fetch_concurrency_floor() {
        let state = StateFile::new("nonexistent_market.env");
        let args = MarketArgs {
            fetch_concurrency: Some(0),
            ..Default::default()
        };
        let config = MarketConfig::load_with_state(args, &state).unwrap();
        assert_eq!(config.settings.fetch_concurrency, 1);
    }
}
