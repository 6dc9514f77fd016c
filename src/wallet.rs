//! Wallet session: the active account and sign-and-submit.
//!
//! Keys never enter this process. [`HttpWallet`] hands transaction requests to
//! a wallet bridge that signs and executes them, and publishes account changes
//! to subscribers through a `watch` channel.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use term_table::row::Row;
use term_table::table_cell::{Alignment as CellAlignment, TableCell};
use term_table::{Table, TableStyle};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::transaction::TransactionRequest;
use crate::types::{MarketplaceRef, ObjectId, SuiAddress};

/// Execution status reported by the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedObjectRef {
    pub object_id: ObjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    pub reference: CreatedObjectRef,
    #[serde(default)]
    pub owner: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub created: Vec<CreatedObject>,
}

/// What the wallet returns after submitting a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub digest: String,
    pub effects: TransactionEffects,
}

impl ExecutionResult {
    /// IDs of objects the transaction created.
    pub fn created_ids(&self) -> Vec<&ObjectId> {
        self.effects
            .created
            .iter()
            .map(|created| &created.reference.object_id)
            .collect()
    }
}

#[async_trait]
pub trait WalletSession: Send + Sync {
    /// Currently selected account, if the wallet is connected.
    fn active_account(&self) -> Option<SuiAddress>;

    /// Observe account changes. The receiver sees the current value first.
    fn subscribe_account(&self) -> watch::Receiver<Option<SuiAddress>>;

    /// Ask the wallet for its current account and publish it to subscribers.
    async fn connect(&self) -> Result<Option<SuiAddress>>;

    /// Sign and execute a transaction. Non-success effects are returned as
    /// errors so callers only see confirmed transactions on `Ok`.
    async fn sign_and_execute(&self, tx: &TransactionRequest) -> Result<ExecutionResult>;
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    address: Option<SuiAddress>,
}

/// Wallet bridge client: `GET /account`, `POST /sign-and-execute`.
pub struct HttpWallet {
    http: Client,
    base_url: String,
    account: watch::Sender<Option<SuiAddress>>,
}

impl HttpWallet {
    pub fn new(base_url: impl Into<String>) -> Self {
        let (account, _) = watch::channel(None);
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl WalletSession for HttpWallet {
    fn active_account(&self) -> Option<SuiAddress> {
        self.account.borrow().clone()
    }

    fn subscribe_account(&self) -> watch::Receiver<Option<SuiAddress>> {
        self.account.subscribe()
    }

    async fn connect(&self) -> Result<Option<SuiAddress>> {
        let response: AccountResponse = self
            .http
            .get(self.endpoint("account"))
            .send()
            .await
            .context("Failed to reach wallet bridge")?
            .error_for_status()
            .context("Wallet bridge rejected account request")?
            .json()
            .await
            .context("Malformed account response")?;

        let address = response.address;
        let changed = self.account.send_if_modified(|current| {
            if *current != address {
                *current = address.clone();
                true
            } else {
                false
            }
        });
        if changed {
            info!(account = ?address, "Wallet account changed");
        }
        Ok(address)
    }

    async fn sign_and_execute(&self, tx: &TransactionRequest) -> Result<ExecutionResult> {
        let result: ExecutionResult = self
            .http
            .post(self.endpoint("sign-and-execute"))
            .json(tx)
            .send()
            .await
            .context("Failed to reach wallet bridge")?
            .error_for_status()
            .context("Wallet bridge rejected transaction")?
            .json()
            .await
            .context("Malformed execution result")?;

        if !result.effects.status.is_success() {
            warn!(
                digest = %result.digest,
                error = ?result.effects.status.error,
                "Transaction failed on-chain"
            );
            bail!(
                "transaction {} failed: {}",
                result.digest,
                result
                    .effects
                    .status
                    .error
                    .as_deref()
                    .unwrap_or(&result.effects.status.status)
            );
        }
        Ok(result)
    }
}

/// Log a banner describing the session the client is about to run.
pub fn display_session_banner(
    market: Option<&MarketplaceRef>,
    account: Option<&SuiAddress>,
    rpc_url: &str,
    wallet_url: &str,
) {
    let mut table = Table::new();
    table.style = TableStyle::extended();

    let (header, use_warn) = match account {
        Some(_) => ("🛒 WIDGET MARKETPLACE 🛒", false),
        None => ("❌  NO WALLET ACCOUNT  ❌", true),
    };
    table.add_row(Row::new(vec![TableCell::builder(header)
        .col_span(2)
        .alignment(CellAlignment::Center)
        .build()]));

    let rows = [
        (
            "Account",
            account.map_or_else(|| "not connected".to_string(), |a| a.to_string()),
        ),
        (
            "Package",
            market.map_or_else(|| "-".to_string(), |m| m.package_id.to_string()),
        ),
        (
            "Marketplace",
            market.map_or_else(|| "-".to_string(), |m| m.marketplace_id.to_string()),
        ),
        ("RPC URL", rpc_url.to_owned()),
        ("Wallet URL", wallet_url.to_owned()),
    ];
    for (label, value) in rows {
        table.add_row(Row::new(vec![
            TableCell::builder(label)
                .alignment(CellAlignment::Right)
                .build(),
            TableCell::builder(value)
                .alignment(CellAlignment::Left)
                .build(),
        ]));
    }

    if use_warn {
        warn!("\n{}", table.render());
    } else {
        info!("\n{}", table.render());
    }
}
