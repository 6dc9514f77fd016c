use anyhow::{anyhow, bail, Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::market::MarketReader;
use crate::transaction::{MarketCalls, TransactionRequest};
use crate::types::{ListingRow, ObjectId};
use crate::wallet::{ExecutionResult, WalletSession};

/// Every user-triggered operation on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Mint,
    List,
    Purchase,
    TakeProfits,
    RefreshWidgets,
    RefreshListings,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Mint => "mint",
            Action::List => "list",
            Action::Purchase => "purchase",
            Action::TakeProfits => "take_profits",
            Action::RefreshWidgets => "refresh_widgets",
            Action::RefreshListings => "refresh_listings",
        }
    }

    /// Alert text shown when the action fails, whatever the cause.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::Mint => "Failed to create widget item",
            Action::List => "Failed to list item",
            Action::Purchase => "Failed to purchase listing",
            Action::TakeProfits => "Failed to take profits",
            Action::RefreshWidgets => "Failed to refresh",
            Action::RefreshListings => "Failed to get listings",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Action::Mint => "Successfully minted widget!",
            Action::List => "Listing created!",
            Action::Purchase => "Successfully purchased!",
            Action::TakeProfits => "Successfully took profits!",
            Action::RefreshWidgets => "Successfully refreshed owned widgets!",
            Action::RefreshListings => "Successfully refreshed listings!",
        }
    }
}

/// An action together with the form values it was triggered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Mint,
    List { widget: String, price: String },
    Purchase { item: String, amount: String },
    TakeProfits,
    RefreshWidgets,
    RefreshListings,
}

impl ActionRequest {
    pub fn action(&self) -> Action {
        match self {
            ActionRequest::Mint => Action::Mint,
            ActionRequest::List { .. } => Action::List,
            ActionRequest::Purchase { .. } => Action::Purchase,
            ActionRequest::TakeProfits => Action::TakeProfits,
            ActionRequest::RefreshWidgets => Action::RefreshWidgets,
            ActionRequest::RefreshListings => Action::RefreshListings,
        }
    }
}

/// Result of one action, ready to be applied to dashboard state.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Submitted {
        action: Action,
        result: ExecutionResult,
    },
    OwnedWidgets(Vec<ObjectId>),
    Listings(Vec<ListingRow>),
    Failed {
        action: Action,
        error: String,
    },
}

/// Runs dashboard actions against a wallet session and a marketplace reader.
///
/// Failures never escape: each one is logged and turned into
/// [`Outcome::Failed`].
#[derive(Clone)]
pub struct MarketActions {
    calls: MarketCalls,
    reader: MarketReader,
    wallet: Arc<dyn WalletSession>,
}

impl MarketActions {
    pub fn new(reader: MarketReader, wallet: Arc<dyn WalletSession>) -> Self {
        Self {
            calls: MarketCalls::new(reader.market().clone()),
            reader,
            wallet,
        }
    }

    pub async fn run(&self, request: ActionRequest) -> Outcome {
        let action = request.action();
        let result = match request {
            ActionRequest::Mint => self.submit(action, self.calls.mint()).await,
            ActionRequest::List { widget, price } => self.list(&widget, &price).await,
            ActionRequest::Purchase { item, amount } => self.purchase(&item, &amount).await,
            ActionRequest::TakeProfits => self.submit(action, self.calls.take_profits()).await,
            ActionRequest::RefreshWidgets => self.refresh_widgets().await,
            ActionRequest::RefreshListings => self
                .reader
                .listings()
                .await
                .map(Outcome::Listings),
        };

        result.unwrap_or_else(|e| {
            error!(action = action.name(), error = %format!("{e:#}"), "{}", action.failure_message());
            Outcome::Failed {
                action,
                error: format!("{e:#}"),
            }
        })
    }

    pub async fn mint(&self) -> Outcome {
        self.run(ActionRequest::Mint).await
    }

    pub async fn take_profits(&self) -> Outcome {
        self.run(ActionRequest::TakeProfits).await
    }

    async fn list(&self, widget: &str, price: &str) -> Result<Outcome> {
        let widget = required_id(widget, "widget ID")?;
        let price = parse_amount(price, "price")?;
        self.submit(Action::List, self.calls.list(&widget, price))
            .await
    }

    async fn purchase(&self, item: &str, amount: &str) -> Result<Outcome> {
        let item = required_id(item, "item ID")?;
        let amount = parse_amount(amount, "amount")?;
        self.submit(Action::Purchase, self.calls.purchase(&item, amount))
            .await
    }

    async fn refresh_widgets(&self) -> Result<Outcome> {
        let owner = self
            .wallet
            .active_account()
            .ok_or_else(|| anyhow!("no wallet account connected"))?;
        self.reader
            .owned_widgets(&owner)
            .await
            .map(Outcome::OwnedWidgets)
    }

    async fn submit(&self, action: Action, tx: TransactionRequest) -> Result<Outcome> {
        let result = self
            .wallet
            .sign_and_execute(&tx)
            .await
            .with_context(|| format!("{} transaction was not executed", action.name()))?;

        let created: Vec<&str> = result.created_ids().into_iter().map(ObjectId::as_str).collect();
        info!(
            action = action.name(),
            digest = %result.digest,
            created = ?created,
            "Transaction executed"
        );
        Ok(Outcome::Submitted { action, result })
    }
}

fn required_id(value: &str, what: &str) -> Result<ObjectId> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{what} is required");
    }
    Ok(ObjectId::from(value))
}

fn parse_amount(value: &str, what: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .with_context(|| format!("invalid {what}: {value:?}"))
}
