use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use term_table::row::Row;
use term_table::table_cell::TableCell;
use term_table::{Table, TableStyle};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use widget_market::config::{MarketArgs, MarketConfig};
use widget_market::dashboard::{ActionRequest, Outcome};
use widget_market::types::{format_short_hex, ListingRow, SuiAddress};
use widget_market::wallet::display_session_banner;
use widget_market::{ChainReader, HttpWallet, MarketActions, MarketReader, SuiRpcClient, WalletSession};

/// Widget Marketplace CLI - one-shot marketplace operations
#[derive(Parser)]
#[command(name = "market_cli")]
#[command(about = "Widget Marketplace CLI", long_about = None)]
struct Cli {
    #[clap(flatten)]
    market: MarketArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a new widget to the connected account
    Mint,

    /// List an owned widget for sale
    List {
        /// Widget object ID
        widget: String,
        /// Asking price in MIST
        price: String,
    },

    /// Buy a listing, paying `amount` split from the gas coin
    Buy {
        /// Listing object ID
        item: String,
        /// Payment in MIST
        amount: String,
    },

    /// Collect marketplace profits for the connected account
    TakeProfits,

    /// Show widgets owned by an account
    OwnedWidgets {
        /// Owner address (defaults to the connected wallet account)
        #[arg(long)]
        owner: Option<String>,
    },

    /// Show every active listing
    Listings,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = MarketConfig::load(cli.market)?;
    let market = config
        .marketplace()
        .context("Please enter your PackageID and MarketplaceID (--package-id, --marketplace-id)")?;

    let chain: Arc<dyn ChainReader> = Arc::new(SuiRpcClient::new(config.rpc_url.clone()));
    let reader = MarketReader::new(chain, market.clone(), config.settings.fetch_concurrency);

    if let Commands::OwnedWidgets { owner: Some(owner) } = &cli.command {
        let widgets = reader.owned_widgets(&SuiAddress::from(owner.as_str())).await?;
        print_widgets(owner, &widgets);
        return Ok(());
    }
    if let Commands::Listings = cli.command {
        print_listings(&reader.listings().await?);
        return Ok(());
    }

    // Everything else goes through the wallet
    let wallet: Arc<dyn WalletSession> = Arc::new(HttpWallet::new(config.wallet_url.clone()));
    let account = wallet.connect().await?;
    display_session_banner(
        Some(&market),
        account.as_ref(),
        &config.rpc_url,
        &config.wallet_url,
    );

    let actions = MarketActions::new(reader, wallet);
    let request = match cli.command {
        Commands::Mint => ActionRequest::Mint,
        Commands::List { widget, price } => ActionRequest::List { widget, price },
        Commands::Buy { item, amount } => ActionRequest::Purchase { item, amount },
        Commands::TakeProfits => ActionRequest::TakeProfits,
        Commands::OwnedWidgets { .. } => ActionRequest::RefreshWidgets,
        Commands::Listings => ActionRequest::RefreshListings,
    };

    match actions.run(request).await {
        Outcome::Submitted { action, result } => {
            println!("{}", action.success_message());
            println!("Transaction digest: {}", result.digest);
            for id in result.created_ids() {
                println!("Created: {id}");
            }
        }
        Outcome::OwnedWidgets(widgets) => {
            let owner = account.map(|a| a.to_string()).unwrap_or_default();
            print_widgets(&owner, &widgets);
        }
        Outcome::Listings(listings) => print_listings(&listings),
        Outcome::Failed { action, error } => {
            bail!("{}: {}", action.failure_message(), error);
        }
    }

    Ok(())
}

fn print_widgets(owner: &str, widgets: &[widget_market::ObjectId]) {
    println!("Widgets owned by {} ({}):", format_short_hex(owner), widgets.len());
    for (idx, widget) in widgets.iter().enumerate() {
        println!("  {}. {}", idx + 1, widget);
    }
}

fn cell(value: impl ToString) -> TableCell {
    TableCell::builder(value.to_string()).build()
}

fn print_listings(listings: &[ListingRow]) {
    if listings.is_empty() {
        println!("No active listings.");
        return;
    }

    let mut table = Table::new();
    table.style = TableStyle::extended();
    table.add_row(Row::new(vec![
        cell("Item"),
        cell("Listing ID"),
        cell("Ask Price"),
        cell("Owner"),
        cell("Widget"),
    ]));
    for (idx, listing) in listings.iter().enumerate() {
        table.add_row(Row::new(vec![
            cell(idx),
            cell(&listing.listing_id),
            cell(&listing.ask_price),
            cell(format_short_hex(&listing.owner)),
            cell(&listing.widget),
        ]));
    }
    println!("{}", table.render());
}
