use anyhow::{anyhow, Context, Result};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use crate::json::{field_at, field_text};
use crate::rpc::{ChainReader, ObjectData};
use crate::types::{ListingRow, MarketplaceRef, ObjectId, SuiAddress};

/// Read-side queries over a marketplace.
///
/// Per-object detail fetches run concurrently, at most `fetch_concurrency` at a
/// time, and results keep the order the chain reported the objects in.
#[derive(Clone)]
pub struct MarketReader {
    chain: Arc<dyn ChainReader>,
    market: MarketplaceRef,
    fetch_concurrency: usize,
}

impl MarketReader {
    pub fn new(chain: Arc<dyn ChainReader>, market: MarketplaceRef, fetch_concurrency: usize) -> Self {
        Self {
            chain,
            market,
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }

    pub fn market(&self) -> &MarketplaceRef {
        &self.market
    }

    /// IDs of widgets owned by `owner`.
    pub async fn owned_widgets(&self, owner: &SuiAddress) -> Result<Vec<ObjectId>> {
        let owned = self
            .chain
            .get_owned_objects(owner)
            .await
            .with_context(|| format!("Failed to list objects owned by {owner}"))?;

        let objects = self.fetch_all(owned).await?;
        let widget_type = self.market.widget_type();
        let widgets: Vec<ObjectId> = objects
            .into_iter()
            .filter(|object| object.content_type() == Some(widget_type.as_str()))
            .map(|object| {
                debug!(widget_id = %object.object_id, "Widget spotted");
                object.object_id
            })
            .collect();

        info!(owner = %owner, count = widgets.len(), "Refreshed owned widgets");
        Ok(widgets)
    }

    /// Active listings of the marketplace.
    pub async fn listings(&self) -> Result<Vec<ListingRow>> {
        let marketplace = self
            .chain
            .get_object(&self.market.marketplace_id)
            .await
            .context("Failed to fetch marketplace object")?;
        let items_id = items_collection_id(&marketplace)?;

        let entries = self
            .chain
            .get_dynamic_fields(&items_id)
            .await
            .with_context(|| format!("Failed to enumerate listings under {items_id}"))?;

        let ids = entries.into_iter().map(|entry| entry.object_id).collect();
        let objects = self.fetch_all(ids).await?;
        let rows = objects
            .iter()
            .map(listing_row)
            .collect::<Result<Vec<_>>>()?;

        info!(
            marketplace = %self.market.marketplace_id,
            count = rows.len(),
            "Refreshed listings"
        );
        Ok(rows)
    }

    async fn fetch_all(&self, ids: Vec<ObjectId>) -> Result<Vec<ObjectData>> {
        stream::iter(ids)
            .map(|id| {
                let chain = Arc::clone(&self.chain);
                async move {
                    chain
                        .get_object(&id)
                        .await
                        .with_context(|| format!("Failed to fetch object {id}"))
                }
            })
            .buffered(self.fetch_concurrency)
            .try_collect()
            .await
    }
}

/// ID of the `items` collection listings live under.
fn items_collection_id(marketplace: &ObjectData) -> Result<ObjectId> {
    let fields = marketplace
        .fields()
        .ok_or_else(|| anyhow!("marketplace {} has no content", marketplace.object_id))?;
    field_at(fields, &["items", "fields", "id", "id"])
        .and_then(|id| id.as_str())
        .map(ObjectId::from)
        .ok_or_else(|| {
            anyhow!(
                "marketplace {} has no items collection",
                marketplace.object_id
            )
        })
}

fn listing_row(listing: &ObjectData) -> Result<ListingRow> {
    let fields = listing
        .fields()
        .ok_or_else(|| anyhow!("listing {} has no content", listing.object_id))?;
    let context = || format!("Malformed listing {}", listing.object_id);

    Ok(ListingRow {
        listing_id: listing.object_id.clone(),
        ask_price: field_text(fields, &["value", "fields", "ask"]).with_context(context)?,
        owner: field_text(fields, &["value", "fields", "owner"]).with_context(context)?,
        widget: field_text(fields, &["name"]).with_context(context)?,
    })
}
