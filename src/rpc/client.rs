use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{ObjectResponse, OwnedObjectEntry, Page, RpcResponse};
use super::{ChainReader, DynamicFieldInfo, ObjectData};
use crate::config::consts::RPC_PAGE_LIMIT;
use crate::types::{ObjectId, SuiAddress};

/// Sui full node client speaking JSON-RPC 2.0 over HTTP.
pub struct SuiRpcClient {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "JSON-RPC request");

        let response: RpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{method}: request to {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("{method}: HTTP error"))?
            .json()
            .await
            .with_context(|| format!("{method}: malformed response"))?;

        if let Some(error) = response.error {
            bail!("{method} failed ({}): {}", error.code, error.message);
        }
        response
            .result
            .ok_or_else(|| anyhow!("{method}: response carried neither result nor error"))
    }

    /// Drain a cursor-paginated method, one request per page.
    async fn paginate<T, F>(&self, method: &str, params: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(Value) -> Value,
    {
        let mut items = Vec::new();
        let mut cursor = Value::Null;
        loop {
            let page: Page<T> = self.call(method, params(cursor)).await?;
            items.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page && !next.is_null() => cursor = next,
                _ => break,
            }
        }
        Ok(items)
    }
}

#[async_trait]
impl ChainReader for SuiRpcClient {
    async fn get_object(&self, id: &ObjectId) -> Result<ObjectData> {
        let response: ObjectResponse = self
            .call(
                "sui_getObject",
                json!([id, { "showContent": true, "showType": true }]),
            )
            .await?;

        match (response.data, response.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => bail!("object {id} unavailable: {error}"),
            (None, None) => bail!("object {id} not found"),
        }
    }

    async fn get_owned_objects(&self, owner: &SuiAddress) -> Result<Vec<ObjectId>> {
        let entries: Vec<OwnedObjectEntry> = self
            .paginate("suix_getOwnedObjects", |cursor| {
                json!([owner, null, cursor, RPC_PAGE_LIMIT])
            })
            .await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| entry.data.map(|d| d.object_id))
            .collect())
    }

    async fn get_dynamic_fields(&self, parent: &ObjectId) -> Result<Vec<DynamicFieldInfo>> {
        self.paginate("suix_getDynamicFields", |cursor| {
            json!([parent, cursor, RPC_PAGE_LIMIT])
        })
        .await
    }
}
