//! Read access to chain state.
//!
//! [`ChainReader`] is the seam the marketplace queries are written against;
//! [`SuiRpcClient`] is the JSON-RPC implementation used by the binaries.

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ObjectId, SuiAddress};

pub mod client;
pub mod types;

pub use client::SuiRpcClient;
pub use types::{DynamicFieldInfo, ObjectContent, ObjectData};

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fetch one object with its Move content expanded.
    async fn get_object(&self, id: &ObjectId) -> Result<ObjectData>;

    /// IDs of every object owned by `owner`, in the order the node returns them.
    async fn get_owned_objects(&self, owner: &SuiAddress) -> Result<Vec<ObjectId>>;

    /// Dynamic child fields of `parent`.
    async fn get_dynamic_fields(&self, parent: &ObjectId) -> Result<Vec<DynamicFieldInfo>>;
}
