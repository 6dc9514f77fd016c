use serde::Deserialize;
use serde_json::Value;

use crate::types::ObjectId;

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub code: i64,
    pub message: String,
}

/// One page of a cursor-paginated result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<Value>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// `sui_getObject` result.
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectResponse {
    pub data: Option<ObjectData>,
    pub error: Option<Value>,
}

/// Entry of `suix_getOwnedObjects`.
#[derive(Debug, Deserialize)]
pub(crate) struct OwnedObjectEntry {
    pub data: Option<OwnedObjectRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OwnedObjectRef {
    pub object_id: ObjectId,
}

/// An on-chain object with its Move content expanded.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectId,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub content: Option<ObjectContent>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectContent {
    pub data_type: String,
    #[serde(default, rename = "type")]
    pub type_tag: Option<String>,
    #[serde(default)]
    pub fields: Value,
}

impl ObjectData {
    /// Move type of the object's content, falling back to the top-level type.
    pub fn content_type(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.type_tag.as_deref())
            .or(self.object_type.as_deref())
    }

    /// Move struct fields of the object, if content was requested.
    pub fn fields(&self) -> Option<&Value> {
        self.content.as_ref().map(|c| &c.fields)
    }
}

/// Entry of `suix_getDynamicFields`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DynamicFieldInfo {
    pub name: Value,
    pub object_id: ObjectId,
    #[serde(default)]
    pub object_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_data_content_type() {
        let data: ObjectData = serde_json::from_value(json!({
            "objectId": "0x1",
            "version": "7",
            "content": {
                "dataType": "moveObject",
                "type": "0xP::widget::Widget",
                "fields": { "id": { "id": "0x1" } }
            }
        }))
        .unwrap();

        assert_eq!(data.content_type(), Some("0xP::widget::Widget"));
        assert_eq!(data.fields().unwrap()["id"]["id"], "0x1");
    }

    #[test]
    fn test_object_data_without_content() {
        let data: ObjectData = serde_json::from_value(json!({
            "objectId": "0x1",
            "type": "0x2::coin::Coin<0x2::sui::SUI>"
        }))
        .unwrap();

        assert_eq!(data.content_type(), Some("0x2::coin::Coin<0x2::sui::SUI>"));
        assert!(data.fields().is_none());
    }

    #[test]
    fn test_page_defaults() {
        let page: Page<DynamicFieldInfo> = serde_json::from_value(json!({
            "data": [{ "name": { "type": "0x2::object::ID", "value": "0xW" }, "objectId": "0xL" }]
        }))
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert!(!page.has_next_page);
        assert!(page.next_cursor.is_none());
    }
}
