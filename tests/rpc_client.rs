use httpmock::prelude::*;
use serde_json::json;

use widget_market::types::{ObjectId, SuiAddress};
use widget_market::{ChainReader, SuiRpcClient};

fn rpc_result(result: serde_json::Value) -> serde_json::Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

#[tokio::test]
async fn test_get_object_with_content() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("\"method\":\"sui_getObject\"")
                .body_includes("\"showContent\":true");
            then.status(200).json_body(rpc_result(json!({
                "data": {
                    "objectId": "0xW1",
                    "version": "7",
                    "type": "0xP::widget::Widget",
                    "content": {
                        "dataType": "moveObject",
                        "type": "0xP::widget::Widget",
                        "fields": { "id": { "id": "0xW1" } }
                    }
                }
            })));
        })
        .await;

    let client = SuiRpcClient::new(server.url("/"));
    let object = client.get_object(&ObjectId::from("0xW1")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(object.object_id, ObjectId::from("0xW1"));
    assert_eq!(object.content_type(), Some("0xP::widget::Widget"));
}

#[tokio::test]
async fn test_get_object_missing_is_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(rpc_result(json!({
                "error": { "code": "notExists", "object_id": "0xgone" }
            })));
        })
        .await;

    let client = SuiRpcClient::new(server.url("/"));
    let err = client
        .get_object(&ObjectId::from("0xgone"))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("0xgone"));
}

#[tokio::test]
async fn test_owned_objects_follow_cursor() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("suix_getOwnedObjects")
                .body_includes("\"params\":[\"0xA\",null,null,null]");
            then.status(200).json_body(rpc_result(json!({
                "data": [
                    { "data": { "objectId": "0xW1", "version": "1", "digest": "d1" } },
                    { "error": { "code": "deleted" } }
                ],
                "nextCursor": "cur1",
                "hasNextPage": true
            })));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("suix_getOwnedObjects")
                .body_includes("\"cur1\"");
            then.status(200).json_body(rpc_result(json!({
                "data": [
                    { "data": { "objectId": "0xC1", "version": "3", "digest": "d2" } }
                ],
                "nextCursor": "cur2",
                "hasNextPage": false
            })));
        })
        .await;

    let client = SuiRpcClient::new(server.url("/"));
    let owned = client
        .get_owned_objects(&SuiAddress::from("0xA"))
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(owned, vec![ObjectId::from("0xW1"), ObjectId::from("0xC1")]);
}

#[tokio::test]
async fn test_dynamic_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("suix_getDynamicFields")
                .body_includes("\"0xitems\"");
            then.status(200).json_body(rpc_result(json!({
                "data": [
                    {
                        "name": { "type": "0x2::object::ID", "value": "0xW1" },
                        "objectId": "0xL1",
                        "objectType": "0xP::marketplace::Listing"
                    }
                ],
                "nextCursor": null,
                "hasNextPage": false
            })));
        })
        .await;

    let client = SuiRpcClient::new(server.url("/"));
    let fields = client
        .get_dynamic_fields(&ObjectId::from("0xitems"))
        .await
        .unwrap();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].object_id, ObjectId::from("0xL1"));
}

#[tokio::test]
async fn test_rpc_error_surfaces_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(200).json_body(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32602, "message": "Invalid params" }
            }));
        })
        .await;

    let client = SuiRpcClient::new(server.url("/"));
    let err = client
        .get_dynamic_fields(&ObjectId::from("0xitems"))
        .await
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("suix_getDynamicFields"));
    assert!(message.contains("Invalid params"));
}

#[tokio::test]
async fn test_http_error_is_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/");
            then.status(503);
        })
        .await;

    let client = SuiRpcClient::new(server.url("/"));
    assert!(client
        .get_object(&ObjectId::from("0xM"))
        .await
        .is_err());
}
