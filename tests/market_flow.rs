use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::{json, Value};

use widget_market::dashboard::{ActionRequest, Notice, Outcome};
use widget_market::types::{MarketplaceRef, ObjectId, SuiAddress};
use widget_market::{
    App, ChainReader, HttpWallet, MarketActions, MarketReader, SuiRpcClient, WalletSession,
};

fn rpc_result(result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result })
}

async fn mock_object(server: &MockServer, id: &str, type_tag: &str, fields: Value) {
    let selector = format!("\"params\":[\"{id}\",");
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("sui_getObject")
                .body_includes(selector.as_str());
            then.status(200).json_body(rpc_result(json!({
                "data": {
                    "objectId": id,
                    "version": "1",
                    "type": type_tag,
                    "content": { "dataType": "moveObject", "type": type_tag, "fields": fields }
                }
            })));
        })
        .await;
}

async fn mock_marketplace(server: &MockServer, listings: &[(&str, &str, &str, &str)]) {
    mock_object(
        server,
        "0xM",
        "0xP::marketplace::Marketplace<0x2::sui::SUI>",
        json!({
            "id": { "id": "0xM" },
            "items": { "type": "0x2::bag::Bag", "fields": { "id": { "id": "0xitems" }, "size": "2" } },
            "payments": { "type": "0x2::table::Table", "fields": { "id": { "id": "0xpay" } } }
        }),
    )
    .await;

    let entries: Vec<Value> = listings
        .iter()
        .map(|(listing, widget, _, _)| {
            json!({
                "name": { "type": "0x2::object::ID", "value": widget },
                "objectId": listing,
                "objectType": "0xP::marketplace::Listing"
            })
        })
        .collect();
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("suix_getDynamicFields")
                .body_includes("\"0xitems\"");
            then.status(200).json_body(rpc_result(json!({
                "data": entries,
                "nextCursor": null,
                "hasNextPage": false
            })));
        })
        .await;

    for (listing, widget, ask, owner) in listings {
        mock_object(
            server,
            listing,
            "0x2::dynamic_field::Field<0x2::object::ID, 0xP::marketplace::Listing>",
            json!({
                "id": { "id": listing },
                "name": widget,
                "value": { "type": "0xP::marketplace::Listing", "fields": { "ask": ask, "owner": owner } }
            }),
        )
        .await;
    }
}

fn market() -> MarketplaceRef {
    MarketplaceRef::new(ObjectId::from("0xP"), ObjectId::from("0xM"))
}

#[tokio::test]
async fn test_listings_over_rpc_keep_order() {
    let server = MockServer::start_async().await;
    mock_marketplace(
        &server,
        &[
            ("0xL1", "0xW1", "100", "0xOwner1"),
            ("0xL2", "0xW2", "250", "0xOwner2"),
        ],
    )
    .await;

    let chain: Arc<dyn ChainReader> = Arc::new(SuiRpcClient::new(server.url("/")));
    let reader = MarketReader::new(chain, market(), 2);
    let rows = reader.listings().await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].lines(),
        [
            "listingId: 0xL1".to_string(),
            "askPrice: 100".to_string(),
            "owner: 0xOwner1".to_string(),
            "widget: 0xW1".to_string(),
        ]
    );
    assert_eq!(rows[1].listing_id, ObjectId::from("0xL2"));
    assert_eq!(rows[1].ask_price, "250");
}

#[tokio::test]
async fn test_owned_widgets_over_rpc_skip_other_types() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .body_includes("suix_getOwnedObjects")
                .body_includes("\"0xA\"");
            then.status(200).json_body(rpc_result(json!({
                "data": [
                    { "data": { "objectId": "0xW1" } },
                    { "data": { "objectId": "0xC1" } },
                    { "data": { "objectId": "0xW2" } }
                ],
                "nextCursor": null,
                "hasNextPage": false
            })));
        })
        .await;
    mock_object(&server, "0xW1", "0xP::widget::Widget", json!({ "id": { "id": "0xW1" } })).await;
    mock_object(&server, "0xC1", "0x2::coin::Coin<0x2::sui::SUI>", json!({ "balance": "5" })).await;
    mock_object(&server, "0xW2", "0xP::widget::Widget", json!({ "id": { "id": "0xW2" } })).await;

    let chain: Arc<dyn ChainReader> = Arc::new(SuiRpcClient::new(server.url("/")));
    let reader = MarketReader::new(chain, market(), 8);
    let widgets = reader
        .owned_widgets(&SuiAddress::from("0xA"))
        .await
        .unwrap();

    assert_eq!(widgets, vec![ObjectId::from("0xW1"), ObjectId::from("0xW2")]);
}

#[tokio::test]
async fn test_dashboard_session_against_services() {
    let chain_server = MockServer::start_async().await;
    mock_marketplace(&chain_server, &[("0xL1", "0xW1", "100", "0xOwner")]).await;

    let wallet_server = MockServer::start_async().await;
    wallet_server
        .mock_async(|when, then| {
            when.method(GET).path("/account");
            then.status(200).json_body(json!({ "address": "0xA" }));
        })
        .await;
    let mint = wallet_server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/sign-and-execute")
                .body_includes("0xP::widget::mint");
            then.status(200).json_body(json!({
                "digest": "D1",
                "effects": {
                    "status": { "status": "success" },
                    "created": [{ "reference": { "objectId": "0xW9" }, "owner": { "AddressOwner": "0xA" } }]
                }
            }));
        })
        .await;

    let mut app = App::new(Duration::from_millis(3000));
    if let widget_market::dashboard::Screen::IdEntry(entry) = &mut app.screen {
        entry.package_id = "0xP".to_string();
        entry.marketplace_id = "0xM".to_string();
    }
    let market = app.submit_ids().unwrap();

    let chain: Arc<dyn ChainReader> = Arc::new(SuiRpcClient::new(chain_server.url("/")));
    let wallet: Arc<dyn WalletSession> = Arc::new(HttpWallet::new(wallet_server.base_url()));
    wallet.connect().await.unwrap();
    app.state.set_account(wallet.active_account());

    let actions = MarketActions::new(MarketReader::new(chain, market, 8), wallet);

    let notice = app.state.apply(actions.run(ActionRequest::Mint).await);
    mint.assert_async().await;
    assert_eq!(notice, Notice::Toast("Successfully minted widget!".to_string()));

    let outcome = actions.run(ActionRequest::RefreshListings).await;
    assert!(matches!(outcome, Outcome::Listings(_)));
    app.state.apply(outcome);
    assert_eq!(app.state.listings.len(), 1);
    assert_eq!(app.state.listings[0].owner, "0xOwner");
    assert!(app.state.alert().is_none());
}
