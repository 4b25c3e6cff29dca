use super::*;
use crate::session::MemorySessionStore;
use crate::test_helpers::{self, StubApi};
use crate::types::ListParams;
use serde_json::json;

async fn api(stub: &StubApi) -> Api {
    let base = stub.start().await;
    let transport = Transport::new(&test_helpers::config(&base), Arc::new(MemorySessionStore::new())).unwrap();
    Api::new(Arc::new(transport))
}

#[tokio::test]
async fn health_reads_message() {
    let stub = StubApi::new();
    stub.reply("GET", "/health", 200, json!({ "message": "API is running", "success": true }));
    let api = api(&stub).await;

    let health = api.health().await.unwrap();
    assert_eq!(health.message, "API is running");
    assert!(health.success);
}

#[tokio::test]
async fn templates_filter_by_category() {
    let stub = StubApi::new();
    stub.reply(
        "GET",
        "/templates",
        200,
        json!({
            "items": [{ "id": "t1", "name": "Folio", "category": "portfolio", "is_premium": true, "price": 1900 }],
            "total": 1, "page": 1, "size": 20, "pages": 1
        }),
    );
    stub.reply("GET", "/templates/t1", 200, json!({ "id": "t1", "name": "Folio" }));
    let api = api(&stub).await;

    let params = ListParams { category: Some("portfolio".into()), ..ListParams::default() };
    let page = api.templates.list(&params).await.unwrap();
    assert_eq!(page.total, 1);
    assert!(page.items[0].is_premium);
    assert_eq!(page.items[0].price, 1900);
    assert_eq!(stub.last("GET", "/templates").unwrap().query.as_deref(), Some("category=portfolio"));

    let template = api.templates.get("t1").await.unwrap();
    assert_eq!(template.name, "Folio");
}

#[tokio::test]
async fn hosting_sites_decode_list() {
    let stub = StubApi::new();
    stub.reply(
        "GET",
        "/hosting/sites",
        200,
        json!([
            { "website_id": "3", "website_name": "Folio", "subdomain": "folio",
              "hosting_url": "https://folio.example.app", "ssl_enabled": true, "status": "active" }
        ]),
    );
    let api = api(&stub).await;

    let sites = api.hosting.sites().await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].subdomain.as_deref(), Some("folio"));
    assert!(sites[0].ssl_enabled);
}
