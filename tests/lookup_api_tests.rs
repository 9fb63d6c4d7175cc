//! Lookup API integration tests
//!
//! 使用内存索引驱动完整的 actix 应用，覆盖 locality、for_select、geoip、status/version。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use async_trait::async_trait;
use serde_json::{Value, json};

use kladr_lookup::config::StaticConfig;
use kladr_lookup::errors::Result;
use kladr_lookup::runtime::lifetime::startup::StartupContext;
use kladr_lookup::runtime::modes::server::configure_app;
use kladr_lookup::storage::{
    GeoIpDocument, IndexHealth, IndexKind, IndexStore, LocalityDocument, MemoryIndexStore,
    SearchQuery,
};

// =============================================================================
// 测试数据
// =============================================================================

/// "каз", percent-encoded
const KAZ: &str = "%D0%BA%D0%B0%D0%B7";
/// "село", percent-encoded
const SELO: &str = "%D1%81%D0%B5%D0%BB%D0%BE";

fn locality(id: i64, name: &str, title: &str, status: i64) -> LocalityDocument {
    LocalityDocument {
        id,
        status,
        full_name: format!("{} {}, Татарстан Респ", name, title),
        locality_title: title.to_string(),
        locality_name: name.to_string(),
        region_id: Some(16),
        region_title: "Татарстан Респ".to_string(),
        region_code: 16,
    }
}

fn region(id: i64, name: &str, title: &str) -> LocalityDocument {
    LocalityDocument {
        id,
        status: 10,
        full_name: format!("{} {}", name, title),
        locality_title: title.to_string(),
        locality_name: name.to_string(),
        region_id: None,
        region_title: String::new(),
        region_code: 0,
    }
}

fn seeded_store() -> MemoryIndexStore {
    let villages = (1..=35).map(|i| locality(100 + i, &format!("Село{:02}", i), "с", 0));

    MemoryIndexStore::new()
        .with_localities([
            locality(1, "Казанское", "с", 9),
            locality(2, "Казань", "г", 1),
            locality(3, "Kazan", "г", 1),
            region(16, "Татарстан", "Респ"),
            region(50, "Московская", "обл"),
        ])
        .with_localities(villages)
        .with_geoip([
            GeoIpDocument::from_block(1, "5.5.5.0 - 5.5.5.255", "Kazan", "", "", "RU").unwrap(),
            GeoIpDocument::from_block(2, "6.6.6.0-6.6.6.255", "", "", "", "RU").unwrap(),
        ])
}

fn context(store: impl IndexStore + 'static) -> StartupContext {
    StartupContext::with_store(Arc::new(StaticConfig::default()), Arc::new(store))
}

macro_rules! init_app {
    ($store:expr) => {{
        let ctx = context($store);
        test::init_service(App::new().configure(move |cfg| configure_app(&ctx, cfg))).await
    }};
}

/// Store whose KLADR index is reported missing
struct MissingIndexStore;

#[async_trait]
impl IndexStore for MissingIndexStore {
    async fn search(&self, _index: IndexKind, _query: &SearchQuery) -> Result<String> {
        Ok(r#"{"hits":{"total":{"value":0},"hits":[]}}"#.to_string())
    }

    async fn ping(&self, _index: IndexKind) -> Result<IndexHealth> {
        Ok(IndexHealth::Missing)
    }

    async fn ensure_index(&self, _index: IndexKind) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "Missing"
    }
}

// =============================================================================
// /api/locality
// =============================================================================

#[actix_rt::test]
async fn test_locality_single_match() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri(&format!("/api/locality?term={}", KAZ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(
        items[0],
        json!({
            "id": 2,
            "title": "Казань город, Татарстан Респ",
            "locality_type": {"title": "город"},
            "region": {"id": 16, "title": "Татарстан Респ", "region_code": 16}
        })
    );
    assert_eq!(items[1]["id"], 1);
    assert_eq!(items[1]["locality_type"]["title"], "село");
}

#[actix_rt::test]
async fn test_locality_route_aliases() {
    let app = init_app!(seeded_store());

    for path in ["/api/locality/", "/locality", "/locality/"] {
        let req = TestRequest::get()
            .uri(&format!("{}?term={}", path, KAZ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 2, "{}", path);
    }
}

#[actix_rt::test]
async fn test_locality_non_numeric_region_is_empty() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri(&format!("/api/locality?term={}&region_id=abc", KAZ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_rt::test]
async fn test_locality_regions_only() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri("/api/locality?search=%D0%A2%D0%B0%D1%82&regions_only=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!([{
            "id": 16,
            "title": "Татарстан Респ",
            "locality_type": {"title": "республика"},
            "region": null
        }])
    );
}

#[actix_rt::test]
async fn test_locality_unavailable_index_is_empty() {
    let app = init_app!(MemoryIndexStore::unavailable());

    let req = TestRequest::get()
        .uri(&format!("/api/locality?term={}", KAZ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

// =============================================================================
// /api/kladr/for_select
// =============================================================================

#[actix_rt::test]
async fn test_for_select_first_page() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri(&format!("/api/kladr/for_select?search={}", SELO))
        .insert_header(("X-Real-Url", "https://kladr.example.org/for_select"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 35);
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(
        body["next"],
        format!("https://kladr.example.org/for_select?page=2&search={}", SELO)
    );
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 30);
    assert_eq!(results[0], json!({"id": 101, "text": "Село01 село"}));
}

#[actix_rt::test]
async fn test_for_select_last_page_uses_host() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri(&format!("/api/kladr/for_select/?search={}&page=2", SELO))
        .insert_header(("Host", "kladr.test"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 35);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(
        body["previous"],
        format!("http://kladr.test/api/kladr/for_select/?search={}", SELO)
    );
    assert_eq!(body["results"].as_array().unwrap().len(), 5);
}

#[actix_rt::test]
async fn test_for_select_page_beyond_last_is_404() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri(&format!("/api/kladr/for_select?search={}&page=3", SELO))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_for_select_no_match_is_404() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri("/api/kladr/for_select?search=zzz")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_for_select_cities_and_regions_flag() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get()
        .uri("/api/kladr/for_select?search=%D0%BC%D0%BE%D1%81&cities_and_regions=1&regions_only=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"], json!([{"id": 50, "text": "Московская область"}]));
}

// =============================================================================
// /api/geoip
// =============================================================================

#[actix_rt::test]
async fn test_geoip_resolves_city() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get().uri("/api/geoip?ip=5.5.5.17").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!(items[0]["title"].as_str().unwrap().contains("Kazan"));
}

#[actix_rt::test]
async fn test_geoip_unresolved_is_empty_object() {
    let app = init_app!(seeded_store());

    for ip in ["8.8.8.8", "6.6.6.6"] {
        let req = TestRequest::get()
            .uri(&format!("/api/geoip/?ip={}", ip))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({}), "{}", ip);
    }
}

#[actix_rt::test]
async fn test_geoip_malformed_ip_is_empty_array() {
    let app = init_app!(seeded_store());

    for uri in [
        "/api/geoip?ip=abc",
        "/api/geoip?ip=1.2.3",
        "/api/geoip?ip=%205.5.5.17%20",
        "/api/geoip",
    ] {
        let req = TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([]), "{}", uri);
    }
}

// =============================================================================
// /status, /api/system/version
// =============================================================================

#[actix_rt::test]
async fn test_status() {
    let app = init_app!(MemoryIndexStore::unavailable());

    let req = TestRequest::get().uri("/status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"status": "ok"}));
}

#[actix_rt::test]
async fn test_version_reports_branch() {
    let app = init_app!(seeded_store());

    let req = TestRequest::get().uri("/api/system/version").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"data": {"version": "dev"}, "error": {}}));
}

#[actix_rt::test]
async fn test_version_without_connection() {
    let app = init_app!(MemoryIndexStore::unavailable());

    let req = TestRequest::get().uri("/api/system/version").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert_eq!(body, "No connection to index");
}

#[actix_rt::test]
async fn test_version_missing_index() {
    let app = init_app!(MissingIndexStore);

    let req = TestRequest::get().uri("/api/system/version/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Index KLADR not available");
}
