//! CORS middleware tests
//!
//! Build the middleware from `CorsConfig` and check the headers actix-cors emits.

use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, HttpResponse, web};

use kladr_lookup::config::CorsConfig;
use kladr_lookup::runtime::modes::server::build_cors_middleware;

async fn ok_handler() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

macro_rules! init_app {
    ($cors:expr) => {{
        let config: CorsConfig = $cors;
        test::init_service(
            App::new()
                .wrap(build_cors_middleware(&config))
                .route("/api/locality", web::get().to(ok_handler)),
        )
        .await
    }};
}

#[actix_rt::test]
async fn test_any_origin_drops_credentials() {
    let app = init_app!(CorsConfig::default());

    let req = TestRequest::get()
        .uri("/api/locality")
        .insert_header((header::ORIGIN, "https://shop.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert!(
        resp.headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
    assert!(
        !resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
    );
}

#[actix_rt::test]
async fn test_listed_origin_keeps_credentials() {
    let app = init_app!(CorsConfig {
        allowed_origins: vec!["https://shop.example".to_string()],
        ..CorsConfig::default()
    });

    let req = TestRequest::get()
        .uri("/api/locality")
        .insert_header((header::ORIGIN, "https://shop.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://shop.example"
    );
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[actix_rt::test]
async fn test_unlisted_origin_gets_no_cors_headers() {
    let app = init_app!(CorsConfig {
        allowed_origins: vec!["https://shop.example".to_string()],
        ..CorsConfig::default()
    });

    let req = TestRequest::get()
        .uri("/api/locality")
        .insert_header((header::ORIGIN, "https://evil.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(
        !resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[actix_rt::test]
async fn test_preflight_allows_get() {
    let app = init_app!(CorsConfig::default());

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/locality")
        .insert_header((header::ORIGIN, "https://shop.example"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    let methods = resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("GET"));
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_MAX_AGE).unwrap(),
        "3600"
    );
}
