use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::services::{ListOutcome, LocalityService, LookupParams};
use crate::utils::ip::extract_client_ip;

/// Canonical URL set by the reverse proxy
const REAL_URL_HEADER: &str = "x-real-url";

pub struct KladrApi;

impl KladrApi {
    /// Paginated listing for select widgets
    pub async fn for_select(
        req: HttpRequest,
        service: web::Data<Arc<LocalityService>>,
    ) -> impl Responder {
        let start = Instant::now();
        let params = LookupParams::from_query_string(req.query_string());
        let base_url = request_base_url(&req);

        let outcome = service.list(&params, &base_url).await;
        let count = match &outcome {
            ListOutcome::Page(list) => list.count,
            ListOutcome::NotFound { count } => *count,
        };

        info!(
            "Remote IP: {}; Query: {}; Found: {}; Time spent: {:?}",
            extract_client_ip(&req).unwrap_or_default(),
            req.query_string(),
            count,
            start.elapsed()
        );

        match outcome {
            ListOutcome::Page(list) => HttpResponse::Ok().json(list),
            ListOutcome::NotFound { .. } => HttpResponse::NotFound()
                .content_type("text/plain; charset=utf-8")
                .body("not found"),
        }
    }
}

fn real_url(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REAL_URL_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// The caller's own URL without query: proxy header first, then scheme + host + path
pub fn request_base_url(req: &HttpRequest) -> String {
    real_url(req.headers()).unwrap_or_else(|| {
        let conn = req.connection_info();
        format!("{}://{}{}", conn.scheme(), conn.host(), req.path())
    })
}

pub fn kladr_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/api/kladr/for_select", "/api/kladr/for_select/"])
            .route(web::get().to(KladrApi::for_select)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_base_url_from_proxy_header() {
        let req = TestRequest::get()
            .uri("/api/kladr/for_select?search=a")
            .insert_header(("X-Real-Url", "https://kladr.example.org/select"))
            .to_http_request();
        assert_eq!(request_base_url(&req), "https://kladr.example.org/select");
    }

    #[test]
    fn test_base_url_reconstructed() {
        let req = TestRequest::get()
            .uri("/api/kladr/for_select/?search=a")
            .insert_header(("Host", "kladr.local:8080"))
            .to_http_request();
        assert_eq!(
            request_base_url(&req),
            "http://kladr.local:8080/api/kladr/for_select/"
        );
    }
}
