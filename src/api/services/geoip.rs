use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::services::{GeoOutcome, GeoResolver};
use crate::utils::ip::extract_client_ip;

pub struct GeoIpApi;

impl GeoIpApi {
    pub async fn lookup(req: HttpRequest, resolver: web::Data<Arc<GeoResolver>>) -> impl Responder {
        let start = Instant::now();
        let ip = url::form_urlencoded::parse(req.query_string().as_bytes())
            .find(|(key, _)| key == "ip")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        let outcome = resolver.resolve(&ip).await;

        info!(
            "Remote IP: {}; Query: {}; Outcome: {:?}; Time spent: {:?}",
            extract_client_ip(&req).unwrap_or_default(),
            req.query_string(),
            outcome,
            start.elapsed()
        );

        match outcome {
            GeoOutcome::InvalidAddress => HttpResponse::Ok().json(json!([])),
            GeoOutcome::Unresolved => HttpResponse::Ok().json(json!({})),
            GeoOutcome::Resolved(matches) => HttpResponse::Ok().json(matches),
        }
    }
}

pub fn geoip_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/api/geoip", "/api/geoip/"]).route(web::get().to(GeoIpApi::lookup)),
    );
}
