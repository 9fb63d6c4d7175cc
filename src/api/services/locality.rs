use actix_web::{HttpRequest, HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::services::{LocalityService, LookupParams};
use crate::utils::ip::extract_client_ip;

pub struct LocalityApi;

impl LocalityApi {
    /// 单条匹配查询：`term` / `iterm` / `search` + 地区过滤
    pub async fn lookup(
        req: HttpRequest,
        service: web::Data<Arc<LocalityService>>,
    ) -> impl Responder {
        let start = Instant::now();
        let params = LookupParams::from_query_string(req.query_string());

        let matches = service.find(&params).await;

        info!(
            "Remote IP: {}; Query: {}; Found: {}; Time spent: {:?}",
            extract_client_ip(&req).unwrap_or_default(),
            req.query_string(),
            matches.len(),
            start.elapsed()
        );

        HttpResponse::Ok().json(matches)
    }
}

/// `/api/locality` 以及旧的 `/locality` 别名
pub fn locality_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/api/locality", "/api/locality/", "/locality", "/locality/"])
            .route(web::get().to(LocalityApi::lookup)),
    );
}
