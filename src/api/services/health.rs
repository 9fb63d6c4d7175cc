use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace, warn};

use crate::config::StaticConfig;
use crate::storage::{IndexHealth, IndexKind, IndexStore};

const NO_CONNECTION: &str = "No connection to index";
const KLADR_NOT_AVAILABLE: &str = "Index KLADR not available";

#[derive(Debug, Serialize)]
struct VersionData {
    version: String,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    data: VersionData,
    /// 始终为空对象
    error: serde_json::Map<String, serde_json::Value>,
}

/// Health Service
///
/// `/status` 只表示进程存活；版本接口会探测 KLADR 索引。
pub struct HealthService;

impl HealthService {
    pub async fn status() -> impl Responder {
        trace!("Received status request");
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    }

    pub async fn version(
        store: web::Data<Arc<dyn IndexStore>>,
        config: web::Data<Arc<StaticConfig>>,
    ) -> impl Responder {
        let start = Instant::now();
        let timeout = Duration::from_secs(config.index.timeout_secs.max(1));

        let health = match tokio::time::timeout(timeout, store.ping(IndexKind::Kladr)).await {
            Ok(Ok(health)) => health,
            Ok(Err(e)) => {
                error!("Index ping failed: {}", e);
                return Self::failure(NO_CONNECTION);
            }
            Err(_) => {
                error!("Index ping timed out after {:?}", timeout);
                return Self::failure(NO_CONNECTION);
            }
        };

        trace!("Index ping answered {:?} in {:?}", health, start.elapsed());

        match health {
            IndexHealth::Available => HttpResponse::Ok().json(VersionResponse {
                data: VersionData {
                    version: config.app.branch.clone(),
                },
                error: serde_json::Map::new(),
            }),
            IndexHealth::Missing => {
                warn!("KLADR index is missing");
                Self::failure(KLADR_NOT_AVAILABLE)
            }
            IndexHealth::Degraded(status) => {
                warn!("KLADR index answered {}", status);
                Self::failure(NO_CONNECTION)
            }
        }
    }

    fn failure(message: &'static str) -> HttpResponse {
        HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body(message)
    }
}

/// 存活与版本路由
pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(HealthService::status))
        .route("/status", web::head().to(HealthService::status))
        .service(
            web::resource(["/api/system/version", "/api/system/version/"])
                .route(web::get().to(HealthService::version)),
        );
}
