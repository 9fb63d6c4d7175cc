use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::StaticConfig;
use crate::services::{GeoResolver, LocalityService};
use crate::storage::{IndexHealth, IndexKind, IndexStore, StorageFactory};

/// Everything the HTTP workers share; read-only after start-up
#[derive(Clone)]
pub struct StartupContext {
    pub config: Arc<StaticConfig>,
    pub store: Arc<dyn IndexStore>,
    pub localities: Arc<LocalityService>,
    pub geo: Arc<GeoResolver>,
}

impl StartupContext {
    /// Wire the services on top of an existing store
    pub fn with_store(config: Arc<StaticConfig>, store: Arc<dyn IndexStore>) -> Self {
        let localities = Arc::new(LocalityService::new(store.clone(), &config.search));
        let geo = Arc::new(GeoResolver::new(localities.clone()));
        Self {
            config,
            store,
            localities,
            geo,
        }
    }
}

/// 准备服务器启动的上下文
///
/// 索引不可用时只记录警告，不阻止启动：查询会退化为空结果。
pub async fn prepare_server_startup(config: Arc<StaticConfig>) -> Result<StartupContext> {
    let start_time = Instant::now();
    debug!("Starting pre-startup processing...");

    let store = StorageFactory::create(&config.index);

    for index in [IndexKind::Kladr, IndexKind::GeoIp] {
        match store.ping(index).await {
            Ok(IndexHealth::Available) => info!("Index {} is available", index),
            Ok(IndexHealth::Missing) => {
                warn!("Index {} does not exist; run `init-index` to create it", index)
            }
            Ok(IndexHealth::Degraded(status)) => {
                warn!("Index {} answered with status {}", index, status)
            }
            Err(e) => warn!("Index {} is unreachable: {}", index, e),
        }
    }

    let context = StartupContext::with_store(config, store);
    debug!("Pre-startup completed in {:?}", start_time.elapsed());
    Ok(context)
}
