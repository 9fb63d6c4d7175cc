use std::sync::Arc;

use tracing::info;

use crate::config::IndexConfig;

pub mod backend;
pub mod models;
pub mod query;
pub mod response;
pub mod traits;

pub use backend::{HttpIndexStore, MemoryIndexStore};
pub use models::{GeoIpDocument, IndexKind, LocalityDocument};
pub use query::SearchQuery;
pub use response::SearchResponse;
pub use traits::{IndexHealth, IndexStore};

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &IndexConfig) -> Arc<dyn IndexStore> {
        let store = HttpIndexStore::new(config);
        info!(
            "Using {} index store: kladr={}, geoip={}",
            store.name(),
            config.kladr_url,
            config.geoip_url
        );
        Arc::new(store)
    }
}
