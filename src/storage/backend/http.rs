//! HTTP index backend
//!
//! Talks to an Elasticsearch-compatible endpoint with `ureq`. Calls are
//! blocking and therefore executed on the tokio blocking pool.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use ureq::Agent;

use crate::config::IndexConfig;
use crate::errors::{LookupError, Result};
use crate::storage::models::IndexKind;
use crate::storage::query::SearchQuery;
use crate::storage::traits::{IndexHealth, IndexStore};

pub struct HttpIndexStore {
    agent: Agent,
    kladr_url: String,
    geoip_url: String,
}

impl HttpIndexStore {
    pub fn new(config: &IndexConfig) -> Self {
        // 状态码由调用方判断，不转成 ureq 错误
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Self::timeout(config)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            kladr_url: config.kladr_url.trim_end_matches('/').to_string(),
            geoip_url: config.geoip_url.trim_end_matches('/').to_string(),
        }
    }

    /// 0 秒超时会让所有请求立即失败，至少 1 秒
    fn timeout(config: &IndexConfig) -> Duration {
        Duration::from_secs(config.timeout_secs.max(1))
    }

    pub fn index_url(&self, index: IndexKind) -> &str {
        match index {
            IndexKind::Kladr => &self.kladr_url,
            IndexKind::GeoIp => &self.geoip_url,
        }
    }

    fn search_sync(agent: Agent, url: String, body: serde_json::Value) -> Result<String> {
        let resp = agent.post(&url).send_json(body)?;
        let status = resp.status().as_u16();
        let text = resp.into_body().read_to_string()?;

        if !(200..300).contains(&status) {
            warn!("Index response error from \"{}\" ({}): {}", url, status, text);
            return Err(LookupError::index_unavailable(format!(
                "{} answered {}",
                url, status
            )));
        }
        Ok(text)
    }

    fn ping_sync(agent: Agent, url: String) -> Result<IndexHealth> {
        let resp = agent.get(&url).call()?;
        let status = resp.status().as_u16();
        let text = resp.into_body().read_to_string().unwrap_or_default();

        Ok(match status {
            200 if !text.is_empty() => IndexHealth::Available,
            404 => IndexHealth::Missing,
            other => IndexHealth::Degraded(other),
        })
    }

    fn ensure_sync(agent: Agent, url: String, mapping: serde_json::Value) -> Result<bool> {
        let status = agent.head(&url).call()?.status().as_u16();
        match status {
            200 => Ok(false),
            404 => {
                let created = agent.put(&url).send_json(mapping)?.status().as_u16();
                if created == 200 {
                    Ok(true)
                } else {
                    Err(LookupError::index_response(format!(
                        "can't create index at {}: status {}",
                        url, created
                    )))
                }
            }
            other => Err(LookupError::index_response(format!(
                "unexpected status {} while checking {}",
                other, url
            ))),
        }
    }
}

/// Run a blocking closure on the blocking pool
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap_or_else(|e| {
        warn!("Index call spawn_blocking failed: {}", e);
        Err(LookupError::index_unavailable(e.to_string()))
    })
}

#[async_trait]
impl IndexStore for HttpIndexStore {
    async fn search(&self, index: IndexKind, query: &SearchQuery) -> Result<String> {
        let url = format!("{}/_search", self.index_url(index));
        let body = serde_json::to_value(query)?;
        trace!("Index query to {}: {}", url, body);

        let start = Instant::now();
        let agent = self.agent.clone();
        let result = run_blocking(move || Self::search_sync(agent, url, body)).await;
        debug!("Index {} search took {:?}", index, start.elapsed());
        result
    }

    async fn ping(&self, index: IndexKind) -> Result<IndexHealth> {
        let url = self.index_url(index).to_string();
        let agent = self.agent.clone();
        run_blocking(move || Self::ping_sync(agent, url)).await
    }

    async fn ensure_index(&self, index: IndexKind) -> Result<bool> {
        let url = self.index_url(index).to_string();
        let agent = self.agent.clone();
        let mapping = index.mapping();
        run_blocking(move || Self::ensure_sync(agent, url, mapping)).await
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}
