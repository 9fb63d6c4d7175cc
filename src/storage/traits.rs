use async_trait::async_trait;

use super::models::IndexKind;
use super::query::SearchQuery;
use crate::errors::Result;

/// Result of probing an index endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexHealth {
    /// Endpoint answered 200 with a body
    Available,
    /// Endpoint answered 404: the index does not exist
    Missing,
    /// Any other answer (status code, `200` when the body was empty)
    Degraded(u16),
}

/// Search index access
///
/// Implementations must be stateless across calls: every request issues
/// its own calls and no result is shared between requests.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Run a query and return the raw response body.
    ///
    /// Non-success statuses and transport failures are reported as
    /// `IndexUnavailable`.
    async fn search(&self, index: IndexKind, query: &SearchQuery) -> Result<String>;

    /// Probe the index endpoint itself
    async fn ping(&self, index: IndexKind) -> Result<IndexHealth>;

    /// Create the index with its mapping when it does not exist yet.
    ///
    /// Returns `true` when the index was created by this call.
    async fn ensure_index(&self, index: IndexKind) -> Result<bool>;

    /// 获取 store 名称（用于日志）
    fn name(&self) -> &'static str;
}
