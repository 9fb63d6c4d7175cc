//! Locality lookup service
//!
//! Compiles lookup parameters, runs them against the address index and
//! projects the hits. Failures never reach the caller: an invalid
//! parameter or an unreachable index both yield an empty result.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::config::SearchConfig;
use crate::services::projector::{
    self, LocalityList, LocalityMatch, PageLinks, is_beyond_last_page,
};
use crate::services::query::{LookupParams, QueryCompiler};
use crate::storage::{IndexKind, IndexStore, SearchQuery};

/// Run one index call; `None` when the store failed (already logged)
pub(crate) async fn search_logged(
    store: &dyn IndexStore,
    index: IndexKind,
    query: &SearchQuery,
) -> Option<String> {
    let start = Instant::now();
    match store.search(index, query).await {
        Ok(body) => Some(body),
        Err(e) => {
            let body = serde_json::to_string(query).unwrap_or_default();
            error!(
                "Index {} search failed after {:?}: {} (query: {})",
                index,
                start.elapsed(),
                e,
                body
            );
            None
        }
    }
}

/// Outcome of the paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    Page(LocalityList),
    /// Nothing matched, or the page lies past the last hit
    NotFound { count: u64 },
}

pub struct LocalityService {
    store: Arc<dyn IndexStore>,
    compiler: QueryCompiler,
}

impl LocalityService {
    pub fn new(store: Arc<dyn IndexStore>, config: &SearchConfig) -> Self {
        Self {
            store,
            compiler: QueryCompiler::new(config),
        }
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    pub fn store(&self) -> &Arc<dyn IndexStore> {
        &self.store
    }

    async fn run(&self, params: &LookupParams) -> Option<String> {
        let query = match self.compiler.compile(params) {
            Ok(query) => query,
            Err(e) => {
                debug!("No query for {:?}: {}", params, e);
                return None;
            }
        };
        search_logged(self.store.as_ref(), IndexKind::Kladr, &query).await
    }

    /// Single-match lookup
    pub async fn find(&self, params: &LookupParams) -> Vec<LocalityMatch> {
        match self.run(params).await {
            Some(body) => projector::project_matches(&body),
            None => Vec::new(),
        }
    }

    /// Paginated lookup; `base_url` is the caller's own URL without query
    pub async fn list(&self, params: &LookupParams, base_url: &str) -> ListOutcome {
        let page_size = self.compiler.page_size(params);
        let (results, count) = match self.run(params).await {
            Some(body) => projector::project_list(&body),
            None => (Vec::new(), 0),
        };

        if is_beyond_last_page(count, params.page, page_size) {
            return ListOutcome::NotFound { count };
        }

        let links = PageLinks::new(base_url, params);
        ListOutcome::Page(LocalityList::assemble(
            results,
            count,
            params.page,
            page_size,
            &links,
        ))
    }

    /// Best locality for a city name, at most one
    pub async fn best_for_city(&self, city: &str) -> Vec<LocalityMatch> {
        let query = self.compiler.compile_city(city);
        match search_logged(self.store.as_ref(), IndexKind::Kladr, &query).await {
            Some(body) => projector::project_matches(&body),
            None => Vec::new(),
        }
    }
}
