//! Index response → API result shapes

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::services::abbreviation::{Expander, expand, fix_full_name};
use crate::services::query::LookupParams;
use crate::storage::{LocalityDocument, SearchResponse};

// ============ Wire shapes ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityType {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRef {
    pub id: i64,
    pub title: String,
    pub region_code: i64,
}

/// One item of the single-match response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityMatch {
    pub id: i64,
    /// Full name with the city token expanded
    #[serde(rename = "title")]
    pub full_name: String,
    pub locality_type: LocalityType,
    /// `null` for top-level regions
    pub region: Option<RegionRef>,
}

impl From<LocalityDocument> for LocalityMatch {
    fn from(doc: LocalityDocument) -> Self {
        let expander = Expander::for_document(doc.is_top_level());
        let region = doc.parent_region().map(|id| RegionRef {
            id,
            title: doc.region_title.clone(),
            region_code: doc.region_code,
        });

        Self {
            id: doc.id,
            full_name: fix_full_name(&doc.full_name),
            locality_type: LocalityType {
                title: expander.expand(&doc.locality_title).to_string(),
            },
            region,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: i64,
    pub text: String,
}

impl From<LocalityDocument> for ListItem {
    fn from(doc: LocalityDocument) -> Self {
        Self {
            id: doc.id,
            text: format!("{} {}", doc.locality_name, expand(&doc.locality_title)),
        }
    }
}

/// Paginated list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityList {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<ListItem>,
}

// ============ Projection ============

fn parse_localities(body: &str) -> Option<SearchResponse<LocalityDocument>> {
    match SearchResponse::parse(body) {
        Ok(resp) => Some(resp),
        Err(e) => {
            warn!("Unparseable index response, treating as empty: {}", e);
            None
        }
    }
}

/// Every matched document as a single-match item
pub fn project_matches(body: &str) -> Vec<LocalityMatch> {
    parse_localities(body)
        .map(|resp| resp.into_sources().into_iter().map(Into::into).collect())
        .unwrap_or_default()
}

/// List items plus total hit count.
///
/// Items are only taken when the count is positive.
pub fn project_list(body: &str) -> (Vec<ListItem>, u64) {
    let Some(resp) = parse_localities(body) else {
        return (Vec::new(), 0);
    };
    let count = resp.total();
    if count == 0 {
        return (Vec::new(), 0);
    }
    (resp.into_sources().into_iter().map(Into::into).collect(), count)
}

// ============ Navigation ============

fn escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Builds `previous`/`next` links on top of the caller's own URL
#[derive(Debug, Clone)]
pub struct PageLinks<'a> {
    base_url: &'a str,
    search: &'a str,
    /// `cities_and_regions` wins over `regions_only`
    mode_flag: Option<(&'static str, &'a str)>,
}

impl<'a> PageLinks<'a> {
    pub fn new(base_url: &'a str, params: &'a LookupParams) -> Self {
        let mode_flag = params
            .cities_and_regions
            .as_deref()
            .map(|raw| ("cities_and_regions", raw))
            .or_else(|| params.regions_only.as_deref().map(|raw| ("regions_only", raw)));

        Self {
            base_url,
            search: params.search.as_deref().unwrap_or_default(),
            mode_flag,
        }
    }

    fn url(&self, page: Option<u32>) -> String {
        let mut url = String::from(self.base_url);
        url.push('?');
        if let Some(page) = page {
            url.push_str(&format!("page={}&", page));
        }
        url.push_str("search=");
        url.push_str(&escape(self.search));
        if let Some((key, raw)) = self.mode_flag {
            url.push_str(&format!("&{}={}", key, escape(raw)));
        }
        url
    }

    /// Page 1 has none; page 2 links back without a `page` parameter
    pub fn previous(&self, page: u32) -> Option<String> {
        match page {
            0 | 1 => None,
            2 => Some(self.url(None)),
            n => Some(self.url(Some(n - 1))),
        }
    }

    pub fn next(&self, page: u32, page_size: u32, count: u64) -> Option<String> {
        if u64::from(page_size) * u64::from(page) >= count {
            None
        } else {
            Some(self.url(Some(page + 1)))
        }
    }
}

impl LocalityList {
    /// Assemble a list page; links are only computed when something matched
    pub fn assemble(
        results: Vec<ListItem>,
        count: u64,
        page: u32,
        page_size: u32,
        links: &PageLinks<'_>,
    ) -> Self {
        let (next, previous) = if count > 0 {
            (links.next(page, page_size, count), links.previous(page))
        } else {
            (None, None)
        };

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Nothing matched, or the requested page starts past the last hit
pub fn is_beyond_last_page(count: u64, page: u32, page_size: u32) -> bool {
    count == 0 || u64::from(page_size) * u64::from(page.saturating_sub(1)) >= count
}
