//! Lookup parameters → index query
//!
//! Rules, in order of precedence:
//! 1. term source: `term` (prefix) > `iterm` (substring) > `search` (prefix)
//! 2. a term with punctuation degrades to a match-all wildcard
//! 3. two whitespace-separated words become a prefix clause plus a substring clause
//! 4. the request mode picks eligible locality types and boosts
//! 5. non-numeric region filters yield no query at all
//! 6. `search` switches to the list page size
//!
//! Hits are ordered by relevance, then by `status` descending.

use crate::config::SearchConfig;
use crate::errors::{LookupError, Result};
use crate::storage::query::{
    BoolQuery, BoostMode, FunctionScore, Query, ScoreFunction, SearchQuery, SortClause,
};

use super::params::{LookupParams, NumericParam};

pub const FIELD_LOCALITY_NAME: &str = "locality_name";
pub const FIELD_LOCALITY_TITLE: &str = "locality_title";
pub const FIELD_REGION_ID: &str = "region_id";
pub const FIELD_REGION_CODE: &str = "region_code";
pub const FIELD_STATUS: &str = "status";

/// Locality types eligible by default
pub const DEFAULT_TYPES: &[&str] = &["г", "п", "с", "х", "д", "нп", "п/ст", "сл", "снт"];

/// Default types plus region-level ones, used by `search`
pub const SEARCH_TYPES: &[&str] = &[
    "край", "обл", "р-н", "г", "п", "с", "х", "д", "нп", "п/ст", "сл", "снт",
];

pub const CITIES_AND_REGIONS_TYPES: &[&str] = &["край", "обл", "г"];

const DEFAULT_BOOSTS: &[(&str, u32)] = &[("г", 200), ("п", 100)];

const SEARCH_BOOSTS: &[(&str, u32)] = &[
    ("г", 200),
    ("край", 170),
    ("обл", 170),
    ("р-н", 170),
    ("п", 100),
];

/// Characters that make a term unusable as a wildcard pattern
const FORBIDDEN_TERM_CHARS: &[char] = &['!', '?', '\\', ',', '.', '/', '(', ')'];

/// What the request asks for; decides type filter and boosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Default,
    Search,
    RegionsOnly,
    CitiesAndRegions,
}

impl RequestMode {
    pub fn of(params: &LookupParams) -> Self {
        if params.is_cities_and_regions() {
            RequestMode::CitiesAndRegions
        } else if params.is_regions_only() {
            RequestMode::RegionsOnly
        } else if params.is_list_mode() {
            RequestMode::Search
        } else {
            RequestMode::Default
        }
    }

    /// Structural clause restricting eligible documents
    pub fn type_filter(&self) -> Query {
        match self {
            RequestMode::Default => Query::terms(FIELD_LOCALITY_TITLE, DEFAULT_TYPES.iter().copied()),
            RequestMode::Search => Query::terms(FIELD_LOCALITY_TITLE, SEARCH_TYPES.iter().copied()),
            // 顶级地区：region_code == 0
            RequestMode::RegionsOnly => Query::terms(FIELD_REGION_CODE, [0i64]),
            RequestMode::CitiesAndRegions => {
                Query::terms(FIELD_LOCALITY_TITLE, CITIES_AND_REGIONS_TYPES.iter().copied())
            }
        }
    }

    pub fn boosts(&self) -> &'static [(&'static str, u32)] {
        match self {
            RequestMode::Default => DEFAULT_BOOSTS,
            RequestMode::Search => SEARCH_BOOSTS,
            RequestMode::RegionsOnly | RequestMode::CitiesAndRegions => &[],
        }
    }
}

/// How the term is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// trailing wildcard only
    Prefix,
    /// leading and trailing wildcard
    Infix,
}

fn term_source(params: &LookupParams) -> (Anchor, &str) {
    if let Some(term) = &params.term {
        (Anchor::Prefix, term.as_str())
    } else if let Some(iterm) = &params.iterm {
        (Anchor::Infix, iterm.as_str())
    } else if let Some(search) = &params.search {
        (Anchor::Prefix, search.as_str())
    } else {
        (Anchor::Prefix, "")
    }
}

/// Wildcard clauses for the locality name.
///
/// Terms containing forbidden punctuation are not rejected; they turn
/// into a bare `*`.
pub fn term_clauses(raw: &str, infix: bool) -> Vec<Query> {
    let term = raw.to_lowercase();
    if term.contains(FORBIDDEN_TERM_CHARS) {
        return vec![Query::wildcard(FIELD_LOCALITY_NAME, "*")];
    }

    let words: Vec<&str> = term.split_whitespace().collect();
    if let [first, second] = words.as_slice() {
        return vec![
            Query::wildcard(FIELD_LOCALITY_NAME, format!("{}*", first)),
            Query::wildcard(FIELD_LOCALITY_NAME, format!("*{}*", second)),
        ];
    }

    let lead = if infix { "*" } else { "" };
    vec![Query::wildcard(
        FIELD_LOCALITY_NAME,
        format!("{}{}*", lead, words.concat()),
    )]
}

fn score_functions(boosts: &[(&'static str, u32)]) -> Vec<ScoreFunction> {
    boosts
        .iter()
        .map(|(title, weight)| ScoreFunction {
            filter: Query::term(FIELD_LOCALITY_TITLE, *title),
            weight: *weight,
        })
        .collect()
}

fn region_clause(field: &'static str, param: &NumericParam) -> Result<Option<Query>> {
    match param {
        NumericParam::Absent => Ok(None),
        NumericParam::Value(v) => {
            let v = i64::try_from(*v).map_err(|_| {
                LookupError::invalid_parameter(format!("{} is out of range: {}", field, v))
            })?;
            Ok(Some(Query::term(field, v)))
        }
        NumericParam::Invalid(raw) => Err(LookupError::invalid_parameter(format!(
            "{} must be a non-negative integer, got {:?}",
            field, raw
        ))),
    }
}

fn relevance_then_status() -> Vec<SortClause> {
    vec![SortClause::Score, SortClause::Desc(FIELD_STATUS)]
}

#[derive(Debug, Clone)]
pub struct QueryCompiler {
    single_page_size: u32,
    list_page_size: u32,
    geo_country: String,
}

impl QueryCompiler {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            single_page_size: config.single_page_size,
            list_page_size: config.list_page_size,
            geo_country: config.geo_country.clone(),
        }
    }

    pub fn page_size(&self, params: &LookupParams) -> u32 {
        if params.is_list_mode() {
            self.list_page_size
        } else {
            self.single_page_size
        }
    }

    /// Compile the locality query.
    ///
    /// Fails with `InvalidParameter` when a region filter is not numeric;
    /// callers treat that as an empty result.
    pub fn compile(&self, params: &LookupParams) -> Result<SearchQuery> {
        let region_id = region_clause(FIELD_REGION_ID, &params.region_id)?;
        let region_code = region_clause(FIELD_REGION_CODE, &params.region_code)?;

        let mode = RequestMode::of(params);
        let (anchor, term) = term_source(params);

        let mut must = term_clauses(term, anchor == Anchor::Infix);
        must.push(mode.type_filter());

        let structural: Vec<Query> = region_id.into_iter().chain(region_code).collect();
        let filter = (!structural.is_empty()).then(|| {
            Box::new(Query::Bool(BoolQuery {
                must: structural,
                filter: None,
            }))
        });

        let size = self.page_size(params);
        let from = (params.page.max(1) - 1).saturating_mul(size);

        Ok(SearchQuery {
            query: Query::FunctionScore(FunctionScore {
                boost_mode: BoostMode::Replace,
                query: Box::new(Query::Bool(BoolQuery { must, filter })),
                functions: score_functions(mode.boosts()),
            }),
            sort: relevance_then_status(),
            size,
            from,
        })
    }

    /// Best single locality for a city name coming from the GeoIP index.
    ///
    /// Independent of the caller's parameters: default types and boosts.
    pub fn compile_city(&self, city: &str) -> SearchQuery {
        let mode = RequestMode::Default;
        SearchQuery {
            query: Query::FunctionScore(FunctionScore {
                boost_mode: BoostMode::Replace,
                query: Box::new(Query::Bool(BoolQuery {
                    must: vec![
                        Query::match_text(FIELD_LOCALITY_NAME, city),
                        mode.type_filter(),
                    ],
                    filter: None,
                })),
                functions: score_functions(mode.boosts()),
            }),
            sort: relevance_then_status(),
            size: 1,
            from: 0,
        }
    }

    /// Range document containing an encoded address
    pub fn compile_geo_range(&self, encoded_ip: i64) -> SearchQuery {
        SearchQuery {
            query: Query::Bool(BoolQuery {
                must: vec![
                    Query::match_text("country", self.geo_country.as_str()),
                    Query::at_most("start_ip", encoded_ip),
                    Query::at_least("end_ip", encoded_ip),
                ],
                filter: None,
            }),
            sort: Vec::new(),
            size: 1,
            from: 0,
        }
    }
}
