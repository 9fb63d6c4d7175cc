//! In-memory index backend
//!
//! Evaluates the typed query DSL against a fixed set of documents. Meant
//! for tests and offline development; documents are seeded at
//! construction and never change afterwards.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::{LookupError, Result};
use crate::storage::models::{GeoIpDocument, IndexKind, LocalityDocument};
use crate::storage::query::{FieldValue, Query, RangeBounds, SearchQuery, SortClause, TermValue};
use crate::storage::traits::{IndexHealth, IndexStore};

#[derive(Default)]
pub struct MemoryIndexStore {
    documents: HashMap<IndexKind, Vec<Value>>,
    unavailable: bool,
}

impl MemoryIndexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails like an unreachable index
    pub fn unavailable() -> Self {
        Self {
            documents: HashMap::new(),
            unavailable: true,
        }
    }

    pub fn with_localities(self, docs: impl IntoIterator<Item = LocalityDocument>) -> Self {
        self.with_documents(IndexKind::Kladr, docs)
    }

    pub fn with_geoip(self, docs: impl IntoIterator<Item = GeoIpDocument>) -> Self {
        self.with_documents(IndexKind::GeoIp, docs)
    }

    fn with_documents<T: Serialize>(
        mut self,
        index: IndexKind,
        docs: impl IntoIterator<Item = T>,
    ) -> Self {
        let entry = self.documents.entry(index).or_default();
        entry.extend(docs.into_iter().filter_map(|d| serde_json::to_value(d).ok()));
        self
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            Err(LookupError::index_unavailable("memory store is marked unavailable"))
        } else {
            Ok(())
        }
    }

    /// Run a query and build the same body shape a real index returns
    pub fn execute(&self, index: IndexKind, query: &SearchQuery) -> Value {
        let docs = self.documents.get(&index).map(Vec::as_slice).unwrap_or(&[]);

        let mut scored: Vec<(f64, &Value)> = docs
            .iter()
            .filter(|doc| matches(&query.query, doc))
            .map(|doc| (score(&query.query, doc), doc))
            .collect();

        scored.sort_by(|a, b| compare_hits(&query.sort, a, b));

        let total = scored.len();
        let hits: Vec<Value> = scored
            .into_iter()
            .skip(query.from as usize)
            .take(query.size as usize)
            .map(|(score, doc)| json!({ "_index": index.as_str(), "_score": score, "_source": doc }))
            .collect();

        json!({
            "hits": {
                "total": { "value": total, "relation": "eq" },
                "hits": hits
            }
        })
    }
}

fn compare_hits(sort: &[SortClause], a: &(f64, &Value), b: &(f64, &Value)) -> Ordering {
    for clause in sort {
        let ordering = match clause {
            SortClause::Score => b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal),
            SortClause::Desc(field) => {
                let left = a.1.get(*field).and_then(Value::as_i64).unwrap_or(0);
                let right = b.1.get(*field).and_then(Value::as_i64).unwrap_or(0);
                right.cmp(&left)
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn field_text(doc: &Value, field: &str) -> Option<String> {
    match doc.get(field)? {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '-' && c != '/')
        .filter(|t| !t.is_empty())
}

/// `*` only glob, as used by the wildcard clauses
fn glob_match(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => (0..=text.len()).any(|i| glob_match(rest, &text[i..])),
        Some((c, rest)) => text
            .split_first()
            .is_some_and(|(t, text_rest)| t == c && glob_match(rest, text_rest)),
    }
}

fn term_matches(doc: &Value, FieldValue { field, value }: &FieldValue<TermValue>) -> bool {
    match (doc.get(*field), value) {
        (Some(Value::String(s)), TermValue::Text(expected)) => s == expected,
        (Some(Value::Number(n)), TermValue::Number(expected)) => n.as_i64() == Some(*expected),
        _ => false,
    }
}

fn matches(query: &Query, doc: &Value) -> bool {
    match query {
        Query::FunctionScore(fs) => matches(&fs.query, doc),
        Query::Bool(b) => {
            b.must.iter().all(|q| matches(q, doc))
                && b.filter.as_ref().is_none_or(|f| matches(f, doc))
        }
        Query::Wildcard(FieldValue { field, value }) => field_text(doc, field).is_some_and(|text| {
            let pattern: Vec<char> = value.to_lowercase().chars().collect();
            let text: Vec<char> = text.chars().collect();
            glob_match(&pattern, &text)
        }),
        Query::Match(FieldValue { field, value }) => field_text(doc, field).is_some_and(|text| {
            let wanted = value.to_lowercase();
            let have: Vec<&str> = tokens(&text).collect();
            let mut wanted_tokens = tokens(&wanted).peekable();
            wanted_tokens.peek().is_some() && wanted_tokens.all(|w| have.contains(&w))
        }),
        Query::Term(fv) => term_matches(doc, fv),
        Query::Terms(FieldValue { field, value }) => value.iter().any(|v| {
            term_matches(
                doc,
                &FieldValue {
                    field: *field,
                    value: v.clone(),
                },
            )
        }),
        Query::Range(FieldValue {
            field,
            value: RangeBounds { gte, lte },
        }) => doc.get(*field).and_then(Value::as_i64).is_some_and(|n| {
            gte.is_none_or(|low| n >= low) && lte.is_none_or(|high| n <= high)
        }),
    }
}

/// Relevance: product of matching function weights, `1.0` otherwise
fn score(query: &Query, doc: &Value) -> f64 {
    match query {
        Query::FunctionScore(fs) => {
            let weights: Vec<f64> = fs
                .functions
                .iter()
                .filter(|f| matches(&f.filter, doc))
                .map(|f| f64::from(f.weight))
                .collect();
            if weights.is_empty() {
                1.0
            } else {
                weights.iter().product()
            }
        }
        _ => 1.0,
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn search(&self, index: IndexKind, query: &SearchQuery) -> Result<String> {
        self.check_available()?;
        Ok(self.execute(index, query).to_string())
    }

    async fn ping(&self, _index: IndexKind) -> Result<IndexHealth> {
        self.check_available()?;
        Ok(IndexHealth::Available)
    }

    async fn ensure_index(&self, _index: IndexKind) -> Result<bool> {
        self.check_available()?;
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::query::{BoolQuery, BoostMode, FunctionScore, ScoreFunction};

    fn locality(id: i64, name: &str, title: &str, status: i64) -> LocalityDocument {
        LocalityDocument {
            id,
            status,
            full_name: format!("{} {}", name, title),
            locality_title: title.to_string(),
            locality_name: name.to_string(),
            region_id: Some(16),
            region_title: "Татарстан Респ".to_string(),
            region_code: 16,
        }
    }

    #[test]
    fn test_glob_match() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert!(glob_match(&chars("каз*"), &chars("казань")));
        assert!(glob_match(&chars("*зан*"), &chars("казань")));
        assert!(glob_match(&chars("*"), &chars("")));
        assert!(!glob_match(&chars("моск*"), &chars("казань")));
    }

    #[test]
    fn test_boost_then_status_ordering() {
        let store = MemoryIndexStore::new().with_localities([
            locality(1, "Казань", "с", 9),
            locality(2, "Казанка", "г", 1),
            locality(3, "Казанский", "п", 5),
        ]);

        let query = SearchQuery {
            query: Query::FunctionScore(FunctionScore {
                boost_mode: BoostMode::Replace,
                query: Box::new(Query::Bool(BoolQuery {
                    must: vec![Query::wildcard("locality_name", "каз*")],
                    filter: None,
                })),
                functions: vec![
                    ScoreFunction {
                        filter: Query::term("locality_title", "г"),
                        weight: 200,
                    },
                    ScoreFunction {
                        filter: Query::term("locality_title", "п"),
                        weight: 100,
                    },
                ],
            }),
            sort: vec![SortClause::Score, SortClause::Desc("status")],
            size: 10,
            from: 0,
        };

        let body = store.execute(IndexKind::Kladr, &query);
        let ids: Vec<i64> = body["hits"]["hits"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| h["_source"]["doc_id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(body["hits"]["total"]["value"], 3);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryIndexStore::unavailable();
        let query = SearchQuery {
            query: Query::Bool(BoolQuery::default()),
            sort: Vec::new(),
            size: 1,
            from: 0,
        };
        let err = store.search(IndexKind::Kladr, &query).await.unwrap_err();
        assert!(err.is_store_failure());
    }
}
