//! `_search` response schema

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct SearchResponse<T> {
    pub hits: Hits<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Hits<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,
    #[serde(default = "Vec::new")]
    pub hits: Vec<Hit<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Hit<T> {
    #[serde(rename = "_source")]
    pub source: T,
}

/// Newer index versions report `{"value": N, "relation": ..}`, older ones a bare number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Detailed { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(value) | TotalHits::Detailed { value } => *value,
        }
    }
}

impl<T: DeserializeOwned> SearchResponse<T> {
    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Total hit count; falls back to the number of returned hits
    pub fn total(&self) -> u64 {
        self.hits
            .total
            .map(|t| t.value())
            .unwrap_or(self.hits.hits.len() as u64)
    }

    pub fn into_sources(self) -> Vec<T> {
        self.hits.hits.into_iter().map(|hit| hit.source).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{GeoIpDocument, LocalityDocument};

    #[test]
    fn test_parse_detailed_total() {
        let body = r#"{"took":3,"hits":{"total":{"value":42,"relation":"eq"},"max_score":null,
            "hits":[{"_index":"kladr","_id":"x","_score":200.0,
                     "_source":{"doc_id":5,"locality_name":"Казань","locality_title":"г"}}]}}"#;
        let resp = SearchResponse::<LocalityDocument>::parse(body).unwrap();
        assert_eq!(resp.total(), 42);
        let docs = resp.into_sources();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].locality_name, "Казань");
    }

    #[test]
    fn test_parse_numeric_total() {
        let body = r#"{"hits":{"total":3,"hits":[]}}"#;
        let resp = SearchResponse::<GeoIpDocument>::parse(body).unwrap();
        assert_eq!(resp.total(), 3);
    }

    #[test]
    fn test_missing_total_counts_hits() {
        let body = r#"{"hits":{"hits":[{"_source":{"doc_id":1,"city":"Kazan"}}]}}"#;
        let resp = SearchResponse::<GeoIpDocument>::parse(body).unwrap();
        assert_eq!(resp.total(), 1);
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(SearchResponse::<LocalityDocument>::parse("not json").is_err());
        assert!(SearchResponse::<LocalityDocument>::parse(r#"{"error":"boom"}"#).is_err());
    }
}
