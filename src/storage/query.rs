//! Typed search-index query DSL
//!
//! Serializes to the JSON body accepted by the index `_search` endpoint.
//! Only the subset the lookup service needs is modelled.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Single-entry object `{field: value}`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    pub field: &'static str,
    pub value: T,
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field, &self.value)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TermValue {
    Text(String),
    Number(i64),
}

impl From<&str> for TermValue {
    fn from(value: &str) -> Self {
        TermValue::Text(value.to_string())
    }
}

impl From<i64> for TermValue {
    fn from(value: i64) -> Self {
        TermValue::Number(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    FunctionScore(FunctionScore),
    Bool(BoolQuery),
    Wildcard(FieldValue<String>),
    Match(FieldValue<String>),
    Term(FieldValue<TermValue>),
    Terms(FieldValue<Vec<TermValue>>),
    Range(FieldValue<RangeBounds>),
}

impl Query {
    pub fn wildcard(field: &'static str, pattern: impl Into<String>) -> Self {
        Query::Wildcard(FieldValue {
            field,
            value: pattern.into(),
        })
    }

    pub fn match_text(field: &'static str, text: impl Into<String>) -> Self {
        Query::Match(FieldValue {
            field,
            value: text.into(),
        })
    }

    pub fn term(field: &'static str, value: impl Into<TermValue>) -> Self {
        Query::Term(FieldValue {
            field,
            value: value.into(),
        })
    }

    pub fn terms<V: Into<TermValue>>(field: &'static str, values: impl IntoIterator<Item = V>) -> Self {
        Query::Terms(FieldValue {
            field,
            value: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn at_most(field: &'static str, bound: i64) -> Self {
        Query::Range(FieldValue {
            field,
            value: RangeBounds {
                gte: None,
                lte: Some(bound),
            },
        })
    }

    pub fn at_least(field: &'static str, bound: i64) -> Self {
        Query::Range(FieldValue {
            field,
            value: RangeBounds {
                gte: Some(bound),
                lte: None,
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Box<Query>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostMode {
    #[default]
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreFunction {
    pub filter: Query,
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionScore {
    pub boost_mode: BoostMode,
    pub query: Box<Query>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<ScoreFunction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortClause {
    /// Relevance, highest first
    Score,
    /// Numeric field, highest first
    Desc(&'static str),
}

impl Serialize for SortClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Order {
            order: &'static str,
        }

        match self {
            SortClause::Score => serializer.serialize_str("_score"),
            SortClause::Desc(field) => FieldValue {
                field: *field,
                value: Order { order: "desc" },
            }
            .serialize(serializer),
        }
    }
}

/// Full `_search` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub query: Query,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortClause>,
    pub size: u32,
    pub from: u32,
}
