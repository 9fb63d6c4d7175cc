use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::errors::{LookupError, Result};
use crate::utils::decode_range;

/// Which index a call goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    /// Address catalogue (localities, districts, regions)
    Kladr,
    /// IP range table
    GeoIp,
}

impl IndexKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Kladr => "kladr",
            IndexKind::GeoIp => "geoip",
        }
    }

    /// Mapping used when the index has to be created
    pub fn mapping(&self) -> Value {
        match self {
            IndexKind::Kladr => json!({
                "settings": { "number_of_shards": 1 },
                "mappings": { "properties": {
                    "doc_id": { "type": "long" },
                    "status": { "type": "integer" },
                    "full_name": { "type": "text" },
                    "locality_title": { "type": "text" },
                    "locality_name": { "type": "text" },
                    "region_id": { "type": "integer" },
                    "region_title": { "type": "text" },
                    "region_code": { "type": "integer" }
                }}
            }),
            IndexKind::GeoIp => json!({
                "settings": { "number_of_shards": 1 },
                "mappings": { "properties": {
                    "doc_id": { "type": "long" },
                    "start_ip": { "type": "long" },
                    "end_ip": { "type": "long" },
                    "city": { "type": "text" },
                    "region": { "type": "text" },
                    "district": { "type": "text" },
                    "country": { "type": "text" }
                }}
            }),
        }
    }
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the address index.
///
/// `region_id` is absent (or zero) exactly when the record is itself a
/// top-level region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalityDocument {
    #[serde(rename = "doc_id")]
    pub id: i64,
    pub status: i64,
    pub full_name: String,
    /// Abbreviated type code, e.g. `г`
    pub locality_title: String,
    /// Bare name without the type code
    pub locality_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    pub region_title: String,
    pub region_code: i64,
}

impl LocalityDocument {
    /// Parent region id, treating `0` like a missing value
    pub fn parent_region(&self) -> Option<i64> {
        self.region_id.filter(|id| *id != 0)
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_region().is_none()
    }
}

/// One entry of the GeoIP range index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoIpDocument {
    #[serde(rename = "doc_id")]
    pub id: i64,
    pub start_ip: i64,
    pub end_ip: i64,
    pub city: String,
    pub region: String,
    pub district: String,
    pub country: String,
}

impl GeoIpDocument {
    /// Build a range document from a source row whose block looks like
    /// `"A.B.C.D - W.X.Y.Z"`.
    pub fn from_block(
        id: i64,
        block: &str,
        city: &str,
        region: &str,
        district: &str,
        country: &str,
    ) -> Result<Self> {
        let (start_ip, end_ip) = decode_range(block)?;
        if start_ip > end_ip {
            return Err(LookupError::malformed_range(format!(
                "range start is after its end: {:?}",
                block
            )));
        }

        Ok(Self {
            id,
            start_ip,
            end_ip,
            city: city.to_string(),
            region: region.to_string(),
            district: district.to_string(),
            country: country.to_string(),
        })
    }

    pub fn contains(&self, encoded_ip: i64) -> bool {
        self.start_ip <= encoded_ip && encoded_ip <= self.end_ip
    }
}
