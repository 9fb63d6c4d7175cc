use std::sync::Arc;

use tracing::{debug, trace};

use crate::services::locality_service::{LocalityService, search_logged};
use crate::services::projector::LocalityMatch;
use crate::storage::{GeoIpDocument, IndexKind, SearchResponse};
use crate::utils::encode_ip;

/// What a GeoIP lookup produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoOutcome {
    /// Not a dotted quad
    InvalidAddress,
    /// No range contains the address, or the range has no city
    Unresolved,
    /// City lookup result, at most one item
    Resolved(Vec<LocalityMatch>),
}

/// Address → range document → best locality for its city
pub struct GeoResolver {
    localities: Arc<LocalityService>,
}

impl GeoResolver {
    pub fn new(localities: Arc<LocalityService>) -> Self {
        Self { localities }
    }

    pub async fn resolve(&self, ip: &str) -> GeoOutcome {
        let encoded = match encode_ip(ip) {
            Ok(encoded) => encoded,
            Err(e) => {
                debug!("GeoIP lookup rejected: {}", e);
                return GeoOutcome::InvalidAddress;
            }
        };

        let Some(range) = self.containing_range(encoded).await else {
            trace!("No GeoIP range contains {}", ip);
            return GeoOutcome::Unresolved;
        };

        let city = range.city.trim();
        if city.is_empty() {
            trace!("GeoIP range {} has no city", range.id);
            return GeoOutcome::Unresolved;
        }

        GeoOutcome::Resolved(self.localities.best_for_city(city).await)
    }

    /// First range document containing the encoded address
    async fn containing_range(&self, encoded: i64) -> Option<GeoIpDocument> {
        let query = self.localities.compiler().compile_geo_range(encoded);
        let body = search_logged(self.localities.store().as_ref(), IndexKind::GeoIp, &query).await?;

        match SearchResponse::<GeoIpDocument>::parse(&body) {
            Ok(resp) => resp.into_sources().into_iter().next(),
            Err(e) => {
                debug!("Unparseable GeoIP response: {}", e);
                None
            }
        }
    }
}
