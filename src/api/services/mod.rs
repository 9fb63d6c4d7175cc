pub mod geoip;
pub mod health;
pub mod kladr;
pub mod locality;

pub use geoip::{GeoIpApi, geoip_routes};
pub use health::{HealthService, health_routes};
pub use kladr::{KladrApi, kladr_routes, request_base_url};
pub use locality::{LocalityApi, locality_routes};

/// All public routes
pub fn lookup_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(locality_routes)
        .configure(kladr_routes)
        .configure(geoip_routes)
        .configure(health_routes);
}
