//! Service layer for business logic
//!
//! Query compilation, result projection and the two lookups built on
//! them. Shared by the HTTP handlers and the CLI.

pub mod abbreviation;
pub mod geoip;
mod locality_service;
pub mod projector;
pub mod query;

pub use geoip::{GeoOutcome, GeoResolver};
pub use locality_service::{ListOutcome, LocalityService};
pub use projector::{ListItem, LocalityList, LocalityMatch};
pub use query::{LookupParams, QueryCompiler};
