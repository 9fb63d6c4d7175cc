//! IP → locality resolution

mod resolver;

pub use resolver::{GeoOutcome, GeoResolver};
