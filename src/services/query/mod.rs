mod compiler;
mod params;

pub use compiler::{
    CITIES_AND_REGIONS_TYPES, DEFAULT_TYPES, QueryCompiler, RequestMode, SEARCH_TYPES,
    term_clauses,
};
pub use params::{LookupParams, NumericParam};
