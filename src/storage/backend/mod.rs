//! Index store backends
//!
//! - `http`: Elasticsearch-compatible endpoint over HTTP
//! - `memory`: fixed in-process documents

mod http;
mod memory;

pub use http::HttpIndexStore;
pub use memory::MemoryIndexStore;
