//! kladr-lookup - KLADR address and GeoIP lookup service
//!
//! Compiles loose user input (free text, partial terms, region filters,
//! pagination, IP addresses) into search-index queries and formats the
//! matches for the HTTP API.
//!
//! # Architecture
//! - `utils`: IP codec and request helpers
//! - `storage`: Index query DSL, response schema and index backends
//! - `services`: Query compiler, result projector, locality and GeoIP lookups
//! - `api`: HTTP handlers and middleware
//! - `config`: Static configuration
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
