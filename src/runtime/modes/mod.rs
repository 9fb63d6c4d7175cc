//! Mode routing
//!
//! Server mode runs the HTTP façade; CLI mode runs one sub-command and
//! exits.

pub mod cli;
pub mod server;

pub use cli::run_command;
pub use server::run_server;
